//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_store;
pub mod ai_service;
pub mod collaboration_store;
pub mod event_logger;
pub mod progress;
pub mod store;
pub mod thought_store;
