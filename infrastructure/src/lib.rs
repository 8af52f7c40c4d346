//! Infrastructure layer for thinktank
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: in-memory stores, AI services, the request event log,
//! and configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, ProviderKind};
pub use logging::JsonlEventLogger;
pub use providers::OfflineAiService;
#[cfg(feature = "http-provider")]
pub use providers::{HttpAiService, HttpProviderSettings};
pub use store::{InMemoryAgentStore, InMemoryCollaborationStore, InMemoryThoughtStore};
