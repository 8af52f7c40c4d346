//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ThoughtParams`]: tree-of-thought expansion (candidates, bounds, convergence)
//! - [`CollaborationParams`]: divergence detection and conflict resolution
//! - [`OrchestratorParams`]: timeouts and confidence penalties for a request
//! - [`EngineConfig`]: container handed to the orchestrator

pub mod collaboration_params;
pub mod engine_config;
pub mod orchestrator_params;
pub mod thought_params;

pub use collaboration_params::CollaborationParams;
pub use engine_config::EngineConfig;
pub use orchestrator_params::OrchestratorParams;
pub use thought_params::ThoughtParams;
