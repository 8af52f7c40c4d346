//! Application layer for thinktank
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CollaborationParams, EngineConfig, OrchestratorParams, ThoughtParams};
pub use ports::{
    agent_store::AgentStore,
    ai_service::{AiService, AiServiceError, ThoughtRequest},
    collaboration_store::CollaborationStore,
    event_logger::{NoEventLogger, RequestEvent, RequestEventLogger},
    progress::{NoProgress, ProgressNotifier},
    store::{Snapshot, StoreError, Subscription},
    thought_store::ThoughtStore,
};
pub use use_cases::collaborate::{CollaborationError, CollaborationManager};
pub use use_cases::fallback::{AttemptError, FallbackError, FallbackExecutor, execute_with_fallback};
pub use use_cases::generate_thoughts::{ThoughtEngine, ThoughtGenerationError};
pub use use_cases::optimize_response::{OptimizationReport, ResponseOptimizer};
pub use use_cases::process_input::{OrchestrationError, Orchestrator};
