//! Orchestration domain
//!
//! The per-request state machine driven by the orchestrator.

pub mod phase;

pub use phase::{RequestPhase, RequestState};
