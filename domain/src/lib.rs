//! Domain layer for thinktank
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Agents and Thoughts
//!
//! A project owns a team of [`Agent`]s. For each request every agent grows a
//! bounded [`ThoughtTree`] of candidate reasoning steps; candidates are ranked
//! by confidence, preferring concise content on ties.
//!
//! ## Collaboration
//!
//! When several agents contribute, a [`Collaboration`] records where their
//! top thoughts diverge and how each disagreement was resolved. Consensus is
//! reached once every conflicting view carries a resolution.
//!
//! ## Optimization
//!
//! The draft answer is refined by an [`OptimizationStrategy`] that decides
//! when to stop and how to calibrate confidence against measured quality.

pub mod agent;
pub mod collaboration;
pub mod config;
pub mod context;
pub mod core;
pub mod optimization;
pub mod orchestration;
pub mod prompt;
pub mod response;
pub mod thought;
pub mod util;

// Re-export commonly used types
pub use agent::{Agent, AgentMetrics, AgentRole, AgentStatus};
pub use collaboration::{
    AgentPosition, Collaboration, CollaborationStatus, ConflictingView, Resolution,
    ResolutionKind, ResolutionStrategy, SessionType, SharedContext,
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use context::{ContextItem, ProjectContext};
pub use core::{
    error::DomainError,
    id::{AgentId, CollaborationId, ProjectId, ThoughtId},
};
pub use optimization::{
    HIGH_CONFIDENCE_THRESHOLD, OptimizationStrategy, RecursiveConfig, parse_quality_score,
};
pub use orchestration::{RequestPhase, RequestState};
pub use prompt::PromptTemplate;
pub use response::{AgentResponse, ResponseMetadata};
pub use thought::{Thought, ThoughtCandidate, ThoughtTree, TreeBounds};
