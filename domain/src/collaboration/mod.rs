//! Collaboration domain
//!
//! A [`Collaboration`] is a consensus-building session among the agents
//! that took part in a request. Disagreements are recorded as
//! [`ConflictingView`]s, each settled (or not) by a [`ResolutionStrategy`].
//!
//! ```text
//! Active ──(all views resolved)──▶ Consensus
//!   │
//!   └────(unresolved views)─────▶ Conflict ──(timeout)──▶ Closed
//! ```

pub mod entities;
pub mod resolution;
pub mod similarity;

pub use entities::{
    AgentPosition, Collaboration, CollaborationStatus, ConflictingView, Resolution,
    ResolutionKind, SessionType, SharedContext,
};
pub use resolution::ResolutionStrategy;
pub use similarity::{equivalent, jaccard_similarity};
