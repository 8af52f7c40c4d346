//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Raised when an operation would break one of the structural invariants
/// owned by the domain (thought tree shape, append-only collaboration
/// history, request phase ordering).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Thought {0} is already part of the tree")]
    DuplicateThought(String),

    #[error("Thought {thought} references unknown parent {parent}")]
    UnknownParent { thought: String, parent: String },

    #[error("Thought {thought} has depth {depth}, expected {expected}")]
    InvalidDepth {
        thought: String,
        depth: usize,
        expected: usize,
    },

    #[error("Thought depth {depth} exceeds the maximum of {max}")]
    DepthExceeded { depth: usize, max: usize },

    #[error("Node {node} already has {max} children")]
    BranchingExceeded { node: String, max: usize },

    #[error("Conflicting view #{0} does not exist")]
    UnknownConflictingView(usize),

    #[error("Conflicting view #{0} already carries a resolution")]
    ResolutionAlreadyRecorded(usize),

    #[error("Invalid request phase transition: {from} -> {to}")]
    InvalidPhaseTransition { from: String, to: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
