//! Request phase state machine.
//!
//! ```text
//! LoadingAgents → GeneratingThoughts → Collaborating → Optimizing → Done
//!                                   └──────────────────┘ (fewer than two agents)
//! any non-terminal phase → Error → FallbackResponse
//! ```

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    LoadingAgents,
    GeneratingThoughts,
    Collaborating,
    Optimizing,
    Done,
    Error,
    FallbackResponse,
}

impl RequestPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestPhase::LoadingAgents => "loading_agents",
            RequestPhase::GeneratingThoughts => "generating_thoughts",
            RequestPhase::Collaborating => "collaborating",
            RequestPhase::Optimizing => "optimizing",
            RequestPhase::Done => "done",
            RequestPhase::Error => "error",
            RequestPhase::FallbackResponse => "fallback_response",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RequestPhase::LoadingAgents => "Loading Agents",
            RequestPhase::GeneratingThoughts => "Generating Thoughts",
            RequestPhase::Collaborating => "Collaborating",
            RequestPhase::Optimizing => "Optimizing",
            RequestPhase::Done => "Done",
            RequestPhase::Error => "Error",
            RequestPhase::FallbackResponse => "Fallback Response",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestPhase::Done | RequestPhase::FallbackResponse)
    }

    pub fn can_transition_to(&self, next: RequestPhase) -> bool {
        use RequestPhase::{
            Collaborating, Done, Error, FallbackResponse, GeneratingThoughts, LoadingAgents,
            Optimizing,
        };

        match (*self, next) {
            (LoadingAgents, GeneratingThoughts)
            | (GeneratingThoughts, Collaborating)
            | (GeneratingThoughts, Optimizing)
            | (Collaborating, Optimizing)
            | (Optimizing, Done)
            | (Error, FallbackResponse) => true,
            (from, Error) => !from.is_terminal() && from != Error,
            _ => false,
        }
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tracks the phase of one request and the path it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState {
    phase: RequestPhase,
    history: Vec<RequestPhase>,
}

impl Default for RequestState {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestState {
    pub fn new() -> Self {
        Self {
            phase: RequestPhase::LoadingAgents,
            history: vec![RequestPhase::LoadingAgents],
        }
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn history(&self) -> &[RequestPhase] {
        &self.history
    }

    /// Move to `next`, rejecting transitions the machine does not allow.
    pub fn advance(&mut self, next: RequestPhase) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::InvalidPhaseTransition {
                from: self.phase.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.phase = next;
        self.history.push(next);
        Ok(())
    }

    /// Take the `Error → FallbackResponse` path from the current phase.
    pub fn fail_over(&mut self) -> Result<(), DomainError> {
        self.advance(RequestPhase::Error)?;
        self.advance(RequestPhase::FallbackResponse)
    }
}
