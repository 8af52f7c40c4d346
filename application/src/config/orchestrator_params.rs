//! Orchestrator parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts and confidence adjustments applied to one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorParams {
    /// Timeout for each AI-backed attempt run through the fallback executor.
    pub ai_call_timeout: Option<Duration>,
    /// Upper bound on confidence of a degraded answer.
    pub degraded_confidence_cap: f64,
    /// Draft confidence multiplier when consensus was not reached.
    pub conflict_penalty: f64,
    /// Draft confidence multiplier when some agents failed.
    pub partial_failure_penalty: f64,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            ai_call_timeout: Some(Duration::from_secs(60)),
            degraded_confidence_cap: 0.5,
            conflict_penalty: 0.9,
            partial_failure_penalty: 0.95,
        }
    }
}

impl OrchestratorParams {
    pub fn with_ai_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.ai_call_timeout = timeout;
        self
    }

    pub fn with_degraded_confidence_cap(mut self, cap: f64) -> Self {
        self.degraded_confidence_cap = cap.clamp(0.0, 1.0);
        self
    }

    pub fn with_conflict_penalty(mut self, penalty: f64) -> Self {
        self.conflict_penalty = penalty.clamp(0.0, 1.0);
        self
    }

    pub fn with_partial_failure_penalty(mut self, penalty: f64) -> Self {
        self.partial_failure_penalty = penalty.clamp(0.0, 1.0);
        self
    }
}
