//! Collaboration parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thinktank_domain::{ResolutionStrategy, SessionType};

/// Controls divergence detection and how conflicting views are settled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollaborationParams {
    /// Word-set similarity below which two top thoughts count as diverging.
    pub divergence_threshold: f64,
    pub strategy: ResolutionStrategy,
    /// Session type used by the orchestrator for new sessions.
    pub session_type: SessionType,
    /// Unsettled sessions older than this are closed.
    pub session_timeout: Duration,
}

impl Default for CollaborationParams {
    fn default() -> Self {
        Self {
            divergence_threshold: 0.6,
            strategy: ResolutionStrategy::default(),
            session_type: SessionType::default(),
            session_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl CollaborationParams {
    pub fn with_divergence_threshold(mut self, threshold: f64) -> Self {
        self.divergence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_strategy(mut self, strategy: ResolutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_session_type(mut self, session_type: SessionType) -> Self {
        self.session_type = session_type;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Session timeout as a calendar duration for timestamp arithmetic.
    pub fn session_timeout_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_timeout).unwrap_or(chrono::Duration::MAX)
    }
}
