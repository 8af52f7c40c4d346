//! Orchestrator configuration from TOML (`[orchestrator]` section)

use super::check_unit_interval;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thinktank_application::OrchestratorParams;
use thinktank_domain::ConfigIssue;

/// Raw `[orchestrator]` section
///
/// # Example
///
/// ```toml
/// [orchestrator]
/// ai_call_timeout_seconds = 60   # 0 disables the timeout
/// degraded_confidence_cap = 0.5
/// conflict_penalty = 0.9
/// partial_failure_penalty = 0.95
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    pub ai_call_timeout_seconds: u64,
    pub degraded_confidence_cap: f64,
    pub conflict_penalty: f64,
    pub partial_failure_penalty: f64,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        let params = OrchestratorParams::default();
        Self {
            ai_call_timeout_seconds: params.ai_call_timeout.map(|t| t.as_secs()).unwrap_or(0),
            degraded_confidence_cap: params.degraded_confidence_cap,
            conflict_penalty: params.conflict_penalty,
            partial_failure_penalty: params.partial_failure_penalty,
        }
    }
}

impl FileOrchestratorConfig {
    pub fn to_params(&self) -> (OrchestratorParams, Vec<ConfigIssue>) {
        let defaults = OrchestratorParams::default();
        let mut issues = Vec::new();

        let timeout = (self.ai_call_timeout_seconds > 0)
            .then(|| Duration::from_secs(self.ai_call_timeout_seconds));
        let cap = check_unit_interval(
            "orchestrator.degraded_confidence_cap",
            self.degraded_confidence_cap,
            defaults.degraded_confidence_cap,
            &mut issues,
        );
        let conflict = check_unit_interval(
            "orchestrator.conflict_penalty",
            self.conflict_penalty,
            defaults.conflict_penalty,
            &mut issues,
        );
        let partial = check_unit_interval(
            "orchestrator.partial_failure_penalty",
            self.partial_failure_penalty,
            defaults.partial_failure_penalty,
            &mut issues,
        );

        let params = defaults
            .with_ai_call_timeout(timeout)
            .with_degraded_confidence_cap(cap)
            .with_conflict_penalty(conflict)
            .with_partial_failure_penalty(partial);
        (params, issues)
    }
}
