//! Collaboration configuration from TOML (`[collaboration]` section)

use super::{check_unit_interval, invalid_enum};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thinktank_application::CollaborationParams;
use thinktank_domain::{ConfigIssue, ConfigIssueCode, ResolutionStrategy, SessionType};

/// Raw `[collaboration]` section
///
/// # Example
///
/// ```toml
/// [collaboration]
/// divergence_threshold = 0.6
/// strategy = "synthesis:0.05"   # highest_confidence | synthesis[:m] | strict[:m]
/// session_type = "problem_solving"
/// session_timeout_seconds = 1800
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCollaborationConfig {
    /// Jaccard similarity below which two top thoughts conflict
    pub divergence_threshold: f64,
    pub strategy: String,
    pub session_type: String,
    /// Active sessions idle for longer than this are closed
    pub session_timeout_seconds: u64,
}

impl Default for FileCollaborationConfig {
    fn default() -> Self {
        let params = CollaborationParams::default();
        Self {
            divergence_threshold: params.divergence_threshold,
            strategy: "synthesis".to_string(),
            session_type: params.session_type.as_str().to_string(),
            session_timeout_seconds: params.session_timeout.as_secs(),
        }
    }
}

impl FileCollaborationConfig {
    pub fn parse_strategy(&self) -> (ResolutionStrategy, Vec<ConfigIssue>) {
        match self.strategy.parse::<ResolutionStrategy>() {
            Ok(strategy) => (strategy, vec![]),
            Err(_) => (
                ResolutionStrategy::default(),
                vec![invalid_enum(
                    "collaboration.strategy",
                    &self.strategy,
                    &["highest_confidence", "synthesis[:margin]", "strict[:margin]"],
                    "synthesis",
                )],
            ),
        }
    }

    pub fn parse_session_type(&self) -> (SessionType, Vec<ConfigIssue>) {
        match self.session_type.parse::<SessionType>() {
            Ok(session_type) => (session_type, vec![]),
            Err(_) => (
                SessionType::default(),
                vec![invalid_enum(
                    "collaboration.session_type",
                    &self.session_type,
                    &["brainstorming", "problem_solving", "decision_making", "code_review"],
                    "problem_solving",
                )],
            ),
        }
    }

    pub fn to_params(&self) -> (CollaborationParams, Vec<ConfigIssue>) {
        let defaults = CollaborationParams::default();
        let mut issues = Vec::new();

        let threshold = check_unit_interval(
            "collaboration.divergence_threshold",
            self.divergence_threshold,
            defaults.divergence_threshold,
            &mut issues,
        );
        let (strategy, strategy_issues) = self.parse_strategy();
        issues.extend(strategy_issues);
        let (session_type, session_issues) = self.parse_session_type();
        issues.extend(session_issues);

        let timeout = if self.session_timeout_seconds == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "collaboration.session_timeout_seconds".to_string(),
                    value: "0".to_string(),
                },
                format!(
                    "collaboration.session_timeout_seconds must be positive, using {}",
                    defaults.session_timeout.as_secs()
                ),
            ));
            defaults.session_timeout
        } else {
            Duration::from_secs(self.session_timeout_seconds)
        };

        let params = defaults
            .with_divergence_threshold(threshold)
            .with_strategy(strategy)
            .with_session_type(session_type)
            .with_session_timeout(timeout);
        (params, issues)
    }
}
