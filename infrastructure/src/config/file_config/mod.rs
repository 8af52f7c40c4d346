//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section converts into application or domain types through a
//! `to_params`/`parse_*` method that returns the converted value together
//! with the issues found; invalid values fall back to their defaults.

mod agents;
mod collaboration;
mod logging;
mod optimizer;
mod orchestrator;
mod provider;
mod thoughts;

pub use agents::{FileAgentSeed, default_team};
pub use collaboration::FileCollaborationConfig;
pub use logging::FileLoggingConfig;
pub use optimizer::FileOptimizerConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use provider::{FileProviderConfig, ProviderKind};
pub use thoughts::FileThoughtsConfig;

use serde::{Deserialize, Serialize};
use thinktank_application::EngineConfig;
use thinktank_domain::{Agent, ConfigIssue, ConfigIssueCode, ProjectId};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Tree-of-thought expansion
    pub thoughts: FileThoughtsConfig,
    /// Response optimization loop
    pub optimizer: FileOptimizerConfig,
    /// Divergence detection and conflict resolution
    pub collaboration: FileCollaborationConfig,
    /// Timeouts and confidence penalties
    pub orchestrator: FileOrchestratorConfig,
    /// Diagnostics and request event log destinations
    pub logging: FileLoggingConfig,
    /// AI service adapter selection
    pub provider: FileProviderConfig,
    /// Seed agents for the CLI project
    pub agents: Vec<FileAgentSeed>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.thoughts.to_params().1);
        issues.extend(self.optimizer.parse_strategy().1);
        issues.extend(self.collaboration.to_params().1);
        issues.extend(self.orchestrator.to_params().1);
        issues.extend(self.provider.parse_kind().1);
        issues.extend(agents::validate_seeds(&self.agents));
        issues
    }

    /// Build the engine configuration, with defaults for invalid values.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_thoughts(self.thoughts.to_params().0)
            .with_optimizer(self.optimizer.parse_strategy().0)
            .with_collaboration(self.collaboration.to_params().0)
            .with_orchestrator(self.orchestrator.to_params().0)
    }

    /// Agents for `project_id`; the default team when none are configured.
    pub fn seed_agents(&self, project_id: &ProjectId) -> Vec<Agent> {
        agents::seed_agents(&self.agents, project_id)
    }
}

/// Warn and fall back unless `value` lies in `[0, 1]`.
fn check_unit_interval(field: &str, value: f64, default: f64, issues: &mut Vec<ConfigIssue>) -> f64 {
    if (0.0..=1.0).contains(&value) {
        return value;
    }
    issues.push(ConfigIssue::warning(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
        },
        format!("{}: {} is outside 0.0..=1.0, using {}", field, value, default),
    ));
    default
}

/// Warn and fall back when `value` is zero.
fn check_positive(field: &str, value: usize, default: usize, issues: &mut Vec<ConfigIssue>) -> usize {
    if value > 0 {
        return value;
    }
    issues.push(ConfigIssue::warning(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
        },
        format!("{} must be at least 1, using {}", field, default),
    ));
    default
}

fn invalid_enum(field: &str, value: &str, valid: &[&str], fallback: &str) -> ConfigIssue {
    ConfigIssue::warning(
        ConfigIssueCode::InvalidEnumValue {
            field: field.to_string(),
            value: value.to_string(),
            valid_values: valid.iter().map(|v| v.to_string()).collect(),
        },
        format!("{}: unknown value '{}', falling back to '{}'", field, value, fallback),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use thinktank_domain::{OptimizationStrategy, ResolutionStrategy, Severity};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[thoughts]
candidates_per_step = 4
max_depth = 2

[optimizer]
strategy = "single_pass"
blend_weight = 0.6

[collaboration]
strategy = "highest_confidence"
session_type = "decision_making"

[orchestrator]
ai_call_timeout_seconds = 15

[logging]
event_log = "events.jsonl"

[provider]
kind = "http"
model = "local-model"

[[agents]]
id = "ada"
name = "Ada"
role = "strategy"

[[agents]]
name = "Rex"
role = "reviewer"
capabilities = ["security"]
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());

        let engine = config.to_engine_config();
        assert_eq!(engine.thoughts.candidates_per_step, 4);
        assert_eq!(engine.thoughts.bounds.max_depth, 2);
        assert_eq!(engine.thoughts.bounds.max_branching, 2);
        assert_eq!(engine.optimizer, OptimizationStrategy::SinglePass { blend_weight: 0.6 });
        assert_eq!(engine.collaboration.strategy, ResolutionStrategy::HighestConfidence);
        assert_eq!(
            engine.orchestrator.ai_call_timeout,
            Some(Duration::from_secs(15))
        );

        assert_eq!(config.provider.parse_kind().0, ProviderKind::Http);
        assert_eq!(config.provider.model, "local-model");
        assert_eq!(config.logging.event_log.as_deref(), Some("events.jsonl"));

        let agents = config.seed_agents(&ProjectId::new("p"));
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].id.as_str(), "ada");
        assert!(agents[1].has_capability("security"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.validate().is_empty());
        assert_eq!(config.to_engine_config(), EngineConfig::default());
        assert_eq!(config.seed_agents(&ProjectId::new("p")).len(), 3);
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[thoughts]
branching = 0

[optimizer]
strategy = "annealing"

[collaboration]
divergence_threshold = 3.0

[[agents]]
name = ""
role = "strategy"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();

        assert_eq!(issues.len(), 4);
        assert_eq!(
            issues.iter().filter(|i| i.severity == Severity::Error).count(),
            1
        );
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::OutOfRange { field, .. } if field == "thoughts.branching"
        )));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::InvalidEnumValue { field, .. } if field == "optimizer.strategy"
        )));
    }

    #[test]
    fn test_wrong_value_type_is_an_error() {
        let result: Result<FileConfig, _> = toml::from_str("[thoughts]\nmax_depth = \"deep\"");
        assert!(result.is_err());
    }
}
