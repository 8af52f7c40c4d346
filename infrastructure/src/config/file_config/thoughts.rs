//! Tree-of-thought configuration from TOML (`[thoughts]` section)

use super::{check_positive, check_unit_interval};
use serde::{Deserialize, Serialize};
use thinktank_application::ThoughtParams;
use thinktank_domain::ConfigIssue;

/// Raw `[thoughts]` section
///
/// # Example
///
/// ```toml
/// [thoughts]
/// candidates_per_step = 3
/// max_depth = 3
/// branching = 2
/// convergence_epsilon = 0.02
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileThoughtsConfig {
    /// Candidates requested from the AI service per expansion
    pub candidates_per_step: usize,
    /// Maximum tree depth (top-level thoughts have depth 1)
    pub max_depth: usize,
    /// Children kept per node
    pub branching: usize,
    /// Minimum confidence gain for a child to count as progress
    pub convergence_epsilon: f64,
}

impl Default for FileThoughtsConfig {
    fn default() -> Self {
        let params = ThoughtParams::default();
        Self {
            candidates_per_step: params.candidates_per_step,
            max_depth: params.bounds.max_depth,
            branching: params.bounds.max_branching,
            convergence_epsilon: params.convergence_epsilon,
        }
    }
}

impl FileThoughtsConfig {
    /// Convert to [`ThoughtParams`], replacing invalid values with defaults.
    pub fn to_params(&self) -> (ThoughtParams, Vec<ConfigIssue>) {
        let defaults = Self::default();
        let mut issues = Vec::new();

        let k = check_positive(
            "thoughts.candidates_per_step",
            self.candidates_per_step,
            defaults.candidates_per_step,
            &mut issues,
        );
        let depth = check_positive("thoughts.max_depth", self.max_depth, defaults.max_depth, &mut issues);
        let branching = check_positive("thoughts.branching", self.branching, defaults.branching, &mut issues);
        let epsilon = check_unit_interval(
            "thoughts.convergence_epsilon",
            self.convergence_epsilon,
            defaults.convergence_epsilon,
            &mut issues,
        );

        let params = ThoughtParams::default()
            .with_candidates_per_step(k)
            .with_max_depth(depth)
            .with_branching(branching)
            .with_convergence_epsilon(epsilon);
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thinktank_domain::ConfigIssueCode;

    #[test]
    fn test_defaults_convert_cleanly() {
        let (params, issues) = FileThoughtsConfig::default().to_params();
        assert!(issues.is_empty());
        assert_eq!(params, ThoughtParams::default());
    }

    #[test]
    fn test_zero_depth_falls_back() {
        let config = FileThoughtsConfig {
            max_depth: 0,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.bounds.max_depth, 3);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::OutOfRange { field, .. } if field == "thoughts.max_depth"
        ));
    }

    #[test]
    fn test_epsilon_out_of_range() {
        let config = FileThoughtsConfig {
            convergence_epsilon: 1.5,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.convergence_epsilon, 0.02);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
