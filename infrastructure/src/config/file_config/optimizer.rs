//! Response optimizer configuration from TOML (`[optimizer]` section)

use super::{check_positive, check_unit_interval, invalid_enum};
use serde::{Deserialize, Serialize};
use thinktank_domain::{ConfigIssue, OptimizationStrategy, RecursiveConfig};

const STRATEGIES: [&str; 3] = ["recursive", "single_pass", "disabled"];

/// Raw `[optimizer]` section
///
/// # Example
///
/// ```toml
/// [optimizer]
/// strategy = "recursive"
/// confidence_threshold = 0.9
/// max_iterations = 10
/// blend_weight = 0.5
/// stall_patience = 3   # 0 disables early stopping
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOptimizerConfig {
    pub strategy: String,
    pub confidence_threshold: f64,
    pub max_iterations: usize,
    pub blend_weight: f64,
    pub stall_patience: usize,
}

impl Default for FileOptimizerConfig {
    fn default() -> Self {
        let recursive = RecursiveConfig::default();
        Self {
            strategy: "recursive".to_string(),
            confidence_threshold: recursive.confidence_threshold,
            max_iterations: recursive.max_iterations,
            blend_weight: recursive.blend_weight,
            stall_patience: recursive.stall_patience.unwrap_or(0),
        }
    }
}

impl FileOptimizerConfig {
    /// Convert to an [`OptimizationStrategy`].
    ///
    /// Unknown strategy names fall back to `recursive` with a warning.
    pub fn parse_strategy(&self) -> (OptimizationStrategy, Vec<ConfigIssue>) {
        let defaults = RecursiveConfig::default();
        let mut issues = Vec::new();

        let blend_weight = check_unit_interval(
            "optimizer.blend_weight",
            self.blend_weight,
            defaults.blend_weight,
            &mut issues,
        );

        let strategy = match self.strategy.to_lowercase().replace('-', "_").as_str() {
            "disabled" | "off" | "none" => OptimizationStrategy::Disabled,
            "single_pass" | "single" => OptimizationStrategy::SinglePass { blend_weight },
            other => {
                if other != "recursive" {
                    issues.push(invalid_enum("optimizer.strategy", &self.strategy, &STRATEGIES, "recursive"));
                }
                OptimizationStrategy::Recursive(RecursiveConfig {
                    confidence_threshold: check_unit_interval(
                        "optimizer.confidence_threshold",
                        self.confidence_threshold,
                        defaults.confidence_threshold,
                        &mut issues,
                    ),
                    max_iterations: check_positive(
                        "optimizer.max_iterations",
                        self.max_iterations,
                        defaults.max_iterations,
                        &mut issues,
                    ),
                    blend_weight,
                    stall_patience: (self.stall_patience > 0).then_some(self.stall_patience),
                })
            }
        };

        (strategy, issues)
    }
}
