//! Response optimization strategies.
//!
//! The strategy decides when the optimizer keeps iterating and how a
//! candidate's confidence is calibrated against measured quality.

use crate::response::AgentResponse;
use crate::thought::clamp_confidence;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence at or above which a response needs no further work.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.9;

/// Hard iteration cap for recursive optimization.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Parameters of the recursive meta-prompting loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecursiveConfig {
    pub confidence_threshold: f64,
    pub max_iterations: usize,
    /// Weight of the candidate's own confidence in the calibrated value;
    /// the remainder goes to measured quality.
    pub blend_weight: f64,
    /// Stop after this many consecutive iterations without improvement.
    pub stall_patience: Option<usize>,
}

impl Default for RecursiveConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: HIGH_CONFIDENCE_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            blend_weight: 0.5,
            stall_patience: Some(3),
        }
    }
}

/// Optimization strategy, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizationStrategy {
    /// Rewrite and re-score until confident or out of budget.
    Recursive(RecursiveConfig),
    /// At most one improvement attempt.
    SinglePass { blend_weight: f64 },
    /// Return the draft untouched.
    Disabled,
}

impl Default for OptimizationStrategy {
    fn default() -> Self {
        OptimizationStrategy::Recursive(RecursiveConfig::default())
    }
}

impl OptimizationStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            OptimizationStrategy::Recursive(_) => "recursive",
            OptimizationStrategy::SinglePass { .. } => "single_pass",
            OptimizationStrategy::Disabled => "disabled",
        }
    }

    /// Whether another improvement iteration should run.
    ///
    /// `iteration` counts completed iterations, starting at 0.
    pub fn should_continue(&self, response: &AgentResponse, iteration: usize) -> bool {
        match self {
            OptimizationStrategy::Recursive(config) => {
                response.confidence < config.confidence_threshold
                    && iteration < config.max_iterations
            }
            OptimizationStrategy::SinglePass { .. } => {
                response.confidence < HIGH_CONFIDENCE_THRESHOLD && iteration < 1
            }
            OptimizationStrategy::Disabled => false,
        }
    }

    /// Blend a candidate's confidence with its measured quality.
    pub fn calibrate(&self, candidate_confidence: f64, quality: f64) -> f64 {
        let weight = match self {
            OptimizationStrategy::Recursive(config) => config.blend_weight,
            OptimizationStrategy::SinglePass { blend_weight } => *blend_weight,
            OptimizationStrategy::Disabled => 1.0,
        }
        .clamp(0.0, 1.0);
        clamp_confidence(weight * candidate_confidence + (1.0 - weight) * quality)
    }

    pub fn max_iterations(&self) -> usize {
        match self {
            OptimizationStrategy::Recursive(config) => config.max_iterations,
            OptimizationStrategy::SinglePass { .. } => 1,
            OptimizationStrategy::Disabled => 0,
        }
    }

    pub fn stall_patience(&self) -> Option<usize> {
        match self {
            OptimizationStrategy::Recursive(config) => config.stall_patience,
            _ => None,
        }
    }

    pub fn target_confidence(&self) -> f64 {
        match self {
            OptimizationStrategy::Recursive(config) => config.confidence_threshold,
            _ => HIGH_CONFIDENCE_THRESHOLD,
        }
    }
}

impl fmt::Display for OptimizationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
