//! Response optimization domain
//!
//! Termination and calibration policy for recursive meta-prompting, plus
//! parsing of quality ratings returned by the AI service.

pub mod parsing;
pub mod strategy;

pub use parsing::parse_quality_score;
pub use strategy::{
    DEFAULT_MAX_ITERATIONS, HIGH_CONFIDENCE_THRESHOLD, OptimizationStrategy, RecursiveConfig,
};
