//! Thought generation parameters.

use serde::{Deserialize, Serialize};
use thinktank_domain::TreeBounds;

/// Controls how far and how wide each agent's thought tree grows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThoughtParams {
    /// Candidates requested from the AI service per expansion step (`k`).
    pub candidates_per_step: usize,
    /// Depth and branching limits.
    pub bounds: TreeBounds,
    /// Minimum confidence gain for a child to be kept over its parent.
    pub convergence_epsilon: f64,
}

impl Default for ThoughtParams {
    fn default() -> Self {
        Self {
            candidates_per_step: 3,
            bounds: TreeBounds::default(),
            convergence_epsilon: 0.02,
        }
    }
}

impl ThoughtParams {
    pub fn with_candidates_per_step(mut self, k: usize) -> Self {
        self.candidates_per_step = k.max(1);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.bounds.max_depth = depth.max(1);
        self
    }

    pub fn with_branching(mut self, branching: usize) -> Self {
        self.bounds.max_branching = branching.max(1);
        self
    }

    pub fn with_convergence_epsilon(mut self, epsilon: f64) -> Self {
        self.convergence_epsilon = epsilon.max(0.0);
        self
    }

    /// Single-level variant used as the standby path of thought generation.
    pub fn shallow(&self) -> Self {
        Self {
            bounds: TreeBounds {
                max_depth: 1,
                ..self.bounds
            },
            ..*self
        }
    }
}
