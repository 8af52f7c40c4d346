//! EngineConfig: container for everything the orchestrator needs.
//!
//! Assembled by the infrastructure config loader (or by tests) and handed
//! to [`Orchestrator`](crate::use_cases::process_input::Orchestrator).
//!
//! | Field | Consumed by |
//! |-------|-------------|
//! | `thoughts` | `ThoughtEngine` |
//! | `optimizer` | `ResponseOptimizer` |
//! | `collaboration` | `CollaborationManager` |
//! | `orchestrator` | `Orchestrator` |

use super::{CollaborationParams, OrchestratorParams, ThoughtParams};
use serde::{Deserialize, Serialize};
use thinktank_domain::OptimizationStrategy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub thoughts: ThoughtParams,
    pub optimizer: OptimizationStrategy,
    pub collaboration: CollaborationParams,
    pub orchestrator: OrchestratorParams,
}

impl EngineConfig {
    pub fn with_thoughts(mut self, thoughts: ThoughtParams) -> Self {
        self.thoughts = thoughts;
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizationStrategy) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_collaboration(mut self, collaboration: CollaborationParams) -> Self {
        self.collaboration = collaboration;
        self
    }

    pub fn with_orchestrator(mut self, orchestrator: OrchestratorParams) -> Self {
        self.orchestrator = orchestrator;
        self
    }
}
