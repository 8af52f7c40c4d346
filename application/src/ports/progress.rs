//! Progress notification port
//!
//! Defines the interface for reporting progress while a request moves
//! through its phases.

use thinktank_domain::{Agent, RequestPhase};

/// Callback for progress updates during a request
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts; `total_tasks` is 0 for phases without fan-out
    fn on_phase_start(&self, phase: &RequestPhase, total_tasks: usize);

    /// Called when one agent finishes its share of a phase
    fn on_task_complete(&self, phase: &RequestPhase, agent: &Agent, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &RequestPhase);

    /// Called after each optimizer iteration
    fn on_optimization_iteration(&self, _iteration: usize, _confidence: f64) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &RequestPhase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &RequestPhase, _agent: &Agent, _success: bool) {}
    fn on_phase_complete(&self, _phase: &RequestPhase) {}
}
