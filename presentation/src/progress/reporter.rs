//! Progress reporting for request processing

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use thinktank_application::ProgressNotifier;
use thinktank_domain::{Agent, RequestPhase};

/// Reports progress during a request with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn set_bar(&self, bar: Option<ProgressBar>) -> Option<ProgressBar> {
        match self.phase_bar.lock() {
            Ok(mut slot) => std::mem::replace(&mut *slot, bar),
            Err(_) => None,
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(bar) = slot.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &RequestPhase, total_tasks: usize) {
        let bar = if total_tasks > 0 {
            let bar = self.multi.add(ProgressBar::new(total_tasks as u64));
            bar.set_style(Self::phase_style());
            bar
        } else {
            let bar = self.multi.add(ProgressBar::new_spinner());
            bar.set_style(Self::spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_prefix(phase.display_name().to_string());
        bar.set_message("Starting...");

        if let Some(previous) = self.set_bar(Some(bar)) {
            previous.finish_and_clear();
        }
    }

    fn on_task_complete(&self, _phase: &RequestPhase, agent: &Agent, success: bool) {
        self.with_bar(|bar| {
            let status = if success {
                format!("{} {}", "v".green(), agent.name)
            } else {
                format!("{} {}", "x".red(), agent.name)
            };
            bar.set_message(status);
            bar.inc(1);
        });
    }

    fn on_phase_complete(&self, phase: &RequestPhase) {
        if let Some(bar) = self.set_bar(None) {
            bar.finish_with_message(format!("{} complete", phase.display_name().green()));
        }
    }

    fn on_optimization_iteration(&self, iteration: usize, confidence: f64) {
        self.with_bar(|bar| {
            bar.set_message(format!(
                "iteration {} (confidence {:.0}%)",
                iteration,
                confidence * 100.0
            ));
        });
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &RequestPhase, total_tasks: usize) {
        if total_tasks > 0 {
            eprintln!(
                "{} {} ({} agents)",
                "->".cyan(),
                phase.display_name().bold(),
                total_tasks
            );
        } else {
            eprintln!("{} {}", "->".cyan(), phase.display_name().bold());
        }
    }

    fn on_task_complete(&self, _phase: &RequestPhase, agent: &Agent, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), agent.name);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), agent.name);
        }
    }

    fn on_phase_complete(&self, _phase: &RequestPhase) {}

    fn on_optimization_iteration(&self, iteration: usize, confidence: f64) {
        eprintln!(
            "  {} iteration {}: {:.0}%",
            "~".dimmed(),
            iteration,
            confidence * 100.0
        );
    }
}
