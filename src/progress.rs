//! Progress bar display for provisioning runs

use indicatif::{ProgressBar, ProgressStyle};

/// One bar over every (version, component) step of a run
pub struct ProgressDisplay {
    step_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total step count
    pub fn new(total_steps: u64) -> Self {
        let step_style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let step_pb = ProgressBar::new(total_steps);
        step_pb.set_style(step_style);

        Self { step_pb }
    }

    /// A display that draws nothing (`--quiet` and tests)
    pub fn hidden() -> Self {
        Self {
            step_pb: ProgressBar::hidden(),
        }
    }

    /// Grow the bar once the run's step count is known
    pub fn set_total(&self, total_steps: u64) {
        self.step_pb.set_length(total_steps);
    }

    /// Update to show the component currently being set up
    pub fn update_step(&self, version: &str, component: &str) {
        self.step_pb.set_message(format!("{version}: {component}"));
    }

    /// Increment step progress
    pub fn inc_step(&self) {
        self.step_pb.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.step_pb.position()
    }

    pub fn finish(&self) {
        self.step_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.step_pb.abandon();
    }
}
