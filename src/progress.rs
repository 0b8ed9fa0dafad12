//! Progress bar utilities for offline simulation runs
//!
//! Visual feedback while ticking the simulator many times in a row,
//! using the indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a batch of simulated ticks
pub struct SimulationProgress {
    pub progress: ProgressBar,
    pub total_ticks: u64,
}

impl SimulationProgress {
    /// Create a new simulation progress bar
    pub fn new(total_ticks: u64) -> Self {
        let progress = ProgressBar::new(total_ticks);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ticks\n{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        Self {
            progress,
            total_ticks,
        }
    }

    /// Hidden bar for non-interactive output (e.g. JSON mode)
    pub fn hidden(total_ticks: u64) -> Self {
        Self {
            progress: ProgressBar::hidden(),
            total_ticks,
        }
    }

    /// Advance one tick and show the ups/downs seen so far
    pub fn tick(&self, ups: usize, downs: usize) {
        self.progress.inc(1);
        self.progress.set_message(format!("📈 {} up | 📉 {} down", ups, downs));
    }

    pub fn finish(&self, crashes: usize) {
        self.progress.finish_with_message(format!(
            "✅ Simulated {} ticks ({} crashes)",
            self.total_ticks, crashes
        ));
    }
}
