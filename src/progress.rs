//! Progress display for the download pipeline
//!
//! A single in-place status line ending in cycling dots, drawn with indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Interval between dot updates
const TICK_INTERVAL: Duration = Duration::from_millis(750);

/// Progress reporter for the pipeline
pub struct Progress {
    /// Whether progress display is enabled (disabled in quiet mode)
    enabled: bool,
    /// Current status line
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show a status line with animated dots
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&[".", "..", "...", ""])
                .template("{msg} {spinner}")
                .expect("Invalid template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(TICK_INTERVAL);
        self.bar = Some(spinner);
    }

    /// Replace the status text
    pub fn set_message(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Whether a status line is currently shown
    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Finish and clear the current status line
    pub fn finish_and_clear(&mut self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        self.bar = None;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}
