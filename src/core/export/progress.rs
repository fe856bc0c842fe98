//! Progress reporting for export operations
//!
//! The reporter is initialised with the declared hit total of the first page
//! and advanced once per exported hit. Position counts hits so it stays in the
//! same unit as the total; the byte volume is shown alongside.

use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Observer of export progress
pub trait ProgressReporter: Send {
    /// Called once with the declared total hit count (may be zero)
    fn init(&mut self, total: u64);

    /// Called once per exported hit with the hit's size in bytes
    fn advance(&mut self, hit_bytes: u64);

    /// Called exactly once when pagination ends, on success or failure
    fn finish(&mut self);
}

/// Progress bar on stderr
pub struct ConsoleProgress {
    bar: ProgressBar,
    bytes: u64,
}

impl ConsoleProgress {
    /// Create a reporter, drawing to stderr only when `enabled`
    pub fn new(enabled: bool) -> Self {
        let bar = ProgressBar::hidden();
        if enabled {
            bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        Self { bar, bytes: 0 }
    }

    /// Bytes reported so far
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Hits reported so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn init(&mut self, total: u64) {
        self.bar.set_length(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, eta {eta}) {msg}")
        {
            self.bar.set_style(style.progress_chars("#>-"));
        }
    }

    fn advance(&mut self, hit_bytes: u64) {
        self.bytes += hit_bytes;
        self.bar.inc(1);
        self.bar.set_message(HumanBytes(self.bytes).to_string());
    }

    fn finish(&mut self) {
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts_hits_and_bytes() {
        let mut progress = ConsoleProgress::new(false);
        progress.init(3);
        progress.advance(100);
        progress.advance(28);
        progress.finish();

        assert_eq!(progress.position(), 2);
        assert_eq!(progress.bytes(), 128);
    }

    #[test]
    fn test_progress_tolerates_empty_total() {
        let mut progress = ConsoleProgress::new(false);
        progress.init(0);
        progress.finish();
        assert_eq!(progress.position(), 0);
    }
}
