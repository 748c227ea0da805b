//! Progress bar for sync transfers
//!
//! Counts finished transfers rather than bytes, since many objects move at
//! once.

use s3sync_core::TransferObserver;

use super::OutputConfig;

/// Progress bar wrapper
///
/// In quiet, JSON or `--no-progress` mode nothing is drawn.
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

fn hidden(config: &OutputConfig) -> bool {
    config.quiet || config.json || config.no_progress
}

impl ProgressBar {
    /// Create a progress bar over `total` transfers
    pub fn new(config: &OutputConfig, total: u64, message: &str) -> Self {
        let bar = if hidden(config) {
            None
        } else {
            let style = indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("#>-");
            let bar = indicatif::ProgressBar::new(total);
            bar.set_style(style);
            bar.set_message(message.to_string());
            Some(bar)
        };

        Self { bar }
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(config: &OutputConfig, message: &str) -> Self {
        let bar = if hidden(config) {
            None
        } else {
            let bar = indicatif::ProgressBar::new_spinner();
            bar.set_style(
                indicatif::ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
            );
            bar.set_message(message.to_string());
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(bar)
        };

        Self { bar }
    }

    /// Increment progress
    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Check if progress bar is visible
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    pub fn position(&self) -> u64 {
        self.bar.as_ref().map_or(0, indicatif::ProgressBar::position)
    }
}

impl TransferObserver for ProgressBar {
    fn on_finished(&self, _key: &str, _success: bool) {
        self.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_quiet_mode() {
        let config = OutputConfig {
            quiet: true,
            ..Default::default()
        };
        let bar = ProgressBar::new(&config, 100, "Uploading");
        assert!(!bar.is_visible());
    }

    #[test]
    fn test_progress_bar_json_mode() {
        let config = OutputConfig {
            json: true,
            ..Default::default()
        };
        assert!(!ProgressBar::new(&config, 100, "Uploading").is_visible());
        assert!(!ProgressBar::spinner(&config, "Scanning").is_visible());
    }

    #[test]
    fn test_progress_bar_no_progress() {
        let config = OutputConfig {
            no_progress: true,
            ..Default::default()
        };
        let bar = ProgressBar::new(&config, 100, "Uploading");
        assert!(!bar.is_visible());
    }

    #[test]
    fn test_observer_advances_bar() {
        let bar = ProgressBar::new(&OutputConfig::default(), 3, "Downloading");
        assert!(bar.is_visible());
        bar.on_finished("a.txt", true);
        bar.on_finished("b.txt", false);
        assert_eq!(bar.position(), 2);
        bar.finish_and_clear();
    }
}
