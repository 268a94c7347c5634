//! Spinner shown while waiting on the browser or the network.

use std::time::Duration;

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;

/// Terminal spinner; clears itself on drop.
///
/// Hidden when stdout is not a terminal or when output is quiet or JSON.
pub struct CliSpinner {
    bar: ProgressBar,
}

impl CliSpinner {
    /// Starts a spinner showing `message`.
    #[must_use]
    pub fn start(message: &str, visible: bool) -> Self {
        let bar = if visible && Self::should_show() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };

        // Template: "⠋ Waiting for browser sign-in (12s)"
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }
}

impl Drop for CliSpinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_when_not_requested() {
        let spinner = CliSpinner::start("Uploading", false);
        assert!(spinner.bar.is_hidden());
    }
}
