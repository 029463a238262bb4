//! Progress indicators

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A single analysis phase backed by an indicatif spinner.
///
/// Create with [`Step::new`], then call [`Step::finish`] or [`Step::warn`]
/// as the work completes. A hidden step draws nothing and prints nothing,
/// which keeps stdout/stderr clean for machine-readable output.
pub struct Step {
    pb: ProgressBar,
    label: String,
    visible: bool,
}

impl Step {
    /// Start a new spinner step with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("{}...", label));
        pb.enable_steady_tick(Duration::from_millis(80));
        Self {
            pb,
            label,
            visible: true,
        }
    }

    /// A step that reports nothing
    pub fn hidden(label: impl Into<String>) -> Self {
        Self {
            pb: ProgressBar::hidden(),
            label: label.into(),
            visible: false,
        }
    }

    /// Start a visible step only when `visible` is set
    pub fn maybe(label: impl Into<String>, visible: bool) -> Self {
        if visible {
            Self::new(label)
        } else {
            Self::hidden(label)
        }
    }

    /// Finish successfully: prints `"  label... done ({summary})"`.
    pub fn finish(&self, summary: &str) {
        self.pb.finish_and_clear();
        if self.visible {
            eprintln!("  {}... {} ({})", self.label, "done".green(), summary);
        }
    }

    /// Print a warning line above the spinner (or inline on non-TTY).
    pub fn warn(&self, msg: impl std::fmt::Display) {
        if self.visible {
            self.pb.println(format!("  {}: {}", "warn".yellow(), msg));
        }
    }
}
