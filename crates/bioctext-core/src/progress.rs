//! Progress reporting for TTY and non-TTY environments.
//!
//! TTY mode: one indicatif spinner per input path (cleared on completion).
//! Non-TTY mode: hidden bars, logs are the only progress indicator.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:.cyan} {wide_msg:.dim}")
        .expect("invalid template")
}

/// Central progress context managing stderr progress bars.
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    /// Create new context, detecting TTY automatically.
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty: std::io::stderr().is_terminal(),
        }
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }

    /// Spinner for one input path; hidden when stderr is not a TTY.
    ///
    /// Update with `set_message` as members are processed, then
    /// `finish_and_clear` when the path is done.
    pub fn path_spinner(&self, name: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(spinner_style());
        pb.set_prefix(name.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}
