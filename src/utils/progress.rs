//! Progress indicators for the command-line front end
//!
//! Thin wrappers around `indicatif` giving the installer a consistent look.
//! Bars are created hidden when progress output is disabled (`--no-progress`,
//! `MODLOADER_INSTALLER_NO_PROGRESS`, or a non-terminal stderr), so callers never
//! need to branch on that themselves.
//!
//! # Examples
//!
//! ```rust
//! use modloader_installer::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::new(100, true);
//! progress.set_position(30);
//! progress.set_message("Downloading...");
//! progress.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::io::IsTerminal;

/// Whether progress output should be suppressed.
///
/// True when `disabled` is set or stderr is not a terminal.
pub fn progress_hidden(disabled: bool) -> bool {
    disabled || !std::io::stderr().is_terminal()
}

/// A progress bar that is either visible or a silent no-op.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Create a bar with `len` steps, hidden when `hidden` is true.
    pub fn new(len: u64, hidden: bool) -> Self {
        let bar = if hidden {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(ProgressStyle::stages());
            bar
        };
        Self { inner: bar }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn set_position(&self, pos: u64) {
        self.inner.set_position(pos);
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Stop drawing and leave the bar where it is, with a final message.
    pub fn abandon_with_message(&self, msg: impl Into<String>) {
        self.inner.abandon_with_message(msg.into());
    }

    /// Print a line above the bar without corrupting it.
    pub fn println(&self, msg: impl AsRef<str>) {
        if self.inner.is_hidden() {
            eprintln!("{}", msg.as_ref());
        } else {
            self.inner.println(msg.as_ref());
        }
    }
}

/// Predefined styles.
pub struct ProgressStyle;

impl ProgressStyle {
    /// Percentage bar used for workflow stages.
    pub fn stages() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| IndicatifStyle::default_bar())
            .progress_chars("━╸━")
    }
}

/// Render `downloaded` (and `total` when known) as human-readable sizes.
pub fn format_transfer(downloaded: u64, total: Option<u64>) -> String {
    match total {
        Some(total) if total > 0 => {
            format!("{} / {}", indicatif::HumanBytes(downloaded), indicatif::HumanBytes(total))
        }
        _ => indicatif::HumanBytes(downloaded).to_string(),
    }
}
