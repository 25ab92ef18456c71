//! Rendering workflow events on the terminal.

use crate::utils::progress::{ProgressBar, format_transfer};
use crate::workflow::{Stage, WorkflowEvent, WorkflowHandle};
use anyhow::{Context, Result};

/// Draws a percentage bar driven by [`WorkflowEvent`]s.
pub struct TerminalProgress {
    bar: ProgressBar,
    quiet: bool,
}

impl TerminalProgress {
    pub fn new(hidden: bool, quiet: bool) -> Self {
        Self {
            bar: ProgressBar::new(100, hidden),
            quiet,
        }
    }

    /// Apply one event to the bar.
    pub fn handle(&self, event: &WorkflowEvent) {
        match event {
            WorkflowEvent::Stage(stage) => {
                self.bar.set_position(u64::from(stage.percent()));
                self.bar.set_message(stage.label());
            }
            WorkflowEvent::DownloadProgress { downloaded, total } => {
                if let Some(total) = total.filter(|total| *total > 0) {
                    let span = u64::from(
                        Stage::DownloadComplete.percent() - Stage::DownloadStart.percent(),
                    );
                    let position = u64::from(Stage::DownloadStart.percent())
                        + span * (*downloaded).min(total) / total;
                    self.bar.set_position(position);
                }
                self.bar.set_message(format!(
                    "{} {}",
                    Stage::DownloadStart.label(),
                    format_transfer(*downloaded, *total)
                ));
            }
            WorkflowEvent::BackupCreated(backup) => {
                if !self.quiet {
                    self.bar.println(format!("Backup created: {}", backup.path.display()));
                }
            }
            WorkflowEvent::BackupSkipped => {
                if !self.quiet {
                    self.bar.println("No existing installation found; installing fresh");
                }
            }
        }
    }

    /// Consume all events of `handle` and return the workflow result.
    pub async fn drive<T>(self, mut handle: WorkflowHandle<T>) -> Result<T> {
        while let Some(event) = handle.events.recv().await {
            self.handle(&event);
        }

        let result = handle.task.await.context("Workflow task failed")?;
        match &result {
            Ok(_) => self.bar.finish_and_clear(),
            Err(e) => self.bar.abandon_with_message(format!("Failed during {}", e.stage())),
        }
        Ok(result?)
    }
}
