//! The install and restore workflows.
//!
//! [`Installer`] composes the release resolver, the backup manager and the
//! install executor into two strictly sequential workflows:
//!
//! ```text
//! install: resolve -> backup -> download -> extract
//! restore: select -> delete existing -> copy backup in
//! ```
//!
//! Each step starts only after the previous one succeeded; the first failure
//! aborts the workflow and is returned as is. Nothing is retried.
//!
//! Progress is reported through the [`ProgressReporter`] trait as an ordered
//! sequence of [`Stage`]s with advisory percentages, plus byte counts while the
//! archive downloads. The workflow never renders anything itself: a terminal
//! front end, a GUI or a test can each implement the trait, or use the
//! implementation for [`UnboundedSender<WorkflowEvent>`] and consume events from
//! the other end of the channel ([`Installer::spawn_install`] sets that up).
//!
//! # Examples
//!
//! ```rust,no_run
//! use modloader_installer::config::InstallerConfig;
//! use modloader_installer::workflow::{Installer, NoProgress};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let installer = Installer::new(InstallerConfig::from_current_exe()?)?;
//! let outcome = installer
//!     .install(
//!         "https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2",
//!         Path::new("/games/tModLoader"),
//!         &NoProgress,
//!     )
//!     .await?;
//! println!("Installed {}", outcome.tag);
//! # Ok(())
//! # }
//! ```

use crate::backup::{Backup, BackupManager};
use crate::config::InstallerConfig;
use crate::core::Result;
use crate::installer::{ExtractSummary, InstallExecutor};
use crate::release::{DownloadAsset, ReleaseReference, ReleaseResolver};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Workflow stages in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    BackupStart,
    DownloadPrep,
    DownloadStart,
    DownloadComplete,
    ExtractStart,
    FinalProcess,
    Complete,
    RestorePrep,
    /// Only reported when the install target exists.
    RestoreDelete,
    RestoreCopy,
    RestoreFinal,
    RestoreComplete,
}

impl Stage {
    /// Advisory completion percentage.
    pub const fn percent(self) -> u8 {
        match self {
            Self::BackupStart => 10,
            Self::DownloadPrep | Self::RestorePrep => 20,
            Self::DownloadStart => 30,
            Self::RestoreDelete => 40,
            Self::RestoreCopy => 60,
            Self::DownloadComplete => 70,
            Self::ExtractStart => 80,
            Self::RestoreFinal => 90,
            Self::FinalProcess => 95,
            Self::Complete | Self::RestoreComplete => 100,
        }
    }

    /// Short human readable description.
    pub const fn label(self) -> &'static str {
        match self {
            Self::BackupStart => "Creating backup...",
            Self::DownloadPrep => "Preparing download...",
            Self::DownloadStart => "Downloading...",
            Self::DownloadComplete => "Download complete",
            Self::ExtractStart => "Extracting files...",
            Self::FinalProcess => "Finishing...",
            Self::Complete => "Install complete!",
            Self::RestorePrep => "Preparing restore...",
            Self::RestoreDelete => "Removing existing folder...",
            Self::RestoreCopy => "Restoring from backup...",
            Self::RestoreFinal => "Finishing restore...",
            Self::RestoreComplete => "Restore complete!",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::RestoreComplete)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything a workflow reports while running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    Stage(Stage),
    /// Bytes written so far and the total when known.
    DownloadProgress { downloaded: u64, total: Option<u64> },
    /// The install target was snapshotted.
    BackupCreated(Backup),
    /// The install target did not exist, so no backup was taken.
    BackupSkipped,
}

/// Receives workflow progress.
///
/// Only [`stage`](Self::stage) is required; the other callbacks default to
/// doing nothing.
pub trait ProgressReporter: Send + Sync {
    fn stage(&self, stage: Stage);

    fn download_progress(&self, _downloaded: u64, _total: Option<u64>) {}

    /// Called once per install with the backup taken, or `None` when skipped.
    fn backup(&self, _backup: Option<&Backup>) {}
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn stage(&self, _stage: Stage) {}
}

/// Forwards progress as [`WorkflowEvent`]s. A closed receiver is ignored.
impl ProgressReporter for UnboundedSender<WorkflowEvent> {
    fn stage(&self, stage: Stage) {
        let _ = self.send(WorkflowEvent::Stage(stage));
    }

    fn download_progress(&self, downloaded: u64, total: Option<u64>) {
        let _ = self.send(WorkflowEvent::DownloadProgress { downloaded, total });
    }

    fn backup(&self, backup: Option<&Backup>) {
        let event = match backup {
            Some(backup) => WorkflowEvent::BackupCreated(backup.clone()),
            None => WorkflowEvent::BackupSkipped,
        };
        let _ = self.send(event);
    }
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Release tag that was installed.
    pub tag: String,
    /// The archive that was downloaded.
    pub asset: DownloadAsset,
    /// Backup taken before extraction, `None` for a fresh install.
    pub backup: Option<Backup>,
    /// What extraction wrote.
    pub extracted: ExtractSummary,
}

/// A workflow running on its own task.
#[derive(Debug)]
pub struct WorkflowHandle<T> {
    /// Progress events, closed when the workflow ends.
    pub events: UnboundedReceiver<WorkflowEvent>,
    /// Resolves to the workflow result.
    pub task: JoinHandle<Result<T>>,
}

/// Runs install and restore workflows for one [`InstallerConfig`].
#[derive(Debug, Clone)]
pub struct Installer {
    config: InstallerConfig,
    resolver: ReleaseResolver,
    backups: BackupManager,
    executor: InstallExecutor,
}

impl Installer {
    /// Wire up all components from `config`, sharing one HTTP client.
    pub fn new(config: InstallerConfig) -> Result<Self> {
        let client = crate::http::build_client()?;
        Ok(Self {
            resolver: ReleaseResolver::with_client(client.clone(), &config),
            backups: BackupManager::new(&config),
            executor: InstallExecutor::with_client(client, &config),
            config,
        })
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    pub fn resolver(&self) -> &ReleaseResolver {
        &self.resolver
    }

    pub fn executor(&self) -> &InstallExecutor {
        &self.executor
    }

    /// Install the release at `release_url` into `target`.
    ///
    /// Steps: resolve the asset, back up `target` (skipped when it does not
    /// exist), download the archive, extract it over `target`.
    ///
    /// # Errors
    ///
    /// The error of the first failing step; later steps never run. A failed
    /// resolve leaves the filesystem untouched. A failed backup aborts before
    /// anything is downloaded.
    pub async fn install(
        &self,
        release_url: &str,
        target: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<InstallOutcome> {
        let reference = ReleaseReference::parse(release_url)?;
        info!("Installing release {} into {}", reference, target.display());

        let asset = self.resolver.resolve_reference(&reference).await?;

        reporter.stage(Stage::BackupStart);
        let backup = self.backups.create_backup(target).await?;
        reporter.backup(backup.as_ref());

        reporter.stage(Stage::DownloadPrep);
        reporter.stage(Stage::DownloadStart);
        let archive = self
            .executor
            .download(&asset, |downloaded, total| reporter.download_progress(downloaded, total))
            .await?;
        reporter.stage(Stage::DownloadComplete);

        reporter.stage(Stage::ExtractStart);
        let extracted = self.executor.extract(&archive, target).await?;

        reporter.stage(Stage::FinalProcess);
        debug!("Install of {} finished", reference);
        reporter.stage(Stage::Complete);

        Ok(InstallOutcome {
            tag: reference.tag().to_string(),
            asset,
            backup,
            extracted,
        })
    }

    /// Replace `target` with the contents of `backup`.
    ///
    /// No backup of the current `target` is taken first.
    ///
    /// # Errors
    ///
    /// [`InstallerError::BackupNotFound`](crate::core::InstallerError::BackupNotFound)
    /// when the backup has disappeared (the target is left alone), or
    /// [`InstallerError::RestoreError`](crate::core::InstallerError::RestoreError).
    /// A failure after the target was removed leaves it missing or partial.
    pub async fn restore(
        &self,
        backup: &Backup,
        target: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<()> {
        info!("Restoring {} into {}", backup.name, target.display());
        reporter.stage(Stage::RestorePrep);

        if target.exists() {
            reporter.stage(Stage::RestoreDelete);
        }
        self.backups.clear_target(backup, target).await?;

        reporter.stage(Stage::RestoreCopy);
        self.backups.copy_into(backup, target).await?;

        reporter.stage(Stage::RestoreFinal);
        reporter.stage(Stage::RestoreComplete);
        Ok(())
    }

    /// Run [`install`](Self::install) on a new task.
    pub fn spawn_install(
        &self,
        release_url: impl Into<String>,
        target: impl Into<PathBuf>,
    ) -> WorkflowHandle<InstallOutcome> {
        let (sender, events) = unbounded_channel();
        let installer = self.clone();
        let release_url = release_url.into();
        let target = target.into();

        let task =
            tokio::spawn(async move { installer.install(&release_url, &target, &sender).await });
        WorkflowHandle { events, task }
    }

    /// Run [`restore`](Self::restore) on a new task.
    pub fn spawn_restore(&self, backup: Backup, target: impl Into<PathBuf>) -> WorkflowHandle<()> {
        let (sender, events) = unbounded_channel();
        let installer = self.clone();
        let target = target.into();

        let task = tokio::spawn(async move { installer.restore(&backup, &target, &sender).await });
        WorkflowHandle { events, task }
    }
}
