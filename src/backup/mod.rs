//! Timestamped snapshots of the install target.
//!
//! Every install attempt first copies the whole install target into
//! `<root>/backups/<prefix>_YYYYMMDD_HHMMSS/`. Backups are never modified after
//! creation and are only removed through [`BackupManager::delete_backup`] or an
//! explicit [`BackupManager::prune`].
//!
//! Restoring is destructive: the install target is removed and the backup tree
//! is copied in its place, so the result matches the backup exactly. No backup
//! of the current state is taken before a restore.
//!
//! # Examples
//!
//! ```rust,no_run
//! use modloader_installer::backup::BackupManager;
//! use modloader_installer::config::InstallerConfig;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = InstallerConfig::new("/opt/installer");
//! let manager = BackupManager::new(&config);
//!
//! if let Some(backup) = manager.create_backup(Path::new("/games/tModLoader")).await? {
//!     println!("Backed up to {}", backup.path.display());
//! }
//!
//! for backup in manager.list_backups().await? {
//!     println!("{}", backup.name);
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::InstallerConfig;
use crate::constants::BACKUP_TIMESTAMP_FORMAT;
use crate::core::{InstallerError, Result};
use crate::utils::fs::{copy_dir, ensure_dir, remove_dir_all, run_blocking};
use crate::utils::sort::natural_sort_key;
use anyhow::Context;
use chrono::{DateTime, Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Length of a formatted `YYYYMMDD_HHMMSS` timestamp.
const TIMESTAMP_LEN: usize = 15;

/// A backup directory under `<root>/backups/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    /// Directory name, e.g. `tModLoader_backup_20250301_120000`.
    pub name: String,
    /// Full path of the backup directory.
    pub path: PathBuf,
}

impl Backup {
    /// Creation time encoded in the backup name.
    ///
    /// Returns `None` when the name does not carry a `<prefix>_YYYYMMDD_HHMMSS`
    /// timestamp.
    pub fn created(&self, prefix: &str) -> Option<NaiveDateTime> {
        let stamp = self.name.strip_prefix(prefix)?.strip_prefix('_')?.get(..TIMESTAMP_LEN)?;
        NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT).ok()
    }

    /// Modification time of the backup directory.
    pub fn modified(&self) -> Option<DateTime<Local>> {
        let modified = std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        Some(DateTime::<Local>::from(modified))
    }
}

/// Creates, lists, restores and deletes backups under one backups directory.
#[derive(Debug, Clone)]
pub struct BackupManager {
    backups_dir: PathBuf,
    prefix: String,
}

impl BackupManager {
    pub fn new(config: &InstallerConfig) -> Self {
        Self {
            backups_dir: config.backups_dir(),
            prefix: config.backup_prefix(),
        }
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Snapshot `target` into a new timestamped backup.
    ///
    /// Returns `Ok(None)` without touching the filesystem when `target` does not
    /// exist. Two backups taken within the same second get `_2`, `_3`, ...
    /// appended to keep names unique.
    ///
    /// # Errors
    ///
    /// [`InstallerError::BackupError`] when the copy fails. A partially written
    /// backup directory may remain.
    pub async fn create_backup(&self, target: &Path) -> Result<Option<Backup>> {
        if !target.exists() {
            debug!("Install target {} does not exist, skipping backup", target.display());
            return Ok(None);
        }

        let base_name = format!("{}_{}", self.prefix, Local::now().format(BACKUP_TIMESTAMP_FORMAT));
        let backups_dir = self.backups_dir.clone();
        let source = target.to_path_buf();

        let backup = run_blocking(move || {
            ensure_dir(&backups_dir)?;
            let backup = claim_backup_dir(&backups_dir, &base_name)?;
            copy_dir(&source, &backup.path)?;
            Ok(backup)
        })
        .await
        .map_err(|e| InstallerError::BackupError {
            target: target.display().to_string(),
            source: e.into(),
        })?;

        info!("Created backup {} of {}", backup.name, target.display());
        Ok(Some(backup))
    }

    /// All backups, newest first (natural sort of the names, descending).
    ///
    /// A missing backups directory yields an empty list. Entries that are not
    /// directories or do not start with the backup prefix are ignored.
    pub async fn list_backups(&self) -> Result<Vec<Backup>> {
        let backups_dir = self.backups_dir.clone();
        let prefix = format!("{}_", self.prefix);

        run_blocking(move || scan_backups(&backups_dir, &prefix)).await.map_err(|e| {
            InstallerError::BackupError {
                target: self.backups_dir.display().to_string(),
                source: e.into(),
            }
        })
    }

    /// Look up a backup by its exact name.
    ///
    /// # Errors
    ///
    /// [`InstallerError::BackupNotFound`] when no listed backup has that name.
    pub async fn find_backup(&self, name: &str) -> Result<Backup> {
        self.list_backups().await?.into_iter().find(|backup| backup.name == name).ok_or_else(
            || InstallerError::BackupNotFound {
                name: name.to_string(),
            },
        )
    }

    /// The newest backup, if any.
    pub async fn latest_backup(&self) -> Result<Option<Backup>> {
        Ok(self.list_backups().await?.into_iter().next())
    }

    /// Replace `target` with the contents of `backup`.
    ///
    /// Equivalent to [`clear_target`](Self::clear_target) followed by
    /// [`copy_into`](Self::copy_into). The backup itself is left untouched.
    pub async fn restore_backup(&self, backup: &Backup, target: &Path) -> Result<()> {
        self.clear_target(backup, target).await?;
        self.copy_into(backup, target).await
    }

    /// First half of a restore: remove `target` entirely.
    ///
    /// Checks that `backup` still exists before removing anything, so a stale
    /// backup never costs the user their current installation.
    ///
    /// # Errors
    ///
    /// - [`InstallerError::BackupNotFound`] when the backup directory is gone
    /// - [`InstallerError::RestoreError`] when the target cannot be removed
    pub async fn clear_target(&self, backup: &Backup, target: &Path) -> Result<()> {
        if !backup.path.is_dir() {
            return Err(InstallerError::BackupNotFound {
                name: backup.name.clone(),
            });
        }

        debug!("Removing {} before restoring {}", target.display(), backup.name);
        let path = target.to_path_buf();
        run_blocking(move || remove_dir_all(&path))
            .await
            .map_err(|e| restore_error(backup, target, e))
    }

    /// Second half of a restore: copy the backup tree into `target`.
    pub async fn copy_into(&self, backup: &Backup, target: &Path) -> Result<()> {
        let source = backup.path.clone();
        let destination = target.to_path_buf();
        run_blocking(move || copy_dir(&source, &destination))
            .await
            .map_err(|e| restore_error(backup, target, e))?;

        info!("Restored backup {} into {}", backup.name, target.display());
        Ok(())
    }

    /// Remove a backup directory and everything in it.
    ///
    /// # Errors
    ///
    /// [`InstallerError::DeleteError`] when the removal fails.
    pub async fn delete_backup(&self, backup: &Backup) -> Result<()> {
        let path = backup.path.clone();
        run_blocking(move || remove_dir_all(&path)).await.map_err(|e| {
            InstallerError::DeleteError {
                backup: backup.name.clone(),
                source: e.into(),
            }
        })?;

        info!("Deleted backup {}", backup.name);
        Ok(())
    }

    /// Delete all but the `keep` newest backups and return the removed ones.
    ///
    /// Stops at the first failed deletion; backups removed before the failure
    /// stay removed.
    pub async fn prune(&self, keep: usize) -> Result<Vec<Backup>> {
        let mut backups = self.list_backups().await?;
        let removed = if backups.len() > keep { backups.split_off(keep) } else { Vec::new() };

        for backup in &removed {
            self.delete_backup(backup).await?;
        }

        if !removed.is_empty() {
            info!("Pruned {} backup(s), kept {}", removed.len(), backups.len());
        }
        Ok(removed)
    }
}

fn restore_error(backup: &Backup, target: &Path, error: anyhow::Error) -> InstallerError {
    InstallerError::RestoreError {
        backup: backup.name.clone(),
        target: target.display().to_string(),
        source: error.into(),
    }
}

/// Create the backup directory, appending `_2`, `_3`, ... on name collisions.
fn claim_backup_dir(backups_dir: &Path, base_name: &str) -> anyhow::Result<Backup> {
    for attempt in 1u32.. {
        let name =
            if attempt == 1 { base_name.to_string() } else { format!("{base_name}_{attempt}") };
        let path = backups_dir.join(&name);

        match std::fs::create_dir(&path) {
            Ok(()) => return Ok(Backup { name, path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!("Backup name {} already taken", name);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create backup directory: {}", path.display()));
            }
        }
    }
    anyhow::bail!("No free backup name for {base_name}")
}

fn scan_backups(backups_dir: &Path, prefix: &str) -> anyhow::Result<Vec<Backup>> {
    let entries = match std::fs::read_dir(backups_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read backups directory: {}", backups_dir.display())
            });
        }
    };

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| {
            format!("Failed to read backups directory: {}", backups_dir.display())
        })?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!("Skipping backup entry with a non UTF-8 name: {:?}", entry.file_name());
            continue;
        };
        let path = entry.path();
        if name.starts_with(prefix) && path.is_dir() {
            backups.push(Backup { name, path });
        }
    }

    backups.sort_by_cached_key(|backup| std::cmp::Reverse(natural_sort_key(&backup.name)));
    Ok(backups)
}
