//! Advisory lock serializing CLI invocations on one program directory.
//!
//! The workflow itself does no locking; two installer processes sharing a
//! program directory would otherwise race on the scratch archive and the
//! backups directory. The second process waits until the first one exits.

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Held for the duration of a command; released on drop.
#[derive(Debug)]
pub struct InvocationLock {
    file: File,
    path: PathBuf,
}

impl InvocationLock {
    /// Block (off the async runtime) until the lock at `path` is ours.
    pub async fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.to_path_buf();

        let file = tokio::task::spawn_blocking(move || -> Result<File> {
            crate::utils::fs::ensure_parent_dir(&lock_path)?;
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)
                .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;

            if !FileExt::try_lock_exclusive(&file).unwrap_or(false) {
                eprintln!("Waiting for another installer process to finish...");
                FileExt::lock_exclusive(&file).with_context(|| {
                    format!("Failed to acquire lock: {}", lock_path.display())
                })?;
            }
            Ok(file)
        })
        .await
        .context("Failed to spawn blocking task for lock acquisition")??;

        debug!("Acquired invocation lock {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for InvocationLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            eprintln!("Warning: Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}
