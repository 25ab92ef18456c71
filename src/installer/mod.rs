//! Download and extraction of the release archive.
//!
//! The archive is streamed to a fixed scratch file,
//! `<root>/downloads/<package>_temp.zip`, which every run overwrites. Extraction
//! merges the archive into the install target: entries overwrite files at the
//! same path and everything else already in the target is left alone. The
//! scratch file is removed after a successful extraction and kept after a
//! failed one so the download can be inspected.
//!
//! Entries whose names would land outside the target (absolute paths or `..`
//! components) are skipped with a warning.

use crate::config::InstallerConfig;
use crate::core::{InstallerError, Result};
use crate::release::DownloadAsset;
use crate::utils::fs::{ensure_dir, ensure_parent_dir, run_blocking};
use anyhow::Context;
use futures::StreamExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use zip::ZipArchive;

const DOWNLOAD_OPERATION: &str = "archive download";

/// Outcome of [`InstallExecutor::extract`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Files written into the target.
    pub files: usize,
    /// Directories created or already present.
    pub directories: usize,
    /// Entry names skipped because they would escape the target.
    pub skipped: Vec<String>,
}

/// Downloads the release archive and unpacks it over the install target.
#[derive(Debug, Clone)]
pub struct InstallExecutor {
    client: reqwest::Client,
    archive_path: PathBuf,
}

impl InstallExecutor {
    pub fn new(config: &InstallerConfig) -> Result<Self> {
        Ok(Self::with_client(crate::http::build_client()?, config))
    }

    /// Use an existing client (shared with the resolver).
    pub fn with_client(client: reqwest::Client, config: &InstallerConfig) -> Self {
        Self {
            client,
            archive_path: config.downloads_dir().join(config.temp_archive_name()),
        }
    }

    /// Location of the scratch archive.
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Stream `asset` into the scratch archive.
    ///
    /// `on_progress` is called after every chunk with the bytes written so far
    /// and the total size when the server announced one. Returns the path of the
    /// written archive.
    ///
    /// # Errors
    ///
    /// [`InstallerError::NetworkError`] for transport failures, non-2xx answers,
    /// and failures to write the scratch file. A partially written file is left
    /// in place and overwritten by the next download.
    pub async fn download<F>(&self, asset: &DownloadAsset, mut on_progress: F) -> Result<PathBuf>
    where
        F: FnMut(u64, Option<u64>),
    {
        info!("Downloading {} from {}", asset.file_name, asset.url);

        let response = self
            .client
            .get(&asset.url)
            .send()
            .await
            .map_err(|e| InstallerError::network(DOWNLOAD_OPERATION, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallerError::http_status(DOWNLOAD_OPERATION, status, &asset.url));
        }

        let total = response.content_length();
        if let Some(parent) = self.archive_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| self.write_error(&e))?;
        }
        let mut file =
            tokio::fs::File::create(&self.archive_path).await.map_err(|e| self.write_error(&e))?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| InstallerError::network(DOWNLOAD_OPERATION, &e))?;
            file.write_all(&chunk).await.map_err(|e| self.write_error(&e))?;
            downloaded += chunk.len() as u64;
            on_progress(downloaded, total);
        }
        file.flush().await.map_err(|e| self.write_error(&e))?;

        debug!("Downloaded {} bytes to {}", downloaded, self.archive_path.display());
        Ok(self.archive_path.clone())
    }

    /// Extract `archive` into `target`, merging with existing content.
    ///
    /// `target` and its parents are created as needed. On success the archive
    /// file is deleted.
    ///
    /// # Errors
    ///
    /// [`InstallerError::ExtractError`] when the archive cannot be read or a
    /// file cannot be written. The archive is kept; files written before the
    /// failure stay in the target.
    pub async fn extract(&self, archive: &Path, target: &Path) -> Result<ExtractSummary> {
        let archive_path = archive.to_path_buf();
        let target_path = target.to_path_buf();

        let summary = run_blocking(move || extract_archive(&archive_path, &target_path))
            .await
            .map_err(|e| InstallerError::ExtractError {
                archive: archive.display().to_string(),
                target: target.display().to_string(),
                source: e.into(),
            })?;

        info!(
            "Extracted {} file(s) into {} ({} skipped)",
            summary.files,
            target.display(),
            summary.skipped.len()
        );

        if let Err(e) = tokio::fs::remove_file(archive).await {
            warn!("Failed to remove temporary archive {}: {}", archive.display(), e);
        }
        Ok(summary)
    }

    fn write_error(&self, error: &std::io::Error) -> InstallerError {
        InstallerError::NetworkError {
            operation: DOWNLOAD_OPERATION.to_string(),
            status: None,
            reason: format!("Failed to write {}: {}", self.archive_path.display(), error),
        }
    }
}

fn extract_archive(archive_path: &Path, target: &Path) -> anyhow::Result<ExtractSummary> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("Failed to read archive: {}", archive_path.display()))?;
    ensure_dir(target)?;

    let mut summary = ExtractSummary::default();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("Failed to read archive entry #{index}"))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping archive entry outside the install directory: {}", entry.name());
            summary.skipped.push(entry.name().to_string());
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let destination = target.join(&relative);

        if entry.is_dir() {
            ensure_dir(&destination)?;
            summary.directories += 1;
            continue;
        }

        ensure_parent_dir(&destination)?;
        let mut out = File::create(&destination)
            .with_context(|| format!("Failed to create file: {}", destination.display()))?;
        std::io::copy(&mut entry, &mut out)
            .with_context(|| format!("Failed to write file: {}", destination.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Owner keeps write access so a later install can overwrite the file.
            if let Some(mode) = entry.unix_mode() {
                let permissions = std::fs::Permissions::from_mode(mode & 0o777 | 0o200);
                std::fs::set_permissions(&destination, permissions).with_context(|| {
                    format!("Failed to set permissions: {}", destination.display())
                })?;
            }
        }

        summary.files += 1;
    }

    Ok(summary)
}
