//! Directory tree operations used for backups and restores.
//!
//! All functions here are synchronous and may block for a long time on large
//! trees; async callers run them through `tokio::task::spawn_blocking`.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Fails if the path exists but is not a directory, or if creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensures that the parent directory of a file path exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Recursively copies a directory and all its contents to a new location.
///
/// The destination is created if it does not exist. Existing files in the
/// destination are overwritten; other existing files are left alone. File
/// permissions are preserved. Symbolic links are recreated as links on Unix and
/// copied by content elsewhere.
///
/// # Examples
///
/// ```rust,no_run
/// use modloader_installer::utils::fs::copy_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// copy_dir(Path::new("game/tModLoader"), Path::new("backups/tModLoader_backup_20250301_120000"))?;
/// # Ok(())
/// # }
/// ```
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(anyhow::anyhow!("Source is not a directory: {}", src.display()));
    }
    ensure_dir(dst)?;

    for entry in WalkDir::new(src).follow_links(false).min_depth(1) {
        let entry =
            entry.with_context(|| format!("Failed to read directory tree: {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("Entry outside source tree: {}", entry.path().display()))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            ensure_dir(&target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy file from {} to {}", entry.path().display(), target.display())
            })?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link_target = fs::read_link(src)
        .with_context(|| format!("Failed to read symlink: {}", src.display()))?;
    if dst.symlink_metadata().is_ok() {
        fs::remove_file(dst)
            .with_context(|| format!("Failed to replace existing file: {}", dst.display()))?;
    }
    std::os::unix::fs::symlink(&link_target, dst)
        .with_context(|| format!("Failed to create symlink: {}", dst.display()))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let metadata = fs::metadata(src)
        .with_context(|| format!("Failed to resolve symlink: {}", src.display()))?;
    if metadata.is_dir() {
        copy_dir(src, dst)
    } else {
        fs::copy(src, dst).map(|_| ()).with_context(|| {
            format!("Failed to copy file from {} to {}", src.display(), dst.display())
        })
    }
}

/// Runs blocking filesystem work on tokio's blocking pool.
///
/// A panic inside `work` is reported as an error rather than propagated.
pub async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.context("Blocking filesystem task failed")?
}

/// Recursively removes a directory and all its contents.
///
/// A missing directory is not an error. Symbolic links are removed without
/// touching their targets.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    match path.symlink_metadata() {
        Ok(metadata) if metadata.file_type().is_symlink() => fs::remove_file(path)
            .with_context(|| format!("Failed to remove symlink: {}", path.display())),
        Ok(_) => fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to inspect directory: {}", path.display()))
        }
    }
}
