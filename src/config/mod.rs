//! Configuration for the installer.
//!
//! Two kinds of configuration exist:
//!
//! - [`InstallerConfig`]: the explicit, immutable configuration handed to the
//!   workflow at construction. It names the program root directory (under which
//!   `backups/`, `downloads/` and `config/` live), the release repository and the
//!   package whose archive is installed. Nothing in the workflow computes paths
//!   on its own; every location is derived from this value.
//! - [`Settings`]: the user's last-used release URL and install path, persisted as
//!   JSON under `<root>/config/` so the CLI can be re-run without arguments.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── backups/
//! │   └── tModLoader_backup_20250301_120000/   full copy of the install target
//! ├── downloads/
//! │   └── tModLoader_temp.zip                  scratch archive, overwritten each run
//! ├── config/
//! │   └── installer_settings.json
//! └── .installer.lock                          CLI invocation lock
//! ```

mod settings;

pub use settings::Settings;

use crate::constants::{
    BACKUPS_DIR, CONFIG_DIR, DEFAULT_API_BASE, DEFAULT_PACKAGE_NAME, DEFAULT_REPO_NAME,
    DEFAULT_REPO_OWNER, DOWNLOADS_DIR, LOCK_FILE, SETTINGS_FILE,
};
use crate::core::InstallerError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Explicit configuration of one installer instance.
///
/// # Examples
///
/// ```rust
/// use modloader_installer::config::InstallerConfig;
/// use std::path::PathBuf;
///
/// let config = InstallerConfig::new(PathBuf::from("/opt/installer"))
///     .with_api_base("http://127.0.0.1:8080");
///
/// assert_eq!(config.asset_name(), "tModLoader.zip");
/// assert_eq!(config.backups_dir(), PathBuf::from("/opt/installer/backups"));
/// assert_eq!(
///     config.release_api_url("v2025.02.3.2").unwrap().as_str(),
///     "http://127.0.0.1:8080/repos/tModLoader/tModLoader/releases/tags/v2025.02.3.2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Directory the backups, scratch downloads and settings are placed under.
    pub root_dir: PathBuf,

    /// Base URL of the release metadata API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Owner of the release repository.
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Name of the release repository.
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// Package name; the release asset must be `<package_name>.zip`.
    #[serde(default = "default_package_name")]
    pub package_name: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_repo_owner() -> String {
    DEFAULT_REPO_OWNER.to_string()
}

fn default_repo_name() -> String {
    DEFAULT_REPO_NAME.to_string()
}

fn default_package_name() -> String {
    DEFAULT_PACKAGE_NAME.to_string()
}

impl InstallerConfig {
    /// Configuration rooted at `root_dir` with the default release source.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            api_base: default_api_base(),
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            package_name: default_package_name(),
        }
    }

    /// Configuration rooted next to the running executable.
    ///
    /// See [`InstallerConfig::default_root`].
    pub fn from_current_exe() -> Result<Self, InstallerError> {
        Ok(Self::new(Self::default_root()?))
    }

    /// The directory containing the running executable.
    ///
    /// Falls back to the platform's local data directory when the executable
    /// path cannot be determined.
    pub fn default_root() -> Result<PathBuf, InstallerError> {
        if let Some(dir) =
            std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            return Ok(dir);
        }

        debug!("Executable path unavailable, falling back to the local data directory");
        dirs::data_local_dir().map(|dir| dir.join("modloader-installer")).ok_or_else(|| {
            InstallerError::ConfigError {
                message: "Unable to determine a program directory; pass --root".to_string(),
            }
        })
    }

    /// Override the metadata API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the release repository.
    #[must_use]
    pub fn with_repository(mut self, owner: impl Into<String>, name: impl Into<String>) -> Self {
        self.repo_owner = owner.into();
        self.repo_name = name.into();
        self
    }

    /// Override the package name.
    #[must_use]
    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    /// File name of the release asset to install.
    pub fn asset_name(&self) -> String {
        format!("{}.zip", self.package_name)
    }

    /// Fixed prefix of backup directory names.
    pub fn backup_prefix(&self) -> String {
        format!("{}_backup", self.package_name)
    }

    /// File name of the scratch archive.
    pub fn temp_archive_name(&self) -> String {
        format!("{}_temp.zip", self.package_name)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root_dir.join(BACKUPS_DIR)
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.root_dir.join(DOWNLOADS_DIR)
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root_dir.join(CONFIG_DIR)
    }

    /// Path of the persisted [`Settings`] file.
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir().join(SETTINGS_FILE)
    }

    /// Path of the CLI invocation lock.
    pub fn lock_path(&self) -> PathBuf {
        self.root_dir.join(LOCK_FILE)
    }

    /// Metadata endpoint for a release tag.
    ///
    /// Each path segment is percent-encoded, so a tag can never change the
    /// shape of the request path.
    ///
    /// # Errors
    ///
    /// [`InstallerError::ConfigError`] when `api_base` is not an absolute URL
    /// that can carry a path.
    pub fn release_api_url(&self, tag: &str) -> Result<reqwest::Url, InstallerError> {
        let invalid = |reason: String| InstallerError::ConfigError {
            message: format!("Invalid API base URL '{}': {reason}", self.api_base),
        };

        let mut url = reqwest::Url::parse(&self.api_base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([
                "repos",
                self.repo_owner.as_str(),
                self.repo_name.as_str(),
                "releases",
                "tags",
                tag,
            ]);
        Ok(url)
    }
}
