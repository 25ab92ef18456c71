//! Persisted user settings (last-used release URL and install path).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Values remembered between runs.
///
/// Stored as pretty-printed JSON:
///
/// ```json
/// {
///   "github_url": "https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2",
///   "install_path": "/games/tModLoader"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Release page URL used for the last install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,

    /// Install target used for the last successful install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_path: Option<PathBuf>,
}

impl Settings {
    /// Load settings, failing on unreadable or malformed files.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    /// Load settings, falling back to defaults.
    ///
    /// A missing file is the normal first-run case. A broken file is logged and
    /// ignored; it will be overwritten by the next save.
    pub async fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No settings file at {}", path.display());
            return Self::default();
        }

        match Self::load_from(path).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }

    /// Write the settings, creating the parent directory if needed.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }
}
