//! Release resolution: from a release page URL to a downloadable archive.
//!
//! A release page URL such as
//! `https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2` carries
//! the release tag in its `/tag/<token>` segment. The resolver turns the tag
//! into a metadata query
//! (`GET <api>/repos/<owner>/<repo>/releases/tags/<tag>`), then picks the asset
//! named exactly `<package>.zip` from the response.
//!
//! Every call is a fresh round trip; nothing is cached, so an edited release is
//! picked up on the next call.
//!
//! # Examples
//!
//! ```rust,no_run
//! use modloader_installer::config::InstallerConfig;
//! use modloader_installer::release::ReleaseResolver;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = InstallerConfig::from_current_exe()?;
//! let resolver = ReleaseResolver::new(&config)?;
//! let asset = resolver
//!     .resolve("https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2")
//!     .await?;
//! println!("{}", asset.url);
//! # Ok(())
//! # }
//! ```

use crate::config::InstallerConfig;
use crate::constants::METADATA_TIMEOUT;
use crate::core::{InstallerError, Result};
use regex::Regex;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Matches the tag token: everything after `/tag/` up to `/`, `?` or `#`.
const TAG_PATTERN: &str = r"/tag/([^/?#]+)";

/// A release tag parsed from a release page URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseReference {
    tag: String,
}

impl ReleaseReference {
    /// Extract the tag from a release page URL.
    ///
    /// # Errors
    ///
    /// [`InstallerError::InvalidReference`] when the URL has no `/tag/<token>` segment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use modloader_installer::release::ReleaseReference;
    ///
    /// let reference = ReleaseReference::parse(
    ///     "https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2",
    /// )?;
    /// assert_eq!(reference.tag(), "v2025.02.3.2");
    ///
    /// assert!(ReleaseReference::parse("https://github.com/tModLoader/tModLoader/releases").is_err());
    /// # Ok::<(), modloader_installer::core::InstallerError>(())
    /// ```
    pub fn parse(url: &str) -> Result<Self> {
        let pattern = Regex::new(TAG_PATTERN).map_err(|e| InstallerError::ConfigError {
            message: format!("Invalid tag pattern: {e}"),
        })?;

        pattern
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|tag| Self {
                tag: tag.as_str().to_string(),
            })
            .ok_or_else(|| InstallerError::InvalidReference {
                url: url.to_string(),
            })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl FromStr for ReleaseReference {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ReleaseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// Release metadata as returned by the API. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubRelease {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Vec<GithubAsset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl GithubRelease {
    /// First asset, in listed order, whose name equals `name` exactly.
    pub fn find_asset(&self, name: &str) -> Option<&GithubAsset> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

/// The archive chosen for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAsset {
    /// Direct download URL.
    pub url: String,
    /// Asset file name (e.g. `tModLoader.zip`).
    pub file_name: String,
}

/// Resolves release page URLs to [`DownloadAsset`]s.
#[derive(Debug, Clone)]
pub struct ReleaseResolver {
    client: reqwest::Client,
    config: InstallerConfig,
}

impl ReleaseResolver {
    pub fn new(config: &InstallerConfig) -> Result<Self> {
        Ok(Self::with_client(crate::http::build_client()?, config))
    }

    /// Use an existing client (shared with the downloader).
    pub fn with_client(client: reqwest::Client, config: &InstallerConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Metadata endpoint for `reference`.
    pub fn metadata_url(&self, reference: &ReleaseReference) -> Result<reqwest::Url> {
        self.config.release_api_url(reference.tag())
    }

    /// Resolve a release page URL to the package archive.
    ///
    /// # Errors
    ///
    /// - [`InstallerError::InvalidReference`] for URLs without a tag
    /// - [`InstallerError::NetworkError`] for transport failures and non-2xx answers
    /// - [`InstallerError::AssetNotFound`] when the release has no `<package>.zip`
    pub async fn resolve(&self, release_url: &str) -> Result<DownloadAsset> {
        let reference = ReleaseReference::parse(release_url)?;
        self.resolve_reference(&reference).await
    }

    /// Resolve an already parsed reference.
    pub async fn resolve_reference(&self, reference: &ReleaseReference) -> Result<DownloadAsset> {
        let release = self.fetch_release(reference).await?;
        let asset_name = self.config.asset_name();

        let asset =
            release.find_asset(&asset_name).ok_or_else(|| InstallerError::AssetNotFound {
                asset: asset_name.clone(),
                tag: reference.tag().to_string(),
            })?;

        info!("Resolved {} for release {}", asset.name, reference);
        Ok(DownloadAsset {
            url: asset.browser_download_url.clone(),
            file_name: asset.name.clone(),
        })
    }

    /// Fetch the release metadata for `reference`.
    pub async fn fetch_release(&self, reference: &ReleaseReference) -> Result<GithubRelease> {
        let url = self.metadata_url(reference)?;
        debug!("Fetching release metadata from {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/vnd.github+json")
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(|e| InstallerError::network("release metadata", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallerError::http_status("release metadata", status, url.as_str()));
        }

        let release: GithubRelease = response
            .json()
            .await
            .map_err(|e| InstallerError::network("release metadata", &e))?;
        debug!("Release lists {} asset(s)", release.assets.len());
        Ok(release)
    }
}
