//! HTTP client construction shared by the release resolver and the downloader.

use crate::constants::{CONNECT_TIMEOUT, USER_AGENT};
use crate::core::InstallerError;

/// Build the HTTP client used for metadata queries and archive downloads.
///
/// Only the connection phase has a deadline; the archive download may run as
/// long as the transfer keeps going.
pub fn build_client() -> Result<reqwest::Client, InstallerError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| InstallerError::ConfigError {
            message: format!("Failed to build HTTP client: {e}"),
        })
}
