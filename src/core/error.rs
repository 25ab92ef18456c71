//! Error handling for the installer
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can tell which workflow stage failed
//!    and whether retrying makes sense
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`InstallerError`] - one variant per failure kind of the install/restore workflow
//! - [`ErrorContext`] - wrapper that adds a suggestion and details for display
//!
//! Use [`user_friendly_error`] to turn any `anyhow::Error` coming out of the CLI
//! into an [`ErrorContext`].
//!
//! # Retry policy
//!
//! The library never retries. [`InstallerError::is_retryable`] only tells the
//! caller whether trying again without changing the input could succeed, which
//! is the case for [`InstallerError::NetworkError`] alone.
//!
//! # Examples
//!
//! ```rust,no_run
//! use modloader_installer::core::{InstallerError, user_friendly_error};
//!
//! let error = InstallerError::InvalidReference {
//!     url: "https://github.com/owner/repo/releases".to_string(),
//! };
//! assert!(!error.is_retryable());
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // colored output on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Boxed underlying cause carried by the filesystem error variants.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type of every core operation.
///
/// Each variant corresponds to one stage of the install or restore workflow, so
/// the variant alone tells the caller which step aborted the workflow.
#[derive(Error, Debug)]
pub enum InstallerError {
    /// The release URL does not contain a `/tag/<token>` segment.
    ///
    /// Not retryable: the user has to correct the input.
    #[error("Invalid release URL (expected a '/tag/<version>' segment): {url}")]
    InvalidReference {
        /// The URL as given by the user
        url: String,
    },

    /// Transport failure or non-success HTTP status.
    #[error("Network error during {operation}: {reason}")]
    NetworkError {
        /// What was being fetched (e.g., "release metadata", "archive download")
        operation: String,
        /// HTTP status code when the server answered with a non-2xx status
        status: Option<u16>,
        /// Human readable description of the failure
        reason: String,
    },

    /// The release exists but carries no asset with the expected name.
    #[error("Asset '{asset}' not found in release '{tag}'")]
    AssetNotFound {
        /// Expected asset file name
        asset: String,
        /// Release tag that was searched
        tag: String,
    },

    /// Snapshotting the install target failed.
    #[error("Failed to back up {target}")]
    BackupError {
        /// The install target being backed up
        target: String,
        /// Underlying cause
        #[source]
        source: BoxedCause,
    },

    /// Replacing the install target with a backup failed.
    #[error("Failed to restore backup '{backup}' into {target}")]
    RestoreError {
        /// Name of the backup being restored
        backup: String,
        /// The install target
        target: String,
        /// Underlying cause
        #[source]
        source: BoxedCause,
    },

    /// Removing a backup directory failed.
    #[error("Failed to delete backup '{backup}'")]
    DeleteError {
        /// Name of the backup
        backup: String,
        /// Underlying cause
        #[source]
        source: BoxedCause,
    },

    /// Extracting the downloaded archive failed.
    #[error("Failed to extract {archive} into {target}")]
    ExtractError {
        /// Path of the temporary archive (kept on disk for manual recovery)
        archive: String,
        /// The install target
        target: String,
        /// Underlying cause
        #[source]
        source: BoxedCause,
    },

    /// No backup with the requested name exists.
    #[error("Backup '{name}' not found")]
    BackupNotFound {
        /// The requested backup name
        name: String,
    },

    /// Configuration could not be built or used.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}

impl InstallerError {
    /// Build a [`InstallerError::NetworkError`] from a transport error.
    pub fn network(operation: impl Into<String>, error: &reqwest::Error) -> Self {
        Self::NetworkError {
            operation: operation.into(),
            status: error.status().map(|s| s.as_u16()),
            reason: error.to_string(),
        }
    }

    /// Build a [`InstallerError::NetworkError`] for a non-success HTTP status.
    pub fn http_status(
        operation: impl Into<String>,
        status: reqwest::StatusCode,
        url: &str,
    ) -> Self {
        Self::NetworkError {
            operation: operation.into(),
            status: Some(status.as_u16()),
            reason: format!("HTTP {status} from {url}"),
        }
    }

    /// Whether repeating the same call unchanged could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError { .. })
    }

    /// Short name of the workflow step that produced this error.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::InvalidReference { .. } | Self::AssetNotFound { .. } => "resolve",
            Self::NetworkError { .. } => "network",
            Self::BackupError { .. } => "backup",
            Self::RestoreError { .. } => "restore",
            Self::DeleteError { .. } => "delete",
            Self::ExtractError { .. } => "extract",
            Self::BackupNotFound { .. } => "select",
            Self::ConfigError { .. } => "config",
        }
    }
}

/// Error wrapper adding a suggestion and details for display.
#[derive(Debug)]
pub struct ErrorContext {
    /// Main message
    pub message: String,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Extra background information
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Append the `source()` chain of an error to its message.
fn message_with_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut causes = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }

    if !causes.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in causes.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}

/// Convert any error into a user-friendly [`ErrorContext`].
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<InstallerError>() {
        Ok(installer_error) => create_error_context(&installer_error),
        Err(error) => {
            if let Some(io_error) = error.downcast_ref::<std::io::Error>()
                && io_error.kind() == std::io::ErrorKind::PermissionDenied
            {
                return ErrorContext::new(format!("{error:#}"))
                    .with_suggestion(
                        "Check the permissions of the install directory and the program directory",
                    );
            }

            let chain: Vec<String> = error.chain().map(ToString::to_string).collect();
            let mut message = chain.first().cloned().unwrap_or_default();
            if chain.len() > 1 {
                message.push_str("\n\nCaused by:");
                for (i, cause) in chain.iter().skip(1).enumerate() {
                    message.push_str(&format!("\n  {}: {}", i + 1, cause));
                }
            }
            ErrorContext::new(message)
        }
    }
}

fn create_error_context(error: &InstallerError) -> ErrorContext {
    let ctx = ErrorContext::new(message_with_chain(error));
    match error {
        InstallerError::InvalidReference { .. } => ctx
            .with_suggestion(
                "Use a release page URL such as https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2",
            )
            .with_details("The release tag is read from the '/tag/<version>' part of the URL"),

        InstallerError::NetworkError { status: Some(404), .. } => ctx
            .with_suggestion("Check that the release tag exists on the release page")
            .with_details("The server answered 404 Not Found"),

        InstallerError::NetworkError { status: Some(403 | 429), .. } => ctx
            .with_suggestion("The API rate limit may be exhausted; wait a while and try again"),

        InstallerError::NetworkError { .. } => ctx
            .with_suggestion("Check your internet connection and try again"),

        InstallerError::AssetNotFound { asset, .. } => ctx
            .with_suggestion("Pick a release that publishes the archive, or check the release URL")
            .with_details(format!("Only an asset named exactly '{asset}' is installed")),

        InstallerError::BackupError { .. } => ctx
            .with_suggestion("Free disk space or fix permissions, then run the install again")
            .with_details(
                "The install was aborted before anything was downloaded; a partial backup directory may remain",
            ),

        InstallerError::RestoreError { backup, .. } => ctx
            .with_suggestion(format!(
                "The backup '{backup}' is untouched; copy it into the install directory manually if needed"
            ))
            .with_details("The install directory may be missing or only partially restored"),

        InstallerError::DeleteError { .. } => ctx
            .with_suggestion("Check that no other program is using files inside the backup"),

        InstallerError::ExtractError { archive, .. } => ctx
            .with_suggestion("Run the install again; the downloaded archive may be corrupt")
            .with_details(format!("The downloaded archive was kept at {archive}")),

        InstallerError::BackupNotFound { .. } => ctx
            .with_suggestion("Run 'modloader-installer backups' to see the available backups"),

        InstallerError::ConfigError { .. } => ctx
            .with_suggestion("Check the --root directory and the saved settings file"),
    }
}
