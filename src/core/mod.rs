//! Core types shared by every part of the installer
//!
//! Currently this is the error system:
//! - [`InstallerError`] - one variant per workflow failure kind
//! - [`ErrorContext`] - user-friendly wrapper with suggestions and details
//! - [`user_friendly_error`] - convert any error for CLI display
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use modloader_installer::core::{InstallerError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(InstallerError::BackupNotFound { name: "tModLoader_backup_1".into() }.into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;

pub use error::{BoxedCause, ErrorContext, InstallerError, user_friendly_error};

/// Result alias for core operations.
pub type Result<T, E = InstallerError> = std::result::Result<T, E>;
