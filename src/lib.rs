//! modloader-installer - install and roll back a mod loader shipped as release archives
//!
//! The installer keeps a local tModLoader installation up to date from the
//! project's GitHub releases. One install run:
//!
//! 1. reads the release tag from a release page URL and looks up the release's
//!    `tModLoader.zip` asset through the release metadata API,
//! 2. copies the current installation into a timestamped backup,
//! 3. downloads the archive to a scratch file,
//! 4. extracts it over the installation (merging with existing files).
//!
//! Backups can later be listed, restored, deleted and pruned.
//!
//! # Modules
//!
//! ## Workflow
//! - [`workflow`] - the install and restore state machines with progress reporting
//! - [`release`] - release URL parsing and asset lookup
//! - [`backup`] - timestamped snapshots of the install directory
//! - [`installer`] - archive download and extraction
//!
//! ## Supporting modules
//! - [`config`] - explicit installer configuration and persisted settings
//! - [`core`] - error types and user-facing error rendering
//! - [`utils`] - tree copy/remove, natural sort, progress bars
//! - [`cli`] - the `modloader-installer` command-line front end
//!
//! # Program directory layout
//!
//! ```text
//! <root>/
//! ├── backups/<package>_backup_YYYYMMDD_HHMMSS/
//! ├── downloads/<package>_temp.zip
//! ├── config/installer_settings.json
//! └── .installer.lock
//! ```
//!
//! The root defaults to the directory of the running executable and never lives
//! inside the install directory.
//!
//! # Example
//!
//! ```rust,no_run
//! use modloader_installer::config::InstallerConfig;
//! use modloader_installer::workflow::{Installer, WorkflowEvent};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let installer = Installer::new(InstallerConfig::new("/opt/modloader-installer"))?;
//! let mut handle = installer.spawn_install(
//!     "https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2",
//!     "/games/tModLoader",
//! );
//!
//! while let Some(event) = handle.events.recv().await {
//!     if let WorkflowEvent::Stage(stage) = event {
//!         println!("{:>3}% {}", stage.percent(), stage);
//!     }
//! }
//! let outcome = handle.task.await??;
//! println!("Installed {}", outcome.tag);
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod http;
pub mod installer;
pub mod release;
pub mod utils;
pub mod workflow;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
