//! Global constants used throughout the installer.
//!
//! Naming of the on-disk layout, the default release source, and the advisory
//! progress percentages live here so that the workflow, the CLI and the tests
//! agree on them.

use std::time::Duration;

/// Name of the package whose release archives are installed.
///
/// The release asset is expected to be named `<PACKAGE_NAME>.zip`.
pub const DEFAULT_PACKAGE_NAME: &str = "tModLoader";

/// GitHub owner of the release repository.
pub const DEFAULT_REPO_OWNER: &str = "tModLoader";

/// GitHub repository holding the releases.
pub const DEFAULT_REPO_NAME: &str = "tModLoader";

/// Base URL of the release metadata API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Release URL used when neither the command line nor saved settings provide one.
pub const DEFAULT_RELEASE_URL: &str =
    "https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2";

/// Directory (under the program root) holding timestamped backups.
pub const BACKUPS_DIR: &str = "backups";

/// Directory (under the program root) holding the scratch archive.
pub const DOWNLOADS_DIR: &str = "downloads";

/// Directory (under the program root) holding persisted settings.
pub const CONFIG_DIR: &str = "config";

/// File name of the persisted settings inside [`CONFIG_DIR`].
pub const SETTINGS_FILE: &str = "installer_settings.json";

/// Advisory lock file used by the CLI to serialize invocations.
pub const LOCK_FILE: &str = ".installer.lock";

/// `strftime` format of the timestamp suffix in backup directory names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timeout for the release metadata request.
///
/// The archive download itself has no overall deadline; only the connection
/// phase is bounded (see [`CONNECT_TIMEOUT`]).
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection timeout applied to every HTTP request.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// User agent sent with every request. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("modloader-installer/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding the program root directory.
pub const ROOT_ENV: &str = "MODLOADER_INSTALLER_ROOT";

/// Environment variable overriding the metadata API base URL.
pub const API_BASE_ENV: &str = "MODLOADER_INSTALLER_API";

/// Environment variable disabling progress bars when set.
pub const NO_PROGRESS_ENV: &str = "MODLOADER_INSTALLER_NO_PROGRESS";
