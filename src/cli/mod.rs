//! Command-line interface.
//!
//! Running the binary without a subcommand installs a release:
//!
//! ```text
//! modloader-installer [URL] [INSTALL_PATH]
//! ```
//!
//! Missing arguments fall back to the values saved by the last successful
//! install, and the URL finally falls back to the built-in default release.
//!
//! Subcommands manage backups:
//!
//! - `backups` - list backups, newest first
//! - `restore [BACKUP] [INSTALL_PATH]` - replace the install with a backup
//! - `delete <BACKUP>` - remove one backup
//! - `prune --keep <N>` - remove all but the newest `N` backups
//!
//! Destructive subcommands ask for confirmation unless `--yes` is given.
//!
//! # Global options
//!
//! - `--verbose` / `--quiet` - log level (`RUST_LOG` overrides both)
//! - `--no-progress` - disable progress bars (also `MODLOADER_INSTALLER_NO_PROGRESS`)
//! - `--root <DIR>` - program directory holding backups, downloads and settings
//!   (also `MODLOADER_INSTALLER_ROOT`; defaults to the executable's directory)
//! - `--api-base <URL>` - release metadata API (also `MODLOADER_INSTALLER_API`)

mod backups;
pub mod common;
mod delete;
mod install;
mod lock;
mod progress;
mod prune;
mod restore;

use crate::config::InstallerConfig;
use crate::constants::{API_BASE_ENV, NO_PROGRESS_ENV, ROOT_ENV};
use anyhow::Result;
use clap::{Parser, Subcommand};
use common::CommandContext;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for this crate; `None` only logs errors.
    pub log_level: Option<String>,
    /// Hide progress bars.
    pub no_progress: bool,
    /// Program directory override.
    pub root: Option<PathBuf>,
    /// Metadata API override.
    pub api_base: Option<String>,
}

impl CliConfig {
    /// Install the global tracing subscriber writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over the configured level. Calling this more
    /// than once is harmless.
    pub fn init_logging(&self) {
        let level = self.log_level.as_deref().unwrap_or("error");
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("modloader_installer={level}")));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Build the installer configuration from the overrides.
    pub fn installer_config(&self) -> Result<InstallerConfig> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => InstallerConfig::default_root()?,
        };

        let mut config = InstallerConfig::new(root);
        if let Some(api_base) = &self.api_base {
            config = config.with_api_base(api_base.clone());
        }
        Ok(config)
    }
}

/// Install and roll back a mod loader distributed as release archives.
#[derive(Parser, Debug)]
#[command(
    name = "modloader-installer",
    about = "Install tModLoader releases and roll back to earlier backups",
    version,
    long_about = "Downloads a tModLoader release archive, backs up the current installation \
                  and extracts the release over it. Backups can be listed, restored, deleted \
                  and pruned."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    install: install::InstallCommand,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,

    /// Program directory holding backups, downloads and settings
    #[arg(long, global = true, env = ROOT_ENV, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Base URL of the release metadata API
    #[arg(long, global = true, env = API_BASE_ENV, value_name = "URL")]
    api_base: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List backups, newest first
    #[command(visible_alias = "list")]
    Backups(backups::BackupsCommand),
    /// Replace the installation with a backup
    Restore(restore::RestoreCommand),
    /// Delete a backup
    Delete(delete::DeleteCommand),
    /// Delete all but the newest backups
    Prune(prune::PruneCommand),
}

impl Cli {
    /// Run the parsed command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || std::env::var_os(NO_PROGRESS_ENV).is_some(),
            root: self.root.clone(),
            api_base: self.api_base.clone(),
        }
    }

    /// Run the parsed command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let ctx = CommandContext::new(config.installer_config()?, config.no_progress, self.quiet);

        match self.command {
            None => self.install.execute(&ctx).await,
            Some(Commands::Backups(cmd)) => cmd.execute(&ctx).await,
            Some(Commands::Restore(cmd)) => cmd.execute(&ctx).await,
            Some(Commands::Delete(cmd)) => cmd.execute(&ctx).await,
            Some(Commands::Prune(cmd)) => cmd.execute(&ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_installs() {
        let cli = Cli::try_parse_from([
            "modloader-installer",
            "https://github.com/tModLoader/tModLoader/releases/tag/v1",
            "/games/tModLoader",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(
            cli.install.url.as_deref(),
            Some("https://github.com/tModLoader/tModLoader/releases/tag/v1")
        );
        assert_eq!(cli.install.install_path, Some(PathBuf::from("/games/tModLoader")));
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["modloader-installer", "backups"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Backups(_))));

        let cli = Cli::try_parse_from(["modloader-installer", "prune", "--keep", "3", "--yes"])
            .unwrap();
        match cli.command {
            Some(Commands::Prune(cmd)) => {
                assert_eq!(cmd.keep, 3);
                assert!(cmd.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["modloader-installer", "delete"]).is_err());
    }

    #[test]
    fn test_build_config_levels() {
        let cli = Cli::try_parse_from(["modloader-installer", "--verbose", "backups"]).unwrap();
        assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

        let cli = Cli::try_parse_from(["modloader-installer", "-q", "backups"]).unwrap();
        assert!(cli.build_config().log_level.is_none());

        assert!(Cli::try_parse_from(["modloader-installer", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_installer_config_overrides() {
        let config = CliConfig {
            root: Some(PathBuf::from("/srv/installer")),
            api_base: Some("http://127.0.0.1:1".to_string()),
            ..CliConfig::default()
        };
        let installer_config = config.installer_config().unwrap();
        assert_eq!(installer_config.root_dir, PathBuf::from("/srv/installer"));
        assert_eq!(installer_config.api_base, "http://127.0.0.1:1");
    }
}
