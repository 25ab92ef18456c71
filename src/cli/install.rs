//! Default command: install a release over the install directory.

use super::common::CommandContext;
use super::progress::TerminalProgress;
use crate::config::Settings;
use crate::constants::DEFAULT_RELEASE_URL;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug, Default)]
pub struct InstallCommand {
    /// Release page URL, e.g. https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// tModLoader install directory
    #[arg(value_name = "INSTALL_PATH")]
    pub install_path: Option<PathBuf>,
}

impl InstallCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let settings = ctx.settings().await;
        let url = self
            .url
            .or_else(|| settings.github_url.clone())
            .unwrap_or_else(|| DEFAULT_RELEASE_URL.to_string());
        let install_path = ctx.install_path(self.install_path, &settings)?;
        debug!("Install request: {} -> {}", url, install_path.display());

        let _lock = ctx.lock().await?;
        let installer = ctx.installer()?;

        ctx.status(format!(
            "{} {} into {}",
            "Installing".green().bold(),
            url,
            install_path.display()
        ));

        let progress = TerminalProgress::new(ctx.progress_hidden(), ctx.quiet);
        let handle = installer.spawn_install(url.clone(), install_path.clone());
        let outcome = progress.drive(handle).await?;

        Settings {
            github_url: Some(url),
            install_path: Some(install_path.clone()),
        }
        .save_to(&ctx.config.settings_path())
        .await
        .context("Install succeeded but the settings could not be saved")?;

        ctx.status(format!(
            "{} {} ({} files) into {}",
            "Installed".green().bold(),
            outcome.tag,
            outcome.extracted.files,
            install_path.display()
        ));
        if let Some(backup) = &outcome.backup {
            ctx.status(format!("Previous installation saved as {}", backup.name.cyan()));
        }
        if !outcome.extracted.skipped.is_empty() {
            ctx.status(format!(
                "{} {} archive entries pointing outside the install directory were skipped",
                "warning:".yellow(),
                outcome.extracted.skipped.len()
            ));
        }
        Ok(())
    }
}
