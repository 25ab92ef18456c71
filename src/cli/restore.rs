//! `restore`: replace the install directory with a backup.

use super::backups::describe;
use super::common::{CommandContext, confirm};
use super::progress::TerminalProgress;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RestoreCommand {
    /// Backup name (default: the newest backup)
    pub backup: Option<String>,

    /// tModLoader install directory (default: the saved install path)
    #[arg(value_name = "INSTALL_PATH")]
    pub install_path: Option<PathBuf>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl RestoreCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let settings = ctx.settings().await;
        let install_path = ctx.install_path(self.install_path, &settings)?;

        let _lock = ctx.lock().await?;
        let installer = ctx.installer()?;

        let backup = match &self.backup {
            Some(name) => installer.backups().find_backup(name).await?,
            None => match installer.backups().latest_backup().await? {
                Some(backup) => backup,
                None => bail!("No backups in {}", installer.backups().backups_dir().display()),
            },
        };

        let question = format!(
            "Replace {} with backup {}? Current files will be deleted",
            install_path.display(),
            describe(&backup)
        );
        if !confirm(&question, self.yes).await? {
            ctx.status("Restore cancelled");
            return Ok(());
        }

        let progress = TerminalProgress::new(ctx.progress_hidden(), ctx.quiet);
        progress.drive(installer.spawn_restore(backup.clone(), install_path.clone())).await?;

        ctx.status(format!(
            "{} {} into {}",
            "Restored".green().bold(),
            backup.name,
            install_path.display()
        ));
        Ok(())
    }
}
