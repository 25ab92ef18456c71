//! `backups`: list backups, newest first.

use super::common::CommandContext;
use crate::backup::Backup;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct BackupsCommand {
    /// Print only the backup names
    #[arg(long)]
    pub names_only: bool,
}

impl BackupsCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let manager = crate::backup::BackupManager::new(&ctx.config);
        let backups = manager.list_backups().await?;

        if backups.is_empty() {
            if !self.names_only {
                println!("No backups in {}", manager.backups_dir().display());
            }
            return Ok(());
        }

        for backup in &backups {
            if self.names_only {
                println!("{}", backup.name);
            } else {
                println!("{}", describe(backup));
            }
        }
        Ok(())
    }
}

/// `name (YYYY-MM-DD HH:MM:SS)` using the directory modification time.
pub fn describe(backup: &Backup) -> String {
    match backup.modified() {
        Some(modified) => {
            format!("{} ({})", backup.name.bold(), modified.format("%Y-%m-%d %H:%M:%S"))
        }
        None => backup.name.bold().to_string(),
    }
}
