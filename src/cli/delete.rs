//! `delete`: remove one backup.

use super::backups::describe;
use super::common::{CommandContext, confirm};
use crate::backup::BackupManager;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Backup name as shown by `backups`
    pub backup: String,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl DeleteCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let _lock = ctx.lock().await?;
        let manager = BackupManager::new(&ctx.config);
        let backup = manager.find_backup(&self.backup).await?;

        if !confirm(&format!("Delete backup {}?", describe(&backup)), self.yes).await? {
            ctx.status("Delete cancelled");
            return Ok(());
        }

        manager.delete_backup(&backup).await?;
        ctx.status(format!("{} {}", "Deleted".green().bold(), backup.name));
        Ok(())
    }
}
