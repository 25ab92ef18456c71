//! `prune`: keep only the newest backups.

use super::common::{CommandContext, confirm};
use crate::backup::BackupManager;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct PruneCommand {
    /// Number of newest backups to keep
    #[arg(long, value_name = "N")]
    pub keep: usize,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl PruneCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let _lock = ctx.lock().await?;
        let manager = BackupManager::new(&ctx.config);

        let count = manager.list_backups().await?.len();
        if count <= self.keep {
            ctx.status(format!("{count} backup(s), nothing to prune"));
            return Ok(());
        }

        let question = format!("Delete {} of {} backup(s)?", count - self.keep, count);
        if !confirm(&question, self.yes).await? {
            ctx.status("Prune cancelled");
            return Ok(());
        }

        for backup in manager.prune(self.keep).await? {
            ctx.status(format!("{} {}", "Deleted".green().bold(), backup.name));
        }
        Ok(())
    }
}
