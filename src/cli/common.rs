//! Shared plumbing for the CLI commands.

use super::lock::InvocationLock;
use crate::config::{InstallerConfig, Settings};
use crate::utils::progress::progress_hidden;
use crate::workflow::Installer;
use anyhow::{Result, bail};
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Everything a command needs from the global options.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: InstallerConfig,
    pub no_progress: bool,
    pub quiet: bool,
}

impl CommandContext {
    pub fn new(config: InstallerConfig, no_progress: bool, quiet: bool) -> Self {
        Self {
            config,
            no_progress,
            quiet,
        }
    }

    /// Build the workflow for this invocation.
    pub fn installer(&self) -> Result<Installer> {
        Ok(Installer::new(self.config.clone())?)
    }

    /// Whether progress bars should stay hidden.
    pub fn progress_hidden(&self) -> bool {
        self.quiet || progress_hidden(self.no_progress)
    }

    /// Saved settings, or defaults when none are saved or they are unreadable.
    pub async fn settings(&self) -> Settings {
        Settings::load_or_default(&self.config.settings_path()).await
    }

    /// Wait for exclusive use of the program directory.
    pub async fn lock(&self) -> Result<InvocationLock> {
        InvocationLock::acquire(&self.config.lock_path()).await
    }

    /// Print a status line unless `--quiet` was given.
    pub fn status(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    /// Resolve the install path from the argument or the saved settings.
    pub fn install_path(&self, arg: Option<PathBuf>, settings: &Settings) -> Result<PathBuf> {
        match arg.or_else(|| settings.install_path.clone()) {
            Some(path) => Ok(path),
            None => bail!(
                "No install path given and none saved; pass the tModLoader directory as INSTALL_PATH"
            ),
        }
    }
}

/// Ask a yes/no question on the terminal. The default answer is no.
///
/// `assume_yes` (the `--yes` flag) skips the prompt. Without a terminal on
/// stdin the question cannot be asked and an error tells the user to pass
/// `--yes`.
pub async fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    if !std::io::stdin().is_terminal() {
        bail!("Confirmation required for: {question}\nRe-run with --yes to proceed non-interactively");
    }

    print!("{} ", format!("{question} [y/N]:").yellow());
    io::stdout().flush()?;

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut response = String::new();
    reader.read_line(&mut response).await?;
    let response = response.trim().to_lowercase();

    Ok(response == "y" || response == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CommandContext {
        CommandContext::new(InstallerConfig::new("/unused"), true, false)
    }

    #[tokio::test]
    async fn test_confirm_assume_yes() {
        assert!(confirm("Delete everything?", true).await.unwrap());
    }

    #[test]
    fn test_install_path_precedence() {
        let ctx = context();
        let settings = Settings {
            github_url: None,
            install_path: Some(PathBuf::from("/saved")),
        };

        assert_eq!(
            ctx.install_path(Some(PathBuf::from("/arg")), &settings).unwrap(),
            PathBuf::from("/arg")
        );
        assert_eq!(ctx.install_path(None, &settings).unwrap(), PathBuf::from("/saved"));
        assert!(ctx.install_path(None, &Settings::default()).is_err());
    }

    #[test]
    fn test_progress_hidden_when_disabled() {
        assert!(context().progress_hidden());
    }
}
