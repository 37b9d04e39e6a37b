//! # Command Line Interface
//!
//! `secret-vault get <name>` and `secret-vault put <name> <value>` against the
//! configured remote backend.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::VaultSettings;
use crate::observability::{init_logging, log_settings_info, LogLevel};
use crate::Vault;

#[derive(Parser, Debug)]
#[command(name = "secret-vault")]
#[command(about = "Read and create secrets in a HashiCorp Vault KV v2 mount")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (debug, info, warning, error)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the value of a remote secret
    Get {
        /// Secret name
        name: String,
    },

    /// Create a remote secret. Fails if the name already exists.
    Put {
        /// Secret name
        name: String,

        /// Secret value
        value: String,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings =
        VaultSettings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if cli.json_logs {
        settings.logging.json = true;
    }

    // A subscriber may already be installed (e.g. integration tests); ignore.
    let _ = init_logging(&settings.logging);
    log_settings_info(&settings);

    let vault = Vault::from_settings(&settings)?;
    let stdout = std::io::stdout();
    run_command(&vault, cli.command, &mut stdout.lock()).await
}

/// Execute one command against `vault`, writing any output to `out`.
pub async fn run_command<W: Write>(
    vault: &Vault,
    command: Commands,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Get { name } => {
            let value = vault.get_secret(&name).await?;
            let text = value.as_text().unwrap_or_default();
            writeln!(out, "{}", text)?;
        }
        Commands::Put { name, value } => {
            vault.put_secret(&name, value).await?;
            writeln!(out, "created secret '{}'", name)?;
        }
    }
    Ok(())
}
