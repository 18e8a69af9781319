//! `maestro-complete-reports` command-line entry point.

mod commands;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::config::{cmd_config, ConfigAction};
use commands::restore::cmd_restore;
use commands::setup::cmd_setup;
use commands::versions::cmd_versions;

#[derive(Parser)]
#[command(
    name = "maestro-complete-reports",
    version,
    about = "Swap a local Maestro install's JARs for the complete-reports build"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect Maestro, backup JARs, download and replace with patched JARs
    Setup,

    /// Restore original JARs from backup
    Restore,

    /// List the Maestro versions that have patched JARs
    Versions,

    /// Manage maestro-complete-reports configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            if !matches!(
                e.kind(),
                ErrorKind::MissingSubcommand
                    | ErrorKind::InvalidSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                eprintln!("{e}");
            }
            println!("{}", Cli::command().render_help());
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Setup => cmd_setup()?,
        Commands::Restore => cmd_restore()?,
        Commands::Versions => cmd_versions()?,
        Commands::Config { action } => cmd_config(action)?,
    }

    Ok(())
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}
