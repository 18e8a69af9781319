pub mod config;
pub mod restore;
pub mod setup;
pub mod versions;

use anyhow::{Context, Result};
use maestro_complete_reports::{Config, Installation};

/// Detect the install and print what was found.
fn detect(config: &Config) -> Result<Installation> {
    println!("Detecting Maestro installation...");
    let installation = Installation::detect(config).context("Error detecting Maestro")?;
    println!("Found Maestro {}", installation.version);
    println!("Lib path: {}", installation.library_path.display());
    Ok(installation)
}
