use anyhow::{Context, Result};
use maestro_complete_reports::{Config, Fetcher};

pub fn cmd_versions() -> Result<()> {
    let config = Config::load()?;
    let versions = Fetcher::from_config(&config)
        .supported_versions()
        .context("Error fetching supported versions")?;

    if versions.is_empty() {
        println!("No supported versions listed.");
    }
    for version in versions {
        println!("{version}");
    }
    Ok(())
}
