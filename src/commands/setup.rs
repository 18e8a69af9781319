use anyhow::{Context, Result};
use maestro_complete_reports::{Config, Fetcher};

use super::detect;

pub fn cmd_setup() -> Result<()> {
    let config = Config::load()?;
    let installation = detect(&config)?;

    println!("Backing up original JARs...");
    let backup_dir = config.backup_dir()?;
    let backed_up = installation
        .backup_jars(&backup_dir, &config.maestro.jar_prefix)
        .context("Error backing up JARs")?;
    println!(
        "Backup created at: {} ({} JARs)",
        backup_dir.display(),
        backed_up.len()
    );

    println!("Downloading patched JARs...");
    let fetcher = Fetcher::from_config(&config);
    let archive = fetcher
        .fetch(&installation.version)
        .context("Error replacing JARs")?;

    println!("Installing JARs:");
    let installed = installation
        .install_archive(&archive)
        .context("Error replacing JARs")?;
    for path in &installed {
        println!("  ✓ {}", path.display());
    }
    drop(archive);

    println!("Setup complete!");
    Ok(())
}
