use anyhow::{Context, Result};
use maestro_complete_reports::Config;

use super::detect;

pub fn cmd_restore() -> Result<()> {
    let config = Config::load()?;
    let installation = detect(&config)?;

    println!("Restoring original JARs from backup...");
    let restored = installation
        .restore_jars(&config.backup_dir()?)
        .context("Error restoring JARs")?;
    for path in &restored {
        println!("  ✓ {}", path.display());
    }

    println!("Restore complete!");
    Ok(())
}
