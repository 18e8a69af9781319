use anyhow::{bail, Result};
use clap::Subcommand;
use maestro_complete_reports::{config::Config, ArchiveSource};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file contents plus the derived locations
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration to disk
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a configuration value (e.g. service.base_url "https://example.com")
    Set { key: String, value: String },
    /// Get a configuration value
    Get { key: String },
}

pub fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
            println!();
            println!("# backup directory: {}", config.backup_dir()?.display());
            println!("# fallback lib directory: {}", config.home_lib_dir()?.display());
            match ArchiveSource::from_config(&config) {
                ArchiveSource::Indirect { endpoint } => {
                    println!("# download URL endpoint: {endpoint}");
                }
                source => {
                    if let Some(url) = source.direct_url("<version>") {
                        println!("# archive URL: {url}");
                    }
                }
            }
            println!("# version catalog: {}", config.catalog_url());
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Init { force } => {
            let path = Config::path()?;
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set_value(&key, &value)?;
            config.save()?;
            if value.is_empty() {
                println!("Cleared {key}");
            } else {
                println!("Set {key} = {value}");
            }
        }
        ConfigAction::Get { key } => {
            println!("{}", Config::load()?.get_value(&key)?);
        }
    }
    Ok(())
}
