use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::Error;

impl Config {
    /// Location of the optional config file.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;
        Ok(home.join(".config").join("maestro-complete-reports").join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Write the config file, creating its directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Write to an explicit path, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Backup directory, `~/.maestro/backup` unless overridden.
    pub fn backup_dir(&self) -> crate::Result<PathBuf> {
        match &self.paths.backup_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(maestro_home()?.join("backup")),
        }
    }

    /// Last-resort library directory, `~/.maestro/lib` unless overridden.
    pub fn home_lib_dir(&self) -> crate::Result<PathBuf> {
        match &self.paths.home_lib_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(maestro_home()?.join("lib")),
        }
    }

    /// URL of the supported-version catalog.
    pub fn catalog_url(&self) -> String {
        format!(
            "{}/api/{}/jars",
            self.service.base_url.trim_end_matches('/'),
            self.service.project
        )
    }

    /// Get a config value by dot-separated key path
    pub fn get_value(&self, key: &str) -> Result<String> {
        let path_value = |p: &Option<PathBuf>| {
            p.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
        };
        match key {
            "maestro.binary" => Ok(self.maestro.binary.clone()),
            "maestro.jar_prefix" => Ok(self.maestro.jar_prefix.clone()),
            "paths.backup_dir" => Ok(path_value(&self.paths.backup_dir)),
            "paths.home_lib_dir" => Ok(path_value(&self.paths.home_lib_dir)),
            "service.base_url" => Ok(self.service.base_url.clone()),
            "service.project" => Ok(self.service.project.clone()),
            "service.download_endpoint" => {
                Ok(self.service.download_endpoint.clone().unwrap_or_default())
            }
            "http.timeout_secs" => Ok(self
                .http
                .timeout_secs
                .map(|s| s.to_string())
                .unwrap_or_default()),
            _ => anyhow::bail!("Unknown config key: {key}"),
        }
    }

    /// Set a config value by dot-separated key path. An empty value clears
    /// optional keys.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let optional_path = || (!value.is_empty()).then(|| PathBuf::from(value));
        match key {
            "maestro.binary" => {
                anyhow::ensure!(!value.is_empty(), "maestro.binary cannot be empty");
                self.maestro.binary = value.to_string();
            }
            "maestro.jar_prefix" => self.maestro.jar_prefix = value.to_string(),
            "paths.backup_dir" => self.paths.backup_dir = optional_path(),
            "paths.home_lib_dir" => self.paths.home_lib_dir = optional_path(),
            "service.base_url" => {
                url::Url::parse(value)
                    .with_context(|| format!("Invalid URL: {value}"))?;
                self.service.base_url = value.to_string();
            }
            "service.project" => {
                anyhow::ensure!(!value.is_empty(), "service.project cannot be empty");
                self.service.project = value.to_string();
            }
            "service.download_endpoint" => {
                self.service.download_endpoint = if value.is_empty() {
                    None
                } else {
                    url::Url::parse(value)
                        .with_context(|| format!("Invalid URL: {value}"))?;
                    Some(value.to_string())
                };
            }
            "http.timeout_secs" => {
                self.http.timeout_secs = if value.is_empty() {
                    None
                } else {
                    Some(value.parse::<u64>()
                        .with_context(|| format!("Invalid number of seconds: {value}"))?)
                };
            }
            _ => anyhow::bail!("Unknown config key: {key}"),
        }
        Ok(())
    }
}

fn maestro_home() -> crate::Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".maestro"))
        .ok_or(Error::HomeDirNotFound)
}
