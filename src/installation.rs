//! The detected Maestro install and the operations run against it.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::FetchedArchive;
use crate::jars;
use crate::locate::LibraryResolver;
use crate::version;

/// A detected Maestro install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// Version reported by `maestro --version`.
    pub version: String,
    /// Directory holding the install's runtime JARs.
    pub library_path: PathBuf,
}

impl Installation {
    /// Probe the configured binary for its version and locate its library
    /// directory.
    pub fn detect(config: &Config) -> Result<Self> {
        let binary = &config.maestro.binary;
        let version = version::probe_version(binary)?;
        tracing::info!(%version, "detected maestro");

        let resolver = LibraryResolver::for_binary(binary, config.home_lib_dir()?);
        let library_path = resolver.resolve()?;

        Ok(Self {
            version,
            library_path,
        })
    }

    /// Copy the install's `<prefix>*.jar` files into `backup_dir`.
    pub fn backup_jars(&self, backup_dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        jars::backup_jars(&self.library_path, backup_dir, prefix)
    }

    /// Copy the JARs of a fetched archive into the library directory.
    pub fn install_archive(&self, archive: &FetchedArchive) -> Result<Vec<PathBuf>> {
        jars::install_jars(archive.extracted(), &self.library_path)
    }

    /// Copy the backed-up JARs back into the library directory.
    pub fn restore_jars(&self, backup_dir: &Path) -> Result<Vec<PathBuf>> {
        jars::restore_jars(backup_dir, &self.library_path)
    }
}
