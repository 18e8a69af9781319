//! Configuration, loaded from an optional TOML file.

mod ops;


use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default archive and catalog service.
pub const DEFAULT_BASE_URL: &str = "https://open.devicelab.dev";

/// Project name used in the service URLs.
pub const DEFAULT_PROJECT: &str = "maestro-complete-reports";

/// Runtime configuration. Every field has a default, so a missing or partial
/// config file behaves like the stock install.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How to find and recognise the Maestro install.
    pub maestro: MaestroConfig,
    /// Backup and fallback library locations.
    pub paths: PathsConfig,
    /// Remote archive and catalog service.
    pub service: ServiceConfig,
    /// HTTP client settings.
    pub http: HttpConfig,
}

/// Settings describing the target binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaestroConfig {
    /// Binary name looked up on `PATH`, or an explicit path.
    pub binary: String,
    /// File name prefix of the JARs that get backed up.
    pub jar_prefix: String,
}

/// Filesystem locations; unset entries are derived from the home directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where original JARs are copied before patching (`~/.maestro/backup`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    /// Last-resort library directory (`~/.maestro/lib`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_lib_dir: Option<PathBuf>,
}

/// Remote service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the archive and catalog service.
    pub base_url: String,
    /// Project segment of the service URLs.
    pub project: String,
    /// Endpoint answering `{"url": ...}`; when set, archives are fetched
    /// through it instead of the templated download URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_endpoint: Option<String>,
}

/// HTTP client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Global timeout per request; the client default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for MaestroConfig {
    fn default() -> Self {
        Self {
            binary: "maestro".to_string(),
            jar_prefix: "maestro".to_string(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project: DEFAULT_PROJECT.to_string(),
            download_endpoint: None,
        }
    }
}
