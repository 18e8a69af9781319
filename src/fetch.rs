//! Downloading and unpacking the replacement JAR bundle.

use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use ureq::Agent;

use crate::archive;
use crate::catalog::VersionCatalog;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{MAX_API_RESPONSE_SIZE, MAX_ARCHIVE_SIZE, USER_AGENT};

/// Where the archive for a version comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    /// GET `<base>/download/<project>/jars/<version>.zip` directly.
    Direct {
        /// Base URL of the service.
        base_url: String,
        /// Project path segment.
        project: String,
    },
    /// Ask `endpoint` for a temporary download URL (`{"url": ...}`), then GET it.
    /// `{version}` in the endpoint is replaced with the detected version, so a
    /// 404 from the endpoint means the version is unsupported.
    Indirect {
        /// Endpoint returning the download URL.
        endpoint: String,
    },
}

#[derive(Deserialize)]
struct DownloadUrlResponse {
    #[serde(default)]
    url: String,
}

impl ArchiveSource {
    /// Source selected by the config: the download endpoint when one is set.
    pub fn from_config(config: &Config) -> Self {
        match &config.service.download_endpoint {
            Some(endpoint) => Self::Indirect {
                endpoint: endpoint.clone(),
            },
            None => Self::Direct {
                base_url: config.service.base_url.clone(),
                project: config.service.project.clone(),
            },
        }
    }

    /// Archive URL for `version`, known up front only for [`ArchiveSource::Direct`].
    pub fn direct_url(&self, version: &str) -> Option<String> {
        match self {
            Self::Direct { base_url, project } => Some(direct_archive_url(base_url, project, version)),
            Self::Indirect { .. } => None,
        }
    }

    fn archive_url(&self, agent: &Agent, version: &str) -> Result<String> {
        match self {
            Self::Direct { base_url, project } => Ok(direct_archive_url(base_url, project, version)),
            Self::Indirect { endpoint } => {
                let endpoint = endpoint.replace("{version}", version);
                request_download_url(agent, &endpoint)
            }
        }
    }
}

fn direct_archive_url(base_url: &str, project: &str, version: &str) -> String {
    format!(
        "{}/download/{project}/jars/{version}.zip",
        base_url.trim_end_matches('/')
    )
}

fn request_download_url(agent: &Agent, endpoint: &str) -> Result<String> {
    tracing::info!(endpoint, "requesting download URL");
    let mut response = agent
        .get(endpoint)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "application/json")
        .call()
        .map_err(|e| Error::http(endpoint, e))?;

    if !response.status().is_success() {
        return Err(Error::Download {
            url: endpoint.to_string(),
            status: response.status().as_u16(),
        });
    }

    let body = response
        .body_mut()
        .with_config()
        .limit(MAX_API_RESPONSE_SIZE)
        .read_to_string()
        .map_err(|e| Error::http(endpoint, e))?;
    let parsed: DownloadUrlResponse =
        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    if parsed.url.is_empty() {
        return Err(Error::InvalidResponse {
            url: endpoint.to_string(),
            reason: "server returned empty URL".to_string(),
        });
    }
    Ok(parsed.url)
}

/// An archive downloaded and unpacked into a scratch directory.
///
/// The scratch directory is removed when this value is dropped.
#[derive(Debug)]
pub struct FetchedArchive {
    scratch: TempDir,
    extracted: PathBuf,
    entries: usize,
}

impl FetchedArchive {
    /// Root of the extracted tree.
    pub fn extracted(&self) -> &Path {
        &self.extracted
    }

    /// Scratch directory holding the download and the extracted tree.
    pub fn scratch(&self) -> &Path {
        self.scratch.path()
    }

    /// Number of files written during extraction.
    pub const fn entries(&self) -> usize {
        self.entries
    }
}

/// Downloads JAR bundles and looks up supported versions.
#[derive(Debug, Clone)]
pub struct Fetcher {
    agent: Agent,
    source: ArchiveSource,
    catalog_url: String,
    scratch_root: Option<PathBuf>,
}

impl Fetcher {
    /// Fetcher for an explicit source and catalog URL.
    pub const fn new(agent: Agent, source: ArchiveSource, catalog_url: String) -> Self {
        Self {
            agent,
            source,
            catalog_url,
            scratch_root: None,
        }
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    #[must_use]
    pub fn with_scratch_root(mut self, root: PathBuf) -> Self {
        self.scratch_root = Some(root);
        self
    }

    /// Fetcher wired from the service and HTTP sections of the config.
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.http.timeout_secs.map(std::time::Duration::from_secs);
        Self::new(
            crate::http::agent(timeout),
            ArchiveSource::from_config(config),
            config.catalog_url(),
        )
    }

    /// Versions the service has bundles for.
    pub fn supported_versions(&self) -> Result<Vec<String>> {
        VersionCatalog::fetch(&self.agent, &self.catalog_url).map(|c| c.versions)
    }

    /// Download the bundle for `version` and extract it into a fresh scratch
    /// directory.
    pub fn fetch(&self, version: &str) -> Result<FetchedArchive> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("maestro-jars-");
        let scratch = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| Error::io("failed to create temp directory", e))?;

        let url = match self.source.archive_url(&self.agent, version) {
            Err(Error::Download { status: 404, .. }) => return Err(self.unsupported(version)),
            other => other?,
        };
        let zip_path = scratch.path().join("jars.zip");
        self.download(&url, version, &zip_path)?;

        let extracted = scratch.path().join("extracted");
        let entries = archive::extract(&zip_path, &extracted)?;
        tracing::info!(entries, path = %extracted.display(), "archive extracted");

        Ok(FetchedArchive {
            scratch,
            extracted,
            entries,
        })
    }

    fn download(&self, url: &str, version: &str, dest: &Path) -> Result<()> {
        tracing::info!(url, "downloading archive");
        let response = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| Error::http(url, e))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(self.unsupported(version));
        }
        if !response.status().is_success() {
            return Err(Error::Download {
                url: url.to_string(),
                status,
            });
        }

        let mut reader = response
            .into_body()
            .into_with_config()
            .limit(MAX_ARCHIVE_SIZE)
            .reader();
        let mut out = File::create(dest)
            .map_err(|e| Error::io(format!("failed to create {}", dest.display()), e))?;
        let bytes = std::io::copy(&mut reader, &mut out)
            .map_err(|e| Error::io("failed to save zip file", e))?;
        tracing::debug!(bytes, "archive saved");
        Ok(())
    }

    fn unsupported(&self, version: &str) -> Error {
        let supported = match self.supported_versions() {
            Ok(versions) => Some(versions),
            Err(e) => {
                tracing::warn!(error = %e, "could not fetch supported versions");
                None
            }
        };
        Error::UnsupportedVersion {
            version: version.to_string(),
            supported,
        }
    }
}

#[cfg(test)]
mod tests;
