//! Client for the supported-version catalog.

use serde::Deserialize;
use ureq::Agent;

use crate::error::{Error, Result};
use crate::http::{MAX_API_RESPONSE_SIZE, USER_AGENT};

/// Catalog response: the versions the archive service has bundles for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionCatalog {
    /// Project the list belongs to.
    #[serde(default)]
    pub project: String,
    /// Supported versions in the order the service lists them.
    pub versions: Vec<String>,
}

impl VersionCatalog {
    /// GET `url` and decode the catalog.
    pub fn fetch(agent: &Agent, url: &str) -> Result<Self> {
        let mut response = agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| Error::http(url, e))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(Error::Download {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_API_RESPONSE_SIZE)
            .read_to_string()
            .map_err(|e| Error::http(url, e))?;

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
