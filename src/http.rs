//! Blocking HTTP client shared by the fetcher and the catalog client.

use std::time::Duration;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use ureq::Agent;

/// Maximum body size for JSON API responses (1 MB).
pub const MAX_API_RESPONSE_SIZE: u64 = 1024 * 1024;

/// Maximum size of a downloaded JAR bundle (512 MB).
pub const MAX_ARCHIVE_SIZE: u64 = 512 * 1024 * 1024;

pub(crate) const USER_AGENT: &str = concat!("maestro-complete-reports/", env!("CARGO_PKG_VERSION"));

/// Build an agent using native-tls with platform roots.
///
/// Non-2xx statuses come back as responses, not errors; callers map them
/// (a 404 from the archive service means the version is unsupported).
pub fn agent(timeout: Option<Duration>) -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .http_status_as_error(false)
        .timeout_global(timeout)
        .build()
        .into()
}
