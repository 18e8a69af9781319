//! Error taxonomy shared by every step of setup and restore.

use std::path::PathBuf;

/// Errors produced while detecting, patching, or restoring a Maestro install.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The Maestro binary could not be found or did not run successfully.
    #[error("maestro not found: {0}")]
    Detection(String),

    /// `maestro --version` printed something without a recognisable version.
    #[error("could not parse version from output: {0}")]
    Parse(String),

    /// None of the library path strategies produced an existing directory.
    #[error("could not find maestro lib directory (tried {})", .0.join(", "))]
    LibraryPathNotFound(Vec<String>),

    /// A JAR could not be copied into the backup directory.
    #[error("failed to backup {file}: {source}")]
    Backup {
        /// Name of the JAR that failed.
        file: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The archive service answered with an unexpected status.
    #[error("failed to download jars from {url}: HTTP {status}")]
    Download {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The archive service has no bundle for the detected version.
    #[error("maestro version {version} is not supported{}", supported_suffix(.supported.as_deref()))]
    UnsupportedVersion {
        /// Version reported by the local install.
        version: String,
        /// Versions the service does support, when the catalog could be read.
        supported: Option<Vec<String>>,
    },

    /// An archive entry would be written outside the extraction directory.
    #[error("invalid file path in archive: {0}")]
    PathTraversal(String),

    /// The downloaded archive did not contain any JAR files.
    #[error("no JAR files found in downloaded archive")]
    NoJarsFound,

    /// A JAR could not be copied into the library directory.
    #[error("failed to copy {file}: {source}")]
    Install {
        /// Name of the JAR that failed.
        file: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// Restore was requested but no backup directory exists.
    #[error("no backup found at {}", .0.display())]
    NoBackupFound(PathBuf),

    /// A JAR could not be copied back from the backup directory.
    #[error("failed to restore {file}: {source}")]
    Restore {
        /// Name of the JAR that failed.
        file: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    HomeDirNotFound,

    /// The HTTP request itself failed (DNS, connection, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Http {
        /// Requested URL.
        url: String,
        /// Transport error reported by the client.
        #[source]
        source: Box<ureq::Error>,
    },

    /// A service answered with a body that could not be understood.
    #[error("unexpected response from {url}: {reason}")]
    InvalidResponse {
        /// Requested URL.
        url: String,
        /// What was wrong with the body.
        reason: String,
    },

    /// The downloaded file is not a readable zip archive.
    #[error("failed to extract jars: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Any other filesystem failure.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn http(url: &str, source: ureq::Error) -> Self {
        Self::Http {
            url: url.to_string(),
            source: Box::new(source),
        }
    }
}

fn supported_suffix(supported: Option<&[String]>) -> String {
    match supported {
        Some(versions) => format!(". Supported versions: {}", versions.join(", ")),
        None => String::new(),
    }
}
