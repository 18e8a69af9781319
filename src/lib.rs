//! Detects a local Maestro install, backs up its JARs, replaces them with the
//! complete-reports build, and restores the originals on request.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod installation;
pub mod jars;
pub mod locate;
pub mod version;

#[cfg(all(test, unix))]
mod test_support;

pub use config::Config;
pub use error::{Error, Result};
pub use fetch::{ArchiveSource, Fetcher};
pub use installation::Installation;
