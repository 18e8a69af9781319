//! Reading the installed Maestro version.

use regex::Regex;
use std::ffi::OsStr;
use std::process::Command;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Version patterns, most specific first. Digits are ASCII only.
static VERSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"cli version:\s*([0-9]+\.[0-9]+\.[0-9]+)",
        r"version:\s*([0-9]+\.[0-9]+\.[0-9]+)",
        r"CLI\s+([0-9]+\.[0-9]+\.[0-9]+)",
        r"([0-9]+\.[0-9]+\.[0-9]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("version pattern is valid"))
    .collect()
});

/// Run `<binary> --version` and extract the semantic version it reports.
pub fn probe_version(binary: impl AsRef<OsStr>) -> Result<String> {
    let binary = binary.as_ref();
    let output = Command::new(binary)
        .arg("--version")
        .output()
        .map_err(|e| Error::Detection(format!("{}: {e}", binary.to_string_lossy())))?;

    if !output.status.success() {
        return Err(Error::Detection(format!(
            "`{} --version` exited with {}",
            binary.to_string_lossy(),
            output.status
        )));
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    parse_version(&combined)
}

/// Extract `MAJOR.MINOR.PATCH` from free-form `--version` output.
pub fn parse_version(output: &str) -> Result<String> {
    VERSION_PATTERNS
        .iter()
        .find_map(|re| re.captures(output))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::Parse(output.to_string()))
}
