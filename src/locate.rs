//! Finding the directory that holds Maestro's runtime JARs.
//!
//! Installs come in several shapes (the zip from the install script, Homebrew,
//! hand-rolled layouts), so the library directory is found by trying a fixed
//! chain of strategies and taking the first directory that exists.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Shell assignment whose value starts with an absolute or
/// `$APP_HOME`-relative path to a file directly inside a `lib/` directory.
/// Captures the directory, e.g. `$APP_HOME/lib/` from
/// `CLASSPATH=$APP_HOME/lib/maestro-cli.jar:...`.
static LIB_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(?:export\s+)?[A-Za-z_][A-Za-z0-9_]*=["']?((?:/|\$\{?APP_HOME\}?/)(?:[^\s"':;]*/)?lib/)[^/\s"':;]*(?:[\s"':;]|$)"#,
    )
    .expect("lib path pattern is valid")
});

type Strategy = fn(&LibraryResolver) -> Option<PathBuf>;

/// Strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("launcher script", from_script),
    ("sibling lib directory", from_sibling),
    ("home lib directory", from_home),
];

/// Inputs to library path resolution.
#[derive(Debug, Clone)]
pub struct LibraryResolver {
    /// Resolved path of the Maestro binary, when it was found.
    pub binary: Option<PathBuf>,
    /// Directory checked when nothing next to the binary matches.
    pub home_lib_dir: PathBuf,
}

impl LibraryResolver {
    /// Resolver for `binary` as found on `PATH` (symlinks followed).
    pub fn for_binary(binary: &str, home_lib_dir: PathBuf) -> Self {
        let binary = which::which(binary)
            .ok()
            .map(|p| std::fs::canonicalize(&p).unwrap_or(p));
        Self {
            binary,
            home_lib_dir,
        }
    }

    /// Run the strategies in order and return the first existing directory.
    pub fn resolve(&self) -> Result<PathBuf> {
        let mut tried = Vec::with_capacity(STRATEGIES.len());
        for &(name, strategy) in STRATEGIES {
            if let Some(path) = strategy(self) {
                tracing::debug!(strategy = name, path = %path.display(), "found lib directory");
                return Ok(path);
            }
            tracing::debug!(strategy = name, "no lib directory");
            tried.push(name.to_string());
        }
        Err(Error::LibraryPathNotFound(tried))
    }

    /// Installation root: the directory above the binary's `bin/`.
    fn app_home(&self) -> Option<&Path> {
        self.binary.as_deref()?.parent()?.parent()
    }
}

/// Scan the launcher script for an assignment whose value leads with a
/// `lib/` path, on lines mentioning `CLASSPATH` or `/lib/`.
fn from_script(resolver: &LibraryResolver) -> Option<PathBuf> {
    let script = resolver.binary.as_deref()?;
    let content = std::fs::read_to_string(script).ok()?;
    let app_home = resolver.app_home();

    content
        .lines()
        .filter(|line| line.contains("CLASSPATH") || line.contains("/lib/"))
        .filter_map(|line| LIB_PATH.captures(line))
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| expand_app_home(m.as_str(), app_home))
        .find(|p| p.is_dir())
}

/// `<binary dir>/../lib`
fn from_sibling(resolver: &LibraryResolver) -> Option<PathBuf> {
    let lib = resolver.app_home()?.join("lib");
    lib.is_dir().then_some(lib)
}

fn from_home(resolver: &LibraryResolver) -> Option<PathBuf> {
    let lib = &resolver.home_lib_dir;
    lib.is_dir().then(|| lib.clone())
}

fn expand_app_home(raw: &str, app_home: Option<&Path>) -> Option<PathBuf> {
    let rest = raw
        .strip_prefix("${APP_HOME}")
        .or_else(|| raw.strip_prefix("$APP_HOME"));
    match rest {
        Some(rest) => Some(app_home?.join(rest.trim_start_matches('/'))),
        None => Some(PathBuf::from(raw)),
    }
}
