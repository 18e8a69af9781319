//! Copying JARs between the library, backup, and extraction directories.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Archive entries under this directory are macOS resource forks.
const PLATFORM_METADATA: &str = "__MACOSX";

/// Copy every `<prefix>*.jar` file in `lib_dir` into `backup_dir`.
///
/// Existing files in `backup_dir` with the same name are overwritten. A
/// failure leaves whatever was already copied in place.
pub fn backup_jars(lib_dir: &Path, backup_dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(backup_dir).map_err(|e| {
        Error::io(format!("failed to create backup directory {}", backup_dir.display()), e)
    })?;

    let mut copied = Vec::new();
    for name in list_jars(lib_dir)? {
        if !name.starts_with(prefix) {
            continue;
        }
        let dst = backup_dir.join(&name);
        copy_file(&lib_dir.join(&name), &dst)
            .map_err(|source| Error::Backup { file: name, source })?;
        copied.push(dst);
    }
    Ok(copied)
}

/// Copy every `.jar` under `extracted` into `lib_dir` by base name, skipping
/// platform metadata. Nested directories are flattened; on name collisions
/// the file walked last wins.
pub fn install_jars(extracted: &Path, lib_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut installed = Vec::new();
    for entry in WalkDir::new(extracted).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let context = format!("failed to walk {}", extracted.display());
            Error::io(context, e.into())
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry
            .path()
            .components()
            .any(|c| c.as_os_str() == PLATFORM_METADATA)
        {
            tracing::debug!(path = %entry.path().display(), "skipping platform metadata");
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_jar(&name) {
            continue;
        }

        let dst = lib_dir.join(&name);
        copy_file(entry.path(), &dst).map_err(|source| Error::Install { file: name, source })?;
        installed.push(dst);
    }

    if installed.is_empty() {
        return Err(Error::NoJarsFound);
    }
    Ok(installed)
}

/// Copy every `.jar` in `backup_dir` back into `lib_dir`, overwriting.
///
/// Fails with [`Error::NoBackupFound`] without touching `lib_dir` when the
/// backup directory does not exist.
pub fn restore_jars(backup_dir: &Path, lib_dir: &Path) -> Result<Vec<PathBuf>> {
    if !backup_dir.is_dir() {
        return Err(Error::NoBackupFound(backup_dir.to_path_buf()));
    }

    let mut restored = Vec::new();
    for name in list_jars(backup_dir)? {
        let dst = lib_dir.join(&name);
        copy_file(&backup_dir.join(&name), &dst)
            .map_err(|source| Error::Restore { file: name, source })?;
        restored.push(dst);
    }
    Ok(restored)
}

/// Names of the non-directory `.jar` entries directly inside `dir`, sorted.
fn list_jars(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::io(format!("failed to read {}", dir.display()), e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(format!("failed to read {}", dir.display()), e))?;
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_dir && is_jar(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn is_jar(name: &str) -> bool {
    name.ends_with(".jar")
}

/// Copy `src` over `dst` through a temporary file in `dst`'s directory, so
/// `dst` is either the old file or the complete new one.
fn copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    let dir = dst
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;

    let mut input = File::open(src)?;
    let mut staged = NamedTempFile::new_in(dir)?;
    io::copy(&mut input, staged.as_file_mut())?;
    staged.as_file().sync_all()?;

    let permissions = input.metadata()?.permissions();
    std::fs::set_permissions(staged.path(), permissions)?;

    staged.persist(dst).map_err(|e| e.error)?;
    Ok(())
}
