//! Zip extraction that refuses entries escaping the destination.

use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Extract the zip at `src` into `dest`, creating `dest` if needed.
///
/// Entries whose names resolve outside `dest` abort the extraction with
/// [`Error::PathTraversal`] before anything is written for them.
pub fn extract(src: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(src)
        .map_err(|e| Error::io(format!("failed to open {}", src.display()), e))?;
    let mut archive = ZipArchive::new(file)?;

    std::fs::create_dir_all(dest)
        .map_err(|e| Error::io(format!("failed to create {}", dest.display()), e))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let out_path = safe_join(dest, entry.name())?;

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)
                .map_err(|e| Error::io(format!("failed to create {}", out_path.display()), e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("failed to create {}", parent.display()), e))?;
        }

        let mut out = File::create(&out_path)
            .map_err(|e| Error::io(format!("failed to create {}", out_path.display()), e))?;
        io::copy(&mut entry, &mut out)
            .map_err(|e| Error::io(format!("failed to extract {}", entry.name()), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                // Owner must still be able to read the file for the install step.
                let mode = (mode & 0o7777) | 0o600;
                std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| {
                        Error::io(format!("failed to set mode on {}", out_path.display()), e)
                    })?;
            }
        }

        tracing::debug!(entry = entry.name(), "extracted");
        written += 1;
    }

    Ok(written)
}

/// Join an archive entry name onto `root` lexically, rejecting anything that
/// is absolute or climbs above `root`.
pub fn safe_join(root: &Path, name: &str) -> Result<PathBuf> {
    let normalized = name.replace('\\', "/");
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(Error::PathTraversal(name.to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::PathTraversal(name.to_string()));
            }
        }
    }
    Ok(parts.iter().fold(root.to_path_buf(), |acc, part| acc.join(part)))
}

#[cfg(test)]
mod tests;
