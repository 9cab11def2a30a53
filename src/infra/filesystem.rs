//! Filesystem operations
//!
//! Directory creation and recursive copies used by the publisher.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{FilesystemError, PublishError};

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Copy a single file, creating the destination's parent directories
pub fn copy_file(from: &Path, to: &Path) -> Result<(), PublishError> {
    if let Some(parent) = to.parent() {
        create_dir_all(parent)?;
    }
    std::fs::copy(from, to).map_err(|e| PublishError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(())
}

/// Absolute, symlink-free form of `path`, which need not exist yet.
///
/// The deepest existing ancestor is canonicalized and the missing
/// components are appended unchanged.
pub fn resolve_path(path: &Path) -> Result<PathBuf, FilesystemError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| FilesystemError::Resolve {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?
            .join(path)
    };

    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    loop {
        match existing.canonicalize() {
            Ok(canonical) => {
                return Ok(missing.iter().rev().fold(canonical, |acc, part| acc.join(part)));
            }
            Err(_) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = parent;
                }
                _ => break,
            },
        }
    }
    Ok(absolute)
}

/// Recursively copy `from` into `to`, preserving relative paths.
/// Anything under `skip` is not descended into.
///
/// Returns the number of files copied.
pub fn copy_tree(from: &Path, to: &Path, skip: &Path) -> Result<usize, PublishError> {
    let mut copied = 0;

    let walker = WalkDir::new(from)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !entry.path().starts_with(skip));
    for entry in walker {
        let entry = entry.map_err(|e| FilesystemError::Walk {
            path: from.to_path_buf(),
            error: e.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| FilesystemError::Walk {
                path: entry.path().to_path_buf(),
                error: e.to_string(),
            })?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}
