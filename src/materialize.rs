//! # Writing Output to the Repository
//!
//! This is the last stage before committing. It writes the generated
//! documents into the working copy and stages them.
//!
//! ## Process
//!
//! 1.  **Resolve**: every filename is joined to the repository root (when
//!     relative) and lexically normalized, so `..` components are folded
//!     away without touching the filesystem.
//!
//! 2.  **Contain**: every resolved path must lie under the repository root.
//!     Symlinks are followed for the parts of the path that already exist.
//!     The whole batch is checked before the first write, so one escaping
//!     path, or two documents sharing a target, means nothing is written.
//!
//! 3.  **Write**: parent directories are created as needed and the content
//!     overwrites any existing file. Empty content still produces a file.
//!
//! 4.  **Stage**: each written path is handed to `git add`.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::generate::GeneratedFile;
use crate::git::VersionControl;

/// Lexically normalizes `path` against `root`.
///
/// Relative paths are joined to `root`. `.` components are dropped and `..`
/// pops the previous component; nothing is resolved on disk.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolves `path` and checks that it stays under `root`.
///
/// The comparison is component-wise, so `/repo-other` is not inside `/repo`,
/// and the root itself is not a valid file target. The check is repeated on
/// the physical path: the deepest existing ancestor is canonicalized, so a
/// symlink inside the working copy cannot redirect a write outside it.
pub fn contained_path(root: &Path, path: &Path) -> Result<PathBuf> {
    let resolved = resolve_path(root, path);
    let lexically_inside = resolved.starts_with(root) && resolved != root;

    let physical_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let physically_inside = lexically_inside
        && physical_path(&resolved)
            .map(|physical| physical.starts_with(&physical_root) && physical != physical_root)
            .unwrap_or(false);

    if physically_inside {
        Ok(resolved)
    } else {
        Err(Error::PathEscape {
            path: resolved,
            root: root.to_path_buf(),
        })
    }
}

/// Canonicalizes the deepest existing ancestor of `path` and re-appends the
/// components that do not exist yet.
///
/// Returns `None` for a dangling symlink, whose target a write would create
/// wherever it points.
fn physical_path(path: &Path) -> Option<PathBuf> {
    let mut existing = path;
    let mut missing: Vec<&OsStr> = Vec::new();
    loop {
        match existing.canonicalize() {
            Ok(mut physical) => {
                physical.extend(missing.iter().rev());
                return Some(physical);
            }
            Err(_) => {
                if fs::symlink_metadata(existing).is_ok() {
                    return None;
                }
                missing.push(existing.file_name()?);
                existing = existing.parent()?;
            }
        }
    }
}

/// Resolves and checks every file in `files` without writing anything.
///
/// Fails when two files resolve to the same target. Returns the absolute
/// target paths in batch order.
pub fn plan(root: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::with_capacity(files.len());
    let mut targets = Vec::with_capacity(files.len());

    for file in files {
        let target = contained_path(root, &file.filename)?;
        if let Some(first) = seen.insert(target.clone(), &file.filename) {
            return Err(Error::DuplicateOutput {
                path: target,
                first: first.to_path_buf(),
                second: file.filename.clone(),
            });
        }
        targets.push(target);
    }

    Ok(targets)
}

/// Writes `files` under the repository root and stages each one.
///
/// Returns the absolute paths written, in batch order.
pub fn materialize(vcs: &dyn VersionControl, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    let root = vcs.root();
    let targets = plan(root, files)?;

    for (file, target) in files.iter().zip(&targets) {
        if let Some(parent) = target.parent() {
            if parent != root {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Io(std::io::Error::new(
                        e.kind(),
                        format!("failed to create directory '{}': {}", parent.display(), e),
                    ))
                })?;
            }
        }

        fs::write(target, &file.content).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("failed to write '{}': {}", target.display(), e),
            ))
        })?;
        debug!("Wrote {} ({} bytes)", target.display(), file.content.len());

        vcs.add(target)?;
    }

    info!("Wrote and staged {} file(s)", targets.len());
    Ok(targets)
}
