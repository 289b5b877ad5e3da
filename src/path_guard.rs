//! Path confinement.
//!
//! Every file this crate touches is addressed by a path relative to a root
//! the user chose. [`resolve`] turns such a relative path into an absolute
//! one and refuses anything that would land outside the root.
//!
//! Containment is checked component by component, so a root of `/a/b` never
//! admits `/a/bc`.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::BoxlabelError;

/// Resolves `relative` against `root` without touching the filesystem.
///
/// `.` components are dropped and `..` pops the previous component. The
/// result may be `root` itself.
///
/// # Errors
/// Returns [`BoxlabelError::PathEscape`] if `relative` is absolute, carries
/// a drive prefix, or climbs above `root`.
pub fn resolve(root: &Path, relative: impl AsRef<Path>) -> Result<PathBuf, BoxlabelError> {
    let relative = relative.as_ref();
    let escape = || BoxlabelError::PathEscape {
        root: root.to_path_buf(),
        relative: relative.to_string_lossy().into_owned(),
    };

    let root = normalize(root);
    let mut resolved = root.clone();
    let mut depth: usize = 0;

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(escape());
                }
                resolved.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return Err(escape()),
        }
    }

    if !resolved.starts_with(&root) {
        return Err(escape());
    }

    Ok(resolved)
}

/// Checks that an existing `path` is inside `root` once symlinks are
/// resolved on both sides.
///
/// Used before writing, so a symlinked directory inside a destination root
/// cannot redirect writes elsewhere.
pub fn confine_existing(root: &Path, path: &Path) -> Result<PathBuf, BoxlabelError> {
    let canonical_root =
        fs::canonicalize(root).map_err(|source| BoxlabelError::storage(root, source))?;
    let canonical_path =
        fs::canonicalize(path).map_err(|source| BoxlabelError::storage(path, source))?;

    if canonical_path.starts_with(&canonical_root) {
        Ok(canonical_path)
    } else {
        Err(BoxlabelError::PathEscape {
            root: canonical_root,
            relative: canonical_path.to_string_lossy().into_owned(),
        })
    }
}

/// Creates `dir` and any missing ancestors below `root`, one component at a
/// time.
///
/// `root` must already exist. Each directory is confined with
/// [`confine_existing`] before anything is created inside it, so a symlink
/// inside `root` never leads to directories being created elsewhere.
///
/// # Errors
/// - [`BoxlabelError::PathEscape`] if `dir` is not below `root`, or a
///   component resolves outside it.
/// - [`BoxlabelError::Storage`] if a directory cannot be created.
pub fn create_dir_confined(root: &Path, dir: &Path) -> Result<PathBuf, BoxlabelError> {
    let root = normalize(root);
    let relative = dir
        .strip_prefix(&root)
        .map_err(|_| BoxlabelError::PathEscape {
            root: root.clone(),
            relative: dir.to_string_lossy().into_owned(),
        })?;

    let mut current = root.clone();
    let mut confined = confine_existing(&root, &current)?;
    for component in relative.components() {
        current.push(component);
        match fs::create_dir(&current) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
            Err(source) => return Err(BoxlabelError::storage(&current, source)),
        }
        confined = confine_existing(&root, &current)?;
    }
    Ok(confined)
}

/// Lexically normalizes an absolute path (`.` removed, `..` applied).
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
