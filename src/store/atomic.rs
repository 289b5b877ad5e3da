//! Whole-file replacement through a temporary sibling file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::error::BoxlabelError;

/// Replaces `path` with the bytes produced by `write`.
///
/// The data is written to a temporary file in the same directory, flushed to
/// disk, and renamed over `path`. The parent directory must already exist.
/// On failure the temporary file is removed and `path` is left untouched.
///
/// An existing `path` keeps its permissions. A new file gets the same
/// permissions `File::create` would give it.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<(), BoxlabelError>
where
    F: FnOnce(&mut NamedTempFile) -> io::Result<()>,
{
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = temp_builder()
        .tempfile_in(dir)
        .map_err(|source| BoxlabelError::storage(dir, source))?;

    write(&mut temp)
        .and_then(|()| temp.flush())
        .and_then(|()| copy_permissions(path, &temp))
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|source| BoxlabelError::storage(path, source))?;

    temp.persist(path)
        .map_err(|err| BoxlabelError::storage(path, err.error))?;

    Ok(())
}

#[cfg(unix)]
fn temp_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    // Subject to the umask, like `File::create`.
    let mut builder = Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_builder() -> Builder<'static, 'static> {
    Builder::new()
}

fn copy_permissions(path: &Path, temp: &NamedTempFile) -> io::Result<()> {
    match fs::metadata(path) {
        Ok(metadata) => temp.as_file().set_permissions(metadata.permissions()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// Replaces `path` with `contents`.
pub fn write_bytes_atomic(path: &Path, contents: &[u8]) -> Result<(), BoxlabelError> {
    write_atomic(path, |file| file.write_all(contents))
}
