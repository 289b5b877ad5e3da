//! Image discovery under a source root.
//!
//! Identifiers are never stored; they are recomputed on every listing. That
//! makes the listing order part of the contract: two listings of an
//! unchanged directory must agree element for element.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::BoxlabelError;
use crate::model::ImageIdentifier;

/// Image file extensions recognized by the index, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// Lists every image under `source_root`, sorted by relative path.
///
/// # Errors
/// - [`BoxlabelError::NotFound`] if `source_root` is missing or not a directory.
/// - [`BoxlabelError::Storage`] if the root itself cannot be read.
///
/// Unreadable entries below the root are skipped with a warning.
pub fn list(source_root: &Path) -> Result<Vec<ImageIdentifier>, BoxlabelError> {
    if !source_root.is_dir() {
        return Err(BoxlabelError::NotFound {
            path: source_root.to_path_buf(),
            what: "source directory",
        });
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(source_root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
            Err(source) => {
                let path = source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| source_root.to_path_buf());
                return Err(BoxlabelError::storage(path, source.into()));
            }
        };

        // Symlinked files count; symlinked directories are not descended.
        if entry.file_type().is_dir() || !entry.path().is_file() {
            continue;
        }
        if !has_image_extension(entry.path()) {
            continue;
        }

        match ImageIdentifier::from_relative(source_root, entry.path()) {
            Some(id) => images.push(id),
            None => warn!(
                path = %entry.path().display(),
                "skipping image with a non UTF-8 path"
            ),
        }
    }

    images.sort_unstable();
    debug!(root = %source_root.display(), count = images.len(), "listed images");

    Ok(images)
}

/// Number of images under `source_root`.
pub fn count(source_root: &Path) -> Result<usize, BoxlabelError> {
    list(source_root).map(|images| images.len())
}

/// True if the file name ends with `.` plus one of [`IMAGE_EXTENSIONS`].
pub fn has_image_extension(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}
