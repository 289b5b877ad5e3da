//! Image identifiers.
//!
//! An identifier is the image's path relative to its source root, always
//! written with `/` separators so it is stable across platforms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Addresses one image within a source root.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageIdentifier(String);

impl ImageIdentifier {
    /// Creates an identifier, normalizing `\` separators to `/`.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.contains('\\') {
            Self(raw.replace('\\', "/"))
        } else {
            Self(raw)
        }
    }

    /// Builds the identifier of `path` relative to `root`.
    ///
    /// Returns `None` if `path` is not under `root` or is not valid UTF-8.
    pub fn from_relative(root: &Path, path: &Path) -> Option<Self> {
        let rel = path.strip_prefix(root).ok()?;
        let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
        Some(Self(parts?.join("/")))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier viewed as a path. It may still contain `..` or be
    /// absolute; resolve it through [`crate::path_guard`] before use.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// The last path segment, e.g. `cat.jpg` for `train/cat.jpg`.
    pub fn file_name(&self) -> Option<&str> {
        self.0
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
    }

    /// The file name without its final extension.
    ///
    /// A leading dot is part of the stem, so `.hidden.png` yields `.hidden`
    /// and `.png` yields `.png`.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => Some(name),
            Some(idx) => Some(&name[..idx]),
        }
    }

    /// The directory part, e.g. `train/sub` for `train/sub/cat.jpg`.
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(parent, _)| parent)
    }
}

impl fmt::Debug for ImageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageIdentifier({:?})", self.0)
    }
}

impl fmt::Display for ImageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageIdentifier {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ImageIdentifier {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
