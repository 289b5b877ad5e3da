//! Per-image label files under a destination root.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::atomic::write_atomic;
use crate::codec;
use crate::error::BoxlabelError;
use crate::model::{AnnotationSet, ImageIdentifier};
use crate::path_guard;

/// Extension of label files, without the dot.
pub const LABEL_EXTENSION: &str = "txt";

/// How an image identifier maps to a label file under the destination root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LabelLayout {
    /// `dest/<stem>.txt`, ignoring subdirectories.
    ///
    /// `a/x.jpg` and `b/x.jpg` share one label file.
    #[default]
    Basename,
    /// `dest/<subdirs>/<stem>.txt`, mirroring the source tree.
    Mirrored,
}

/// Reads and writes label files in one destination root.
#[derive(Clone, Debug)]
pub struct AnnotationStore {
    dest_root: PathBuf,
    layout: LabelLayout,
}

impl AnnotationStore {
    pub fn new(dest_root: impl Into<PathBuf>) -> Self {
        Self {
            dest_root: dest_root.into(),
            layout: LabelLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: LabelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Derives the label file path for `id`.
    ///
    /// # Errors
    /// - [`BoxlabelError::InvalidIdentifier`] if `id` has no file name.
    /// - [`BoxlabelError::PathEscape`] if a mirrored path leaves the root.
    pub fn label_path(&self, id: &ImageIdentifier) -> Result<PathBuf, BoxlabelError> {
        let stem = id
            .file_stem()
            .ok_or_else(|| BoxlabelError::InvalidIdentifier {
                identifier: id.to_string(),
                message: "identifier has no file name".to_string(),
            })?;
        let file_name = format!("{stem}.{LABEL_EXTENSION}");

        let relative = match (self.layout, id.parent()) {
            (LabelLayout::Mirrored, Some(parent)) => Path::new(parent).join(&file_name),
            _ => PathBuf::from(&file_name),
        };

        let path = path_guard::resolve(&self.dest_root, &relative)?;
        debug!(identifier = %id, label = %path.display(), "derived label path");
        Ok(path)
    }

    /// Writes `set` as the complete label file for `id`.
    ///
    /// Creates the destination root (and, for mirrored layouts, any
    /// subdirectories) first. Any previous contents are replaced.
    pub fn save(&self, id: &ImageIdentifier, set: &AnnotationSet) -> Result<PathBuf, BoxlabelError> {
        let path = self.label_path(id)?;

        fs::create_dir_all(&self.dest_root)
            .map_err(|source| BoxlabelError::storage(&self.dest_root, source))?;
        let parent = path.parent().unwrap_or(self.dest_root.as_path());
        path_guard::create_dir_confined(&self.dest_root, parent)?;

        let text = codec::encode(set);
        write_atomic(&path, |file| file.write_all(text.as_bytes()))?;

        info!(
            identifier = %id,
            path = %path.display(),
            annotations = set.len(),
            "saved annotations"
        );
        Ok(path)
    }

    /// Reads the label file for `id`.
    ///
    /// A missing file yields an empty set.
    ///
    /// # Errors
    /// - [`BoxlabelError::CorruptAnnotation`] if a record fails to decode.
    /// - [`BoxlabelError::Storage`] for any other read failure.
    pub fn load(&self, id: &ImageIdentifier) -> Result<AnnotationSet, BoxlabelError> {
        let path = self.label_path(id)?;

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(identifier = %id, "no label file; returning empty set");
                return Ok(AnnotationSet::new());
            }
            Err(source) => return Err(BoxlabelError::storage(path, source)),
        };

        codec::decode(&text).map_err(|source| BoxlabelError::CorruptAnnotation { path, source })
    }
}
