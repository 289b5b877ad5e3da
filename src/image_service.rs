//! Resolving identifiers to image files, and the rotate transform.
//!
//! Pixel work is delegated entirely to the `image` crate; this module only
//! decides which file to touch and how to write it back safely.

use std::fmt;
use std::fs::File;
use std::io::Cursor;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BoxlabelError;
use crate::model::ImageIdentifier;
use crate::path_guard;
use crate::store::atomic::write_bytes_atomic;

/// Direction of a 90 degree rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RotateDirection {
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
}

impl FromStr for RotateDirection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.eq_ignore_ascii_case("left") {
            Ok(RotateDirection::Left)
        } else if raw.eq_ignore_ascii_case("right") {
            Ok(RotateDirection::Right)
        } else {
            Err(format!("unknown direction '{raw}' (expected 'left' or 'right')"))
        }
    }
}

impl fmt::Display for RotateDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotateDirection::Left => f.write_str("left"),
            RotateDirection::Right => f.write_str("right"),
        }
    }
}

/// Image access confined to one source root.
#[derive(Clone, Debug)]
pub struct ImageService {
    source_root: PathBuf,
}

impl ImageService {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }

    /// Resolves `id` to an existing file under the source root.
    ///
    /// # Errors
    /// - [`BoxlabelError::PathEscape`] if `id` points outside the root.
    /// - [`BoxlabelError::NotFound`] if nothing, or a directory, is there.
    pub fn resolve(&self, id: &ImageIdentifier) -> Result<PathBuf, BoxlabelError> {
        let path = path_guard::resolve(&self.source_root, id.as_path())?;
        if !path.is_file() {
            return Err(BoxlabelError::NotFound {
                path,
                what: "image",
            });
        }
        Ok(path)
    }

    /// Opens the image file for streaming its bytes.
    pub fn open(&self, id: &ImageIdentifier) -> Result<File, BoxlabelError> {
        let path = self.resolve(id)?;
        File::open(&path).map_err(|source| BoxlabelError::storage(path, source))
    }

    /// Rotates the image 90 degrees in place, swapping width and height.
    ///
    /// The image is re-encoded in the format it was read in. Encoding happens
    /// in memory, so the original file is untouched if it fails. A symlinked
    /// identifier is rotated at its target, and the link is kept.
    ///
    /// # Errors
    /// Besides the errors of [`resolve`](Self::resolve), returns
    /// [`BoxlabelError::Codec`] if the image cannot be decoded or encoded,
    /// and [`BoxlabelError::PathEscape`] if a symlink leads outside the root.
    pub fn rotate(
        &self,
        id: &ImageIdentifier,
        direction: RotateDirection,
    ) -> Result<(), BoxlabelError> {
        let path = path_guard::confine_existing(&self.source_root, &self.resolve(id)?)?;
        let codec_err = |source: image::ImageError| BoxlabelError::Codec {
            path: path.clone(),
            source,
        };

        let reader = ImageReader::open(&path)
            .map_err(|source| BoxlabelError::storage(&path, source))?
            .with_guessed_format()
            .map_err(|source| BoxlabelError::storage(&path, source))?;
        let format = match reader.format() {
            Some(format) => format,
            None => ImageFormat::from_path(&path).map_err(codec_err)?,
        };
        let img = reader.decode().map_err(codec_err)?;

        let rotated = match direction {
            RotateDirection::Left => img.rotate270(),
            RotateDirection::Right => img.rotate90(),
        };

        let mut encoded = Cursor::new(Vec::new());
        rotated.write_to(&mut encoded, format).map_err(codec_err)?;
        write_bytes_atomic(&path, encoded.get_ref())?;

        info!(
            identifier = %id,
            direction = %direction,
            width = rotated.width(),
            height = rotated.height(),
            "rotated image"
        );
        Ok(())
    }
}
