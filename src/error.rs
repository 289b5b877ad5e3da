use std::path::PathBuf;
use thiserror::Error;

use crate::codec::LabelDecodeError;

/// The main error type for boxlabel operations.
#[derive(Debug, Error)]
pub enum BoxlabelError {
    #[error("{what} not found: {path}")]
    NotFound { path: PathBuf, what: &'static str },

    #[error("Path '{relative}' escapes root {root}")]
    PathEscape { root: PathBuf, relative: String },

    #[error("Invalid image identifier '{identifier}': {message}")]
    InvalidIdentifier { identifier: String, message: String },

    #[error("Invalid project name '{name}': {message}")]
    InvalidProjectName { name: String, message: String },

    #[error("Corrupt label file {path}: {source}")]
    CorruptAnnotation {
        path: PathBuf,
        #[source]
        source: LabelDecodeError,
    },

    #[error("Failed to parse project JSON from {path}: {source}")]
    CorruptProject {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize project JSON for {path}: {source}")]
    ProjectWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image codec failed for {path}: {source}")]
    Codec {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse JSON input from {source_name}: {source}")]
    InputParse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse error classification for transport layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidPath,
    CorruptAnnotation,
    CorruptProject,
    Storage,
    Codec,
    InvalidInput,
}

impl ErrorKind {
    /// Stable snake_case name, used in machine-readable error output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidPath => "invalid_path",
            ErrorKind::CorruptAnnotation => "corrupt_annotation",
            ErrorKind::CorruptProject => "corrupt_project",
            ErrorKind::Storage => "storage",
            ErrorKind::Codec => "codec",
            ErrorKind::InvalidInput => "invalid_input",
        }
    }

    /// Whether the failure was caused by the caller's request rather than
    /// by the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound | ErrorKind::InvalidPath | ErrorKind::InvalidInput
        )
    }
}

impl BoxlabelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoxlabelError::NotFound { .. } => ErrorKind::NotFound,
            BoxlabelError::PathEscape { .. }
            | BoxlabelError::InvalidIdentifier { .. }
            | BoxlabelError::InvalidProjectName { .. } => ErrorKind::InvalidPath,
            BoxlabelError::CorruptAnnotation { .. } => ErrorKind::CorruptAnnotation,
            BoxlabelError::CorruptProject { .. } => ErrorKind::CorruptProject,
            BoxlabelError::ProjectWrite { .. } | BoxlabelError::Storage { .. } => {
                ErrorKind::Storage
            }
            BoxlabelError::Codec { .. } => ErrorKind::Codec,
            BoxlabelError::InputParse { .. } => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BoxlabelError::Storage {
            path: path.into(),
            source,
        }
    }
}
