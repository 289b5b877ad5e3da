//! Runtime configuration.
//!
//! Nothing in this crate reads process-wide state such as the working
//! directory at call time: roots are resolved once, here or at the edge, and
//! handed to the stores explicitly.

use std::path::{Path, PathBuf};

use crate::error::BoxlabelError;
use crate::store::LabelLayout;

/// Default projects directory, relative to the working directory at startup.
pub const DEFAULT_PROJECTS_DIR: &str = "projects";

/// Settings shared by every [`Workspace`](crate::workspace::Workspace) operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `<name>.json` project snapshots.
    pub projects_dir: PathBuf,
    /// Mapping from image identifiers to label file paths.
    pub label_layout: LabelLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from(DEFAULT_PROJECTS_DIR),
            label_layout: LabelLayout::default(),
        }
    }
}

impl Config {
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_label_layout(mut self, layout: LabelLayout) -> Self {
        self.label_layout = layout;
        self
    }

    /// Returns a copy with every path made absolute.
    pub fn resolved(&self) -> Result<Self, BoxlabelError> {
        Ok(Self {
            projects_dir: absolute_root(&self.projects_dir)?,
            label_layout: self.label_layout,
        })
    }
}

/// Makes a user-supplied root absolute, without requiring it to exist.
pub fn absolute_root(path: &Path) -> Result<PathBuf, BoxlabelError> {
    std::path::absolute(path).map_err(|source| BoxlabelError::storage(path, source))
}
