//! The operations offered to a transport (HTTP handler, CLI, UI bridge).
//!
//! Each method is self-contained: roots arrive with the call, are made
//! absolute, and feed freshly built stores. Nothing is cached between calls,
//! so the filesystem is the only state.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::config::{absolute_root, Config};
use crate::error::BoxlabelError;
use crate::image_index;
use crate::image_service::{ImageService, RotateDirection};
use crate::model::{AnnotationSet, ImageIdentifier, Project, ProjectName};
use crate::store::{AnnotationStore, ProjectStore};

/// Entry point for all annotation, image and project operations.
#[derive(Clone, Debug)]
pub struct Workspace {
    config: Config,
}

impl Workspace {
    /// Creates a workspace, resolving the configured paths to absolute ones.
    pub fn new(config: Config) -> Result<Self, BoxlabelError> {
        Ok(Self {
            config: config.resolved()?,
        })
    }

    /// Checks a source/destination pair before a labeling session.
    ///
    /// The source must be a directory; the destination is created if
    /// missing. Returns the number of images found in the source.
    pub fn set_dirs(&self, source: &Path, dest: &Path) -> Result<usize, BoxlabelError> {
        let source = absolute_root(source)?;
        let dest = absolute_root(dest)?;

        let count = image_index::count(&source)?;
        fs::create_dir_all(&dest).map_err(|err| BoxlabelError::storage(&dest, err))?;

        info!(source = %source.display(), dest = %dest.display(), count, "directories set");
        Ok(count)
    }

    pub fn list_images(&self, source: &Path) -> Result<Vec<ImageIdentifier>, BoxlabelError> {
        image_index::list(&absolute_root(source)?)
    }

    /// Resolves and opens one image for streaming.
    pub fn open_image(&self, source: &Path, id: &ImageIdentifier) -> Result<File, BoxlabelError> {
        self.images(source)?.open(id)
    }

    /// Path of one image, after confinement and existence checks.
    pub fn image_path(&self, source: &Path, id: &ImageIdentifier) -> Result<PathBuf, BoxlabelError> {
        self.images(source)?.resolve(id)
    }

    /// Replaces the annotations of an image.
    ///
    /// The image must exist under `source`; labels land under `dest`.
    pub fn save_annotations(
        &self,
        source: &Path,
        dest: &Path,
        id: &ImageIdentifier,
        set: &AnnotationSet,
    ) -> Result<PathBuf, BoxlabelError> {
        self.images(source)?.resolve(id)?;
        self.annotations(dest)?.save(id, set)
    }

    /// Reads the annotations of an image; empty if none were saved.
    pub fn load_annotations(
        &self,
        dest: &Path,
        id: &ImageIdentifier,
    ) -> Result<AnnotationSet, BoxlabelError> {
        self.annotations(dest)?.load(id)
    }

    pub fn rotate_image(
        &self,
        source: &Path,
        id: &ImageIdentifier,
        direction: RotateDirection,
    ) -> Result<(), BoxlabelError> {
        self.images(source)?.rotate(id, direction)
    }

    /// Saves a project snapshot and returns the file written.
    pub fn save_project(&self, name: &str, payload: Value) -> Result<PathBuf, BoxlabelError> {
        let project = Project::new(ProjectName::parse(name)?, payload);
        self.projects().save(&project)
    }

    pub fn load_project(&self, name: &str) -> Result<Value, BoxlabelError> {
        let name = ProjectName::parse(name)?;
        self.projects().load(&name).map(|project| project.payload)
    }

    pub fn list_projects(&self) -> Result<Vec<String>, BoxlabelError> {
        Ok(self
            .projects()
            .list()?
            .into_iter()
            .map(|name| name.as_str().to_string())
            .collect())
    }

    fn images(&self, source: &Path) -> Result<ImageService, BoxlabelError> {
        Ok(ImageService::new(absolute_root(source)?))
    }

    fn annotations(&self, dest: &Path) -> Result<AnnotationStore, BoxlabelError> {
        Ok(AnnotationStore::new(absolute_root(dest)?).with_layout(self.config.label_layout))
    }

    fn projects(&self) -> ProjectStore {
        ProjectStore::new(&self.config.projects_dir)
    }
}
