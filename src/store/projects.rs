//! Named project snapshots stored as flat JSON files.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use super::atomic::write_atomic;
use crate::error::BoxlabelError;
use crate::model::{Project, ProjectName, PROJECT_EXTENSION};
use crate::path_guard;

/// Reads and writes `<name>.json` documents in one projects directory.
#[derive(Clone, Debug)]
pub struct ProjectStore {
    dir: PathBuf,
}

impl ProjectStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a project is stored in.
    ///
    /// # Errors
    /// Returns [`BoxlabelError::InvalidProjectName`] unless the file is a
    /// direct child of the projects directory.
    pub fn project_path(&self, name: &ProjectName) -> Result<PathBuf, BoxlabelError> {
        let file_name = name.file_name();
        let path = path_guard::resolve(&self.dir, &file_name).map_err(|_| {
            BoxlabelError::InvalidProjectName {
                name: name.to_string(),
                message: "name escapes the projects directory".to_string(),
            }
        })?;

        if path.parent() != Some(path_guard::resolve(&self.dir, "")?.as_path()) {
            return Err(BoxlabelError::InvalidProjectName {
                name: name.to_string(),
                message: "name must map to a single file name".to_string(),
            });
        }
        Ok(path)
    }

    /// Saves `project`, replacing any earlier snapshot with the same name.
    ///
    /// Returns the path written.
    pub fn save(&self, project: &Project) -> Result<PathBuf, BoxlabelError> {
        let path = self.project_path(&project.name)?;

        fs::create_dir_all(&self.dir).map_err(|source| BoxlabelError::storage(&self.dir, source))?;

        let json = serde_json::to_vec_pretty(&project.payload).map_err(|source| {
            BoxlabelError::ProjectWrite {
                path: path.clone(),
                source,
            }
        })?;
        write_atomic(&path, |file| {
            let mut writer = BufWriter::new(file);
            writer.write_all(&json)?;
            writer.flush()
        })?;

        info!(project = %project.name, path = %path.display(), "saved project");
        Ok(path)
    }

    /// Loads the snapshot saved under `name`.
    ///
    /// # Errors
    /// - [`BoxlabelError::NotFound`] if no such project exists.
    /// - [`BoxlabelError::CorruptProject`] if the file is not valid JSON.
    /// - [`BoxlabelError::Storage`] for any other read failure.
    pub fn load(&self, name: &ProjectName) -> Result<Project, BoxlabelError> {
        let path = self.project_path(name)?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(BoxlabelError::NotFound {
                    path,
                    what: "project",
                });
            }
            Err(source) => return Err(BoxlabelError::storage(path, source)),
        };

        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|source| BoxlabelError::CorruptProject { path, source })?;

        Ok(Project::new(name.clone(), payload))
    }

    /// Lazily yields the name of every `*.json` file in the projects
    /// directory, in directory order.
    ///
    /// Entries whose name is not a valid [`ProjectName`] yield an error item
    /// instead of ending the iteration. A missing directory yields nothing.
    pub fn entries(
        &self,
    ) -> Result<impl Iterator<Item = Result<ProjectName, BoxlabelError>> + '_, BoxlabelError> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => Some(read_dir),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(BoxlabelError::storage(&self.dir, source)),
        };

        Ok(read_dir.into_iter().flatten().filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => return Some(Err(BoxlabelError::storage(&self.dir, source))),
            };
            let path = entry.path();
            let is_project = path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == PROJECT_EXTENSION);
            if !is_project {
                return None;
            }
            Some(project_name_from_path(&path))
        }))
    }

    /// Names of all saved projects, sorted. Unreadable entries are skipped.
    pub fn list(&self) -> Result<Vec<ProjectName>, BoxlabelError> {
        let mut names: Vec<ProjectName> = self
            .entries()?
            .filter_map(|entry| match entry {
                Ok(name) => Some(name),
                Err(err) => {
                    debug!(error = %err, "skipping project entry");
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

fn project_name_from_path(path: &Path) -> Result<ProjectName, BoxlabelError> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| BoxlabelError::InvalidProjectName {
            name: path.to_string_lossy().into_owned(),
            message: "file name is not valid UTF-8".to_string(),
        })?;
    ProjectName::parse(stem)
}
