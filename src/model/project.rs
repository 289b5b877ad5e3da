//! Named project snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::BoxlabelError;

/// File extension of project documents, without the dot.
pub const PROJECT_EXTENSION: &str = "json";

/// A project name that is safe to use as a single file name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Validates `raw` as a project name.
    ///
    /// Rejects empty names, `.` and `..`, path separators, and control
    /// characters. Whether the resulting file stays inside a particular
    /// projects directory is checked again by the store.
    pub fn parse(raw: &str) -> Result<Self, BoxlabelError> {
        let invalid = |message: &str| BoxlabelError::InvalidProjectName {
            name: raw.to_string(),
            message: message.to_string(),
        };

        if raw.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if raw == "." || raw == ".." {
            return Err(invalid("name is a relative directory reference"));
        }
        if raw.contains(['/', '\\']) {
            return Err(invalid("name contains a path separator"));
        }
        if raw.chars().any(char::is_control) {
            return Err(invalid("name contains a control character"));
        }
        if raw.contains(':') && cfg!(windows) {
            return Err(invalid("name contains a drive separator"));
        }

        Ok(Self(raw.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file name this project is stored under, e.g. `demo.json`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, PROJECT_EXTENSION)
    }
}

impl fmt::Debug for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectName({:?})", self.0)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProjectName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ProjectName::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A named, opaque snapshot of UI/session state.
///
/// The payload is never interpreted; it only has to survive a JSON round-trip.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub name: ProjectName,
    pub payload: Value,
}

impl Project {
    pub fn new(name: ProjectName, payload: Value) -> Self {
        Self { name, payload }
    }
}
