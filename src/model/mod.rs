//! Data model for images, annotations and projects.
//!
//! # Design Principles
//!
//! 1. **Permissive Values**: annotation coordinates are stored exactly as
//!    supplied. Values outside `[0, 1]`, or even non-finite values, survive a
//!    save/load cycle unchanged.
//!
//! 2. **Validated Names**: anything that becomes part of a file path
//!    (project names, identifiers) is checked before it reaches the
//!    filesystem.
//!
//! # Example
//!
//! ```
//! use boxlabel::model::{Annotation, AnnotationSet, ImageIdentifier};
//!
//! let id = ImageIdentifier::new("train/cat.jpg");
//! let set: AnnotationSet = vec![Annotation::new(0, 0.5, 0.5, 0.2, 0.2)].into();
//!
//! assert_eq!(id.file_stem(), Some("cat"));
//! assert_eq!(set.len(), 1);
//! ```

mod annotation;
mod ids;
mod project;

pub use annotation::{Annotation, AnnotationSet};
pub use ids::ImageIdentifier;
pub use project::{Project, ProjectName, PROJECT_EXTENSION};
