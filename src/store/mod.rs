//! Filesystem-backed stores for label files and project snapshots.
//!
//! Both stores overwrite whole files and never delete anything. Writes go
//! through [`atomic::write_atomic`], so a reader sees either the previous
//! document or the new one, never a partial write.

pub mod annotations;
pub mod atomic;
pub mod projects;

pub use annotations::{AnnotationStore, LabelLayout, LABEL_EXTENSION};
pub use projects::ProjectStore;
