//! Filesystem helpers used by the collaborator layer

pub mod dir;
pub mod file;
