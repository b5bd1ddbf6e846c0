//! Report and signal data model
//!
//! Every report here is a plain value: built once by the pipeline, then
//! handed to the caller for rendering or persistence.

pub mod deployment;
pub mod health;
pub mod improvement;
pub mod metrics;
pub mod readiness;
pub mod snapshot;
