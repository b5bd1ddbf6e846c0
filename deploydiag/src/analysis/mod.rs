//! Analysis pipeline: classification, grading, aggregation, recommendations

pub mod aggregator;
pub mod deployment;
pub mod grading;
pub mod improvement;
pub mod readiness;
pub mod recommend;
pub mod snapshot;
pub mod sources;
