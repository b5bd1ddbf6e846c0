//! Report persistence and rendering

pub mod markdown;
pub mod store;

pub use store::ReportStore;
