//! Deployment diagnostics library
//!
//! Parses deployment logs into stage and error records, aggregates live
//! health signals into a graded verdict, and derives remediation hints.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod filesys;
pub mod logs;
pub mod models;
pub mod parse;
pub mod probes;
pub mod reports;
pub mod timespan;
pub mod utils;
