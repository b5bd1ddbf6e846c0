//! Log text parsing
//!
//! The marker grammar lives in [`patterns`] as a table; the other modules
//! only walk matches.

pub mod frequency;
pub mod log;
pub mod patterns;
pub mod versions;

pub use log::{parse_log, ParsedLog};
