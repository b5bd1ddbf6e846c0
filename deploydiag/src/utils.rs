//! Utility functions

use serde::{Deserialize, Serialize};

/// Version information for the toolkit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Format a timestamp the way report filenames carry it (`20240101_101500`)
pub fn filename_stamp(at: chrono::DateTime<chrono::Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}
