//! Best-effort loading of log and metrics sources
//!
//! A missing source is reported to the caller alongside the (default or
//! partial) value instead of failing the pipeline.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::errors::DiagError;
use crate::filesys::dir::Dir;
use crate::filesys::file::File;
use crate::models::improvement::ErrorFrequency;
use crate::models::metrics::MetricsDocument;
use crate::parse::frequency::error_frequency;

/// A value together with the sources that could not be read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected<T> {
    pub value: T,
    pub missing: Vec<PathBuf>,
}

impl<T> Collected<T> {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Read a deployment log; a missing or unreadable log yields empty text
pub async fn load_log_text(path: impl Into<PathBuf>) -> Collected<String> {
    let file = File::new(path);
    match file.read_string().await {
        Ok(text) => Collected {
            value: text,
            missing: Vec::new(),
        },
        Err(e) => {
            warn!("Deployment log unavailable: {}", e);
            Collected {
                value: String::new(),
                missing: vec![file.path().to_path_buf()],
            }
        }
    }
}

/// Merge metrics documents in order; later files override earlier keys
pub async fn load_metrics(paths: &[PathBuf]) -> Collected<MetricsDocument> {
    let mut collected = Collected::<MetricsDocument>::default();

    for path in paths {
        let file = File::new(path);
        match file.read_json::<MetricsDocument>().await {
            Ok(document) => {
                info!("Loaded metrics from {}", path.display());
                collected.value.merge(document);
            }
            Err(DiagError::NotFound(_)) => {
                warn!("Metrics file not found: {}", path.display());
                collected.missing.push(path.clone());
            }
            Err(e) => {
                warn!("Metrics file {} unreadable: {}", path.display(), e);
                collected.missing.push(path.clone());
            }
        }
    }

    collected
}

/// Group error lines across every file in `dir`
pub async fn scan_error_logs(dir: &Dir) -> Collected<Vec<ErrorFrequency>> {
    let files = match dir.list_files().await {
        Ok(files) => files,
        Err(e) => {
            warn!("Log directory unavailable: {}", e);
            return Collected {
                value: Vec::new(),
                missing: vec![dir.path().to_path_buf()],
            };
        }
    };

    let mut missing = Vec::new();
    let mut text = String::new();
    for path in files {
        match File::new(&path).read_string().await {
            Ok(contents) => {
                text.push_str(&contents);
                if !contents.ends_with('\n') {
                    text.push('\n');
                }
            }
            Err(e) => {
                warn!("Skipping log file {}: {}", path.display(), e);
                missing.push(path);
            }
        }
    }

    Collected {
        value: error_frequency(text.lines()),
        missing,
    }
}
