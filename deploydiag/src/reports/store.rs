//! Timestamped report files

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::errors::DiagError;
use crate::filesys::dir::Dir;
use crate::utils::filename_stamp;

/// Writes reports as `<prefix>_<YYYYmmdd_HHMMSS>.<ext>` into one directory
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: Dir,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: Dir::new(dir) }
    }

    /// File name a report written at `at` gets
    pub fn file_name(prefix: &str, at: DateTime<Local>, extension: &str) -> String {
        format!("{}_{}.{}", prefix, filename_stamp(at), extension)
    }

    /// Write pretty-printed JSON and return its path
    pub async fn save_json<T: Serialize>(
        &self,
        prefix: &str,
        at: DateTime<Local>,
        report: &T,
    ) -> Result<PathBuf, DiagError> {
        self.dir.create().await?;
        let file = self.dir.file(&Self::file_name(prefix, at, "json"));
        file.write_json(report).await?;
        info!("Report saved to {}", file.path().display());
        Ok(file.path().to_path_buf())
    }

    /// Write a rendered markdown document and return its path
    pub async fn save_markdown(
        &self,
        prefix: &str,
        at: DateTime<Local>,
        document: &str,
    ) -> Result<PathBuf, DiagError> {
        self.dir.create().await?;
        let file = self.dir.file(&Self::file_name(prefix, at, "md"));
        file.write_string(document).await?;
        info!("Report saved to {}", file.path().display());
        Ok(file.path().to_path_buf())
    }
}
