//! Directory operations

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::errors::DiagError;
use crate::filesys::file::File;

/// A directory wrapper with path
#[derive(Debug, Clone)]
pub struct Dir {
    path: PathBuf,
}

impl Dir {
    /// Create a new directory reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory (and parents)
    pub async fn create(&self) -> Result<(), DiagError> {
        fs::create_dir_all(&self.path).await?;
        Ok(())
    }

    /// Reference a file inside this directory
    pub fn file(&self, name: &str) -> File {
        File::new(self.path.join(name))
    }

    /// List regular files in the directory, sorted by path
    pub async fn list_files(&self) -> Result<Vec<PathBuf>, DiagError> {
        let mut files = Vec::new();
        let mut entries = match fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DiagError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.path());
            }
        }

        files.sort();
        Ok(files)
    }
}
