//! JSON file progress store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use animind_core::error::StoreError;
use animind_core::traits::ProgressStore;

/// Default file name of the progress record.
pub const DEFAULT_PROGRESS_FILE: &str = "animind_user.json";

/// Keeps the progress record as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a record has been written yet.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl ProgressStore for FileProgressStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read_record(&self) -> Result<Option<String>, StoreError> {
        // Invalid UTF-8 is handed on as-is so decoding rejects it as corrupt.
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_record(&mut self, contents: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, contents)?;
        tracing::trace!("wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}
