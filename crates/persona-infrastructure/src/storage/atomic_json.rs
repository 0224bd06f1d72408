//! Atomic JSON file operations.
//!
//! Provides:
//! - **Atomicity**: writes go to a temp file that is renamed over the target
//! - **Isolation**: an exclusive lock file serializes writers across processes
//! - **Durability**: explicit fsync before rename

use serde::de::DeserializeOwned;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during atomic JSON operations.
#[derive(Debug, Error)]
pub enum AtomicJsonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicJsonError> for persona_core::PersonaError {
    fn from(err: AtomicJsonError) -> Self {
        match err {
            AtomicJsonError::Io(e) => e.into(),
            AtomicJsonError::Json(e) => e.into(),
            AtomicJsonError::Lock(message) => Self::io(message),
        }
    }
}

/// A handle to a JSON file that is always replaced as a whole.
#[derive(Debug, Clone)]
pub struct AtomicJsonFile {
    path: PathBuf,
}

impl AtomicJsonFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw file content.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read_raw(&self) -> Result<Option<String>, AtomicJsonError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads and deserializes the file.
    ///
    /// Returns `Ok(None)` when the file does not exist or is blank.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, AtomicJsonError> {
        match self.read_raw()? {
            Some(content) if !content.trim().is_empty() => Ok(Some(serde_json::from_str(&content)?)),
            _ => Ok(None),
        }
    }

    /// Replaces the file content atomically under an exclusive lock.
    pub fn write_raw(&self, content: &str) -> Result<(), AtomicJsonError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let _lock = FileLock::acquire(&self.path)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Deletes the file. A missing file is not an error.
    pub fn remove(&self) -> Result<(), AtomicJsonError> {
        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicJsonError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicJsonError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Exclusive lock on `<file>.lock`, released on drop.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicJsonError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| AtomicJsonError::Lock(format!("Failed to acquire lock: {}", e)))?;

        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::new(temp_dir.path().join("value.json"));

        file.write_raw(r#"{"name":"first"}"#).unwrap();
        file.write_raw(r#"{"name":"second"}"#).unwrap();

        assert_eq!(file.read_raw().unwrap().as_deref(), Some(r#"{"name":"second"}"#));
        let loaded: Sample = file.load().unwrap().unwrap();
        assert_eq!(loaded.name, "second");
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::new(temp_dir.path().join("missing.json"));

        assert!(file.read_raw().unwrap().is_none());
        assert!(file.load::<Sample>().unwrap().is_none());
        file.remove().unwrap();
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("value.json");
        let file = AtomicJsonFile::new(path.clone());

        file.write_raw("[]").unwrap();

        assert!(path.exists());
        assert!(!path.with_file_name(".value.json.tmp").exists());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::new(temp_dir.path().join("broken.json"));
        file.write_raw("{ not json").unwrap();

        assert!(matches!(file.load::<Sample>(), Err(AtomicJsonError::Json(_))));
    }
}
