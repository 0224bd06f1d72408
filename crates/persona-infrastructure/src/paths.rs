//! Unified path management for PersonaChat RAG files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/persona-rag/        # Config directory
//! ├── config.toml               # Application configuration
//! └── secret.json               # API keys
//!
//! ~/.local/share/persona-rag/   # Data directory
//! └── store/                    # Persisted collections (one JSON file per key)
//!     ├── rag-files.json
//!     └── rag-sessions.json
//! ```
//!
//! When a base path is given (tests, portable installs) both trees live under it.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "persona-rag";

/// Environment variable overriding the store directory.
pub const STORE_DIR_ENV: &str = "PERSONA_DATA_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Resolves every file location the application uses.
#[derive(Debug, Clone, Default)]
pub struct PersonaPaths {
    base: Option<PathBuf>,
}

impl PersonaPaths {
    /// Creates a resolver. `None` uses the platform directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Returns the directory holding the persisted collections.
    ///
    /// Precedence: `PERSONA_DATA_DIR`, then `configured` (from `config.toml`),
    /// then `<data_dir>/store`.
    pub fn store_dir(&self, configured: Option<&Path>) -> Result<PathBuf, PathError> {
        if let Some(dir) = std::env::var_os(STORE_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = configured {
            return Ok(dir.to_path_buf());
        }
        Ok(self.data_dir()?.join("store"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_base() {
        let base = Path::new("/tmp/persona-test");
        let paths = PersonaPaths::new(Some(base));

        assert_eq!(paths.config_file().unwrap(), base.join("config.toml"));
        assert_eq!(paths.secret_file().unwrap(), base.join("secret.json"));
        assert!(paths.data_dir().unwrap().starts_with(base));
    }

    #[test]
    fn test_configured_store_dir_wins_over_default() {
        if std::env::var_os(STORE_DIR_ENV).is_some() {
            return;
        }
        let paths = PersonaPaths::new(Some(Path::new("/tmp/persona-test")));
        let configured = Path::new("/srv/persona");
        assert_eq!(paths.store_dir(Some(configured)).unwrap(), configured);
        assert!(paths.store_dir(None).unwrap().ends_with("store"));
    }

    #[test]
    fn test_platform_config_dir_name() {
        if let Ok(dir) = PersonaPaths::new(None).config_dir() {
            assert!(dir.ends_with(APP_DIR_NAME));
        }
    }
}
