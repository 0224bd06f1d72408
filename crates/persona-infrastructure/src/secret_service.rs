//! Secret service implementation.
//!
//! The Gemini API key comes from the environment (`API_KEY`, then
//! `GEMINI_API_KEY`) and otherwise from `secret.json`.

use crate::paths::{PathError, PersonaPaths};
use crate::storage::AtomicJsonFile;
use persona_core::config::SecretConfig;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Service for reading secret configuration.
///
/// The file is read once and cached. It is never written.
#[derive(Clone)]
pub struct SecretServiceImpl {
    file: AtomicJsonFile,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    pub fn new(paths: &PersonaPaths) -> Result<Self, PathError> {
        Ok(Self::with_path(paths.secret_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    /// Loads `secret.json`. Missing or invalid files yield an empty config.
    pub fn load_secrets(&self) -> SecretConfig {
        {
            let cached = self.secrets.read().unwrap_or_else(|e| e.into_inner());
            if let Some(secrets) = cached.as_ref() {
                return secrets.clone();
            }
        }

        let loaded = match self.file.load::<SecretConfig>() {
            Ok(Some(secrets)) => secrets,
            Ok(None) => SecretConfig::default(),
            Err(e) => {
                tracing::warn!(path = %self.file.path().display(), error = %e, "Failed to load secrets");
                SecretConfig::default()
            }
        };

        let mut cached = self.secrets.write().unwrap_or_else(|e| e.into_inner());
        *cached = Some(loaded.clone());
        loaded
    }

    /// Resolves the API key from the process environment, then the file.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_from(|name| std::env::var(name).ok())
    }

    /// Resolves the API key using `env` to look up variables.
    pub fn api_key_from<F>(&self, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| env(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .or_else(|| self.load_secrets().gemini_api_key().map(str::to_string))
    }

    /// Model name override from `secret.json`, if any.
    pub fn model_name(&self) -> Option<String> {
        self.load_secrets().gemini.and_then(|g| g.model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_has_no_key() {
        let dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::with_path(dir.path().join("secret.json"));
        assert_eq!(service.api_key_from(no_env), None);
        assert!(service.load_secrets().gemini.is_none());
    }

    #[test]
    fn test_key_and_model_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        std::fs::write(
            &path,
            r#"{"gemini":{"api_key":"file-key","model_name":"gemini-pro"}}"#,
        )
        .unwrap();

        let service = SecretServiceImpl::with_path(path);
        assert_eq!(service.api_key_from(no_env).as_deref(), Some("file-key"));
        assert_eq!(service.model_name().as_deref(), Some("gemini-pro"));
    }

    #[test]
    fn test_environment_wins_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini":{"api_key":"file-key"}}"#).unwrap();
        let service = SecretServiceImpl::with_path(path);

        let key = service.api_key_from(|name| match name {
            "API_KEY" => Some(" ".to_string()),
            "GEMINI_API_KEY" => Some("env-key".to_string()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_invalid_file_has_no_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        std::fs::write(&path, "{ invalid json").unwrap();

        let service = SecretServiceImpl::with_path(path);
        assert_eq!(service.api_key_from(no_env), None);
    }
}
