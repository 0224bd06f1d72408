//! Infrastructure layer for PersonaChat RAG.
//!
//! Implements the storage contract from `persona-core` on the local file
//! system, provides the reactive `PersistentValue` store handle, resolves
//! paths, loads configuration and secrets, and extracts text from uploads.

pub mod config_service;
pub mod extract;
pub mod local_store;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::local_store::PersistentValue;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::storage::{JsonDirStorageArea, MemoryStorageArea};
