//! File-backed storage area: one JSON file per key.

use super::atomic_json::AtomicJsonFile;
use persona_core::error::Result;
use persona_core::storage::{OriginId, STORAGE_EVENT_CAPACITY, StorageArea, StorageEvent};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

/// A storage area persisted as `<dir>/<key>.json` files.
///
/// Directory structure:
/// ```text
/// dir/
/// ├── rag-files.json
/// └── rag-sessions.json
/// ```
pub struct JsonDirStorageArea {
    dir: PathBuf,
    events: broadcast::Sender<StorageEvent>,
}

impl JsonDirStorageArea {
    /// Opens (and creates if needed) a storage area rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!("Opened storage area at {:?}", dir);
        let (events, _) = broadcast::channel(STORAGE_EVENT_CAPACITY);
        Ok(Self { dir, events })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> AtomicJsonFile {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        AtomicJsonFile::new(self.dir.join(format!("{file_name}.json")))
    }

    fn notify(&self, key: &str, new_value: Option<String>, origin: OriginId) {
        // No receivers is fine; nobody is listening yet.
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            new_value,
            origin,
        });
    }
}

impl StorageArea for JsonDirStorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.file_for(key).read_raw()?)
    }

    fn set_item(&self, key: &str, value: &str, origin: OriginId) -> Result<()> {
        self.file_for(key).write_raw(value)?;
        self.notify(key, Some(value.to_string()), origin);
        Ok(())
    }

    fn remove_item(&self, key: &str, origin: OriginId) -> Result<()> {
        self.file_for(key).remove()?;
        self.notify(key, None, origin);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}
