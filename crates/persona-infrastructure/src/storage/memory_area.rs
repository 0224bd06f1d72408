//! In-process storage area for tests and throwaway runs.

use persona_core::error::Result;
use persona_core::storage::{
    EXTERNAL_ORIGIN, OriginId, STORAGE_EVENT_CAPACITY, StorageArea, StorageEvent,
};
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;

pub struct MemoryStorageArea {
    items: RwLock<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl MemoryStorageArea {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(STORAGE_EVENT_CAPACITY);
        Self {
            items: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Simulates a write made by another process: the value changes and
    /// every subscribed handle is notified.
    pub fn external_write(&self, key: &str, value: Option<&str>) {
        self.write(key, value, EXTERNAL_ORIGIN);
    }

    fn write(&self, key: &str, value: Option<&str>, origin: OriginId) {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        match value {
            Some(v) => items.insert(key.to_string(), v.to_string()),
            None => items.remove(key),
        };
        drop(items);
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            new_value: value.map(str::to_string),
            origin,
        });
    }
}

impl Default for MemoryStorageArea {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageArea for MemoryStorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str, origin: OriginId) -> Result<()> {
        self.write(key, Some(value), origin);
        Ok(())
    }

    fn remove_item(&self, key: &str, origin: OriginId) -> Result<()> {
        self.write(key, None, origin);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}
