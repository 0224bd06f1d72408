//! Typed, persisted, observable values on top of a [`StorageArea`].
//!
//! A [`PersistentValue`] is one "tab"'s view of a key: it reads the stored
//! JSON once when opened, writes through on every change, and follows writes
//! made by other handles on the same area. Storage failures never reach the
//! caller; they are logged and the in-memory value carries on.

use persona_core::storage::{OriginId, StorageArea, StorageEvent, next_origin_id};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

pub struct PersistentValue<T> {
    key: String,
    default: T,
    origin: OriginId,
    area: Arc<dyn StorageArea>,
    state: watch::Sender<T>,
    // Serializes write-then-publish against incoming events.
    write_lock: Mutex<()>,
}

impl<T> PersistentValue<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Opens the value stored under `key`, or `default` when the key is
    /// absent, empty, unreadable or does not parse.
    pub fn open(area: Arc<dyn StorageArea>, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let initial = match area.get_item(&key) {
            Ok(raw) => parse_or_default(&key, raw.as_deref(), &default),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read stored value; using default");
                default.clone()
            }
        };
        let (state, _) = watch::channel(initial);
        Self {
            key,
            default,
            origin: next_origin_id(),
            area,
            state,
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current in-memory value.
    pub fn get(&self) -> T {
        self.state.borrow().clone()
    }

    /// Persists `value`, then makes it the current value.
    ///
    /// A failed write is logged; the in-memory value is updated regardless.
    pub fn set(&self, value: T) {
        let _guard = self.lock();
        self.store_locked(value);
    }

    /// Replaces the value with `f(current)` and returns the new value.
    ///
    /// `f` runs under the write lock, so concurrent updates on this handle
    /// never lose each other's changes.
    pub fn update<F>(&self, f: F) -> T
    where
        F: FnOnce(&T) -> T,
    {
        let _guard = self.lock();
        let next = f(&self.state.borrow());
        self.store_locked(next.clone());
        next
    }

    /// Like [`update`](Self::update), but `f` may refuse the change.
    ///
    /// Nothing is written when `f` returns an error.
    pub fn try_update<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&T) -> Result<(T, R), E>,
    {
        let _guard = self.lock();
        let (next, output) = f(&self.state.borrow())?;
        self.store_locked(next);
        Ok(output)
    }

    /// Subscribes to changes of the in-memory value.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.state.subscribe()
    }

    /// Applies a change notification from the storage area.
    ///
    /// Events for other keys, events from this handle and events whose value
    /// equals the current serialized value are ignored. A removed or
    /// unparsable value resets to the default. Returns whether the value was
    /// replaced.
    pub fn apply_event(&self, event: &StorageEvent) -> bool {
        if event.key != self.key || event.origin == self.origin {
            return false;
        }

        let _guard = self.lock();
        if let Some(incoming) = &event.new_value {
            let current = serde_json::to_string(&*self.state.borrow()).ok();
            if current.as_deref() == Some(incoming.as_str()) {
                return false;
            }
        }

        let next = parse_or_default(&self.key, event.new_value.as_deref(), &self.default);
        self.state.send_replace(next);
        tracing::debug!(key = %self.key, "Applied change from another handle");
        true
    }

    /// Re-reads the stored value, picking up writes made outside this process.
    ///
    /// A read failure keeps the current value.
    pub fn reload(&self) {
        let raw = match self.area.get_item(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to reload stored value");
                return;
            }
        };
        self.apply_event(&StorageEvent {
            key: self.key.clone(),
            new_value: raw.filter(|v| !v.trim().is_empty()),
            origin: persona_core::storage::EXTERNAL_ORIGIN,
        });
    }

    /// Spawns a task that follows writes made by other handles on the area.
    ///
    /// The task ends when the value is dropped or the area stops broadcasting.
    pub fn spawn_sync(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.area.subscribe();
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(value) = weak.upgrade() else { break };
                        value.apply_event(&event);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        let Some(value) = weak.upgrade() else { break };
                        tracing::warn!(key = %value.key, skipped, "Storage events lagged; reloading");
                        value.reload();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn store_locked(&self, value: T) {
        match serde_json::to_string(&value) {
            Ok(raw) => {
                if let Err(e) = self.area.set_item(&self.key, &raw, self.origin) {
                    tracing::warn!(key = %self.key, error = %e, "Failed to persist value");
                }
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to serialize value");
            }
        }
        self.state.send_replace(value);
    }
}

fn parse_or_default<T>(key: &str, raw: Option<&str>, default: &T) -> T
where
    T: Clone + DeserializeOwned,
{
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return default.clone();
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(key = %key, error = %e, "Stored value does not parse; using default");
        default.clone()
    })
}
