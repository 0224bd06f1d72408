//! Durable key-value storage contract.
//!
//! A `StorageArea` is the shared, durable half of the local store: a flat
//! string-to-string map scoped to one data directory. Every handle opened on
//! the same area is notified of writes through [`StorageEvent`]s, which is how
//! independent views ("tabs") stay in sync.

use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Capacity of the broadcast channel carrying storage events.
pub const STORAGE_EVENT_CAPACITY: usize = 64;

/// Identifies the handle that performed a write.
pub type OriginId = u64;

/// Origin used for writes that did not come from a handle in this process.
pub const EXTERNAL_ORIGIN: OriginId = 0;

static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

/// Allocates an origin id distinct from every other one in this process.
pub fn next_origin_id() -> OriginId {
    NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed)
}

/// Notification that the value under `key` changed.
///
/// `new_value` is `None` when the key was removed. Handles ignore events
/// carrying their own `origin`, the way a browser tab never receives storage
/// events for its own writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub new_value: Option<String>,
    pub origin: OriginId,
}

/// Durable string key-value storage shared by every handle in one origin.
///
/// Implementations broadcast a [`StorageEvent`] after each successful
/// `set_item` or `remove_item`. Delivery order between subscribers is the
/// channel's order; there is no locking across keys and the last write wins.
pub trait StorageArea: Send + Sync {
    /// Reads the raw value under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Durably writes `value` under `key`, then notifies subscribers.
    fn set_item(&self, key: &str, value: &str, origin: OriginId) -> Result<()>;

    /// Removes `key`, then notifies subscribers. Removing a missing key is not an error.
    fn remove_item(&self, key: &str, origin: OriginId) -> Result<()>;

    /// Subscribes to change notifications for every key in this area.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
