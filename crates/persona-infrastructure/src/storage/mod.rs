//! Storage layer: atomic file writes and the two `StorageArea` implementations.

mod atomic_json;
mod json_dir_area;
mod memory_area;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use json_dir_area::JsonDirStorageArea;
pub use memory_area::MemoryStorageArea;
