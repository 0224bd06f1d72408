//! Shareable state: packing one session plus its grounding documents into a
//! URL-safe token, and merging an unpacked payload into local collections.

mod codec;
mod merge;

pub use codec::{DecodeError, EncodeError, SharePayload, decode, encode};
pub use merge::{MergeResult, merge, merge_documents, merge_session};
