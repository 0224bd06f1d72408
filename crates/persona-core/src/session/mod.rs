//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: a persisted conversation thread (`Session`)
//! - `message`: conversation message types (`Sender`, `Message`)
//! - `welcome`: the seed bot message a new session starts with

mod message;
mod model;
mod welcome;

pub use message::{Message, Sender};
pub use model::{DEFAULT_SESSION_TITLE, Session, UNTITLED_SESSION_TITLE, normalize_title};
pub use welcome::{NO_DOCUMENTS_WELCOME, welcome_text};
