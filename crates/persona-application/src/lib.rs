//! Application layer for PersonaChat RAG.
//!
//! Use cases that coordinate the pure domain rules from `persona-core` with
//! the reactive store from `persona-infrastructure`. Every service holds an
//! `Arc<AppState>`; there is no global state.

pub mod app_state;
pub mod chat_service;
pub mod document_service;
pub mod route;
pub mod session_service;
pub mod share_service;

pub use app_state::{AppState, FILES_KEY, SESSIONS_KEY};
pub use chat_service::{ChatService, TurnOutcome};
pub use document_service::{DocumentService, UploadFailure, UploadOutcome};
pub use route::{Navigation, Route};
pub use session_service::SessionService;
pub use share_service::ShareService;
