//! The two persisted collections and the id source, shared by every service.

use persona_core::document::Document;
use persona_core::id::{IdGenerator, UuidIdGenerator};
use persona_core::session::Session;
use persona_core::storage::StorageArea;
use persona_infrastructure::PersistentValue;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Storage key of the document collection.
pub const FILES_KEY: &str = "rag-files";

/// Storage key of the session collection.
pub const SESSIONS_KEY: &str = "rag-sessions";

/// One view ("tab") of the persisted application state.
///
/// Several `AppState`s opened on the same storage area behave like several
/// browser tabs: each keeps its own in-memory copy and follows the others'
/// writes once [`spawn_sync`](Self::spawn_sync) is running.
pub struct AppState {
    pub documents: Arc<PersistentValue<Vec<Document>>>,
    pub sessions: Arc<PersistentValue<Vec<Session>>>,
    pub ids: Arc<dyn IdGenerator>,
}

impl AppState {
    pub fn open(area: Arc<dyn StorageArea>) -> Self {
        Self::open_with_ids(area, Arc::new(UuidIdGenerator))
    }

    pub fn open_with_ids(area: Arc<dyn StorageArea>, ids: Arc<dyn IdGenerator>) -> Self {
        let documents = PersistentValue::open(area.clone(), FILES_KEY, Vec::new());
        let sessions = PersistentValue::open(area, SESSIONS_KEY, Vec::new());
        tracing::debug!(
            documents = documents.get().len(),
            sessions = sessions.get().len(),
            "Opened application state"
        );
        Self {
            documents: Arc::new(documents),
            sessions: Arc::new(sessions),
            ids,
        }
    }

    /// Starts following writes made by other handles on the same area.
    /// Must be called inside a tokio runtime.
    pub fn spawn_sync(&self) -> Vec<JoinHandle<()>> {
        vec![self.documents.spawn_sync(), self.sessions.spawn_sync()]
    }

    /// Re-reads both collections from storage.
    pub fn reload(&self) {
        self.documents.reload();
        self.sessions.reload();
    }

    pub fn documents(&self) -> Vec<Document> {
        self.documents.get()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.sessions.get()
    }

    pub fn find_session(&self, session_id: &str) -> Option<Session> {
        self.sessions
            .get()
            .into_iter()
            .find(|s| s.id == session_id)
    }
}
