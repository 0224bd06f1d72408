//! Session lifecycle and metadata operations.

use crate::app_state::AppState;
use persona_core::error::{PersonaError, Result};
use persona_core::session::{DEFAULT_SESSION_TITLE, Session, normalize_title};
use persona_core::stats::AdminStats;
use std::sync::Arc;

pub struct SessionService {
    state: Arc<AppState>,
}

impl SessionService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn list(&self) -> Vec<Session> {
        self.state.sessions()
    }

    pub fn find(&self, session_id: &str) -> Option<Session> {
        self.state.find_session(session_id)
    }

    /// Creates a session titled "New Chat Session" at the front of the list,
    /// greeting with the documents loaded right now.
    pub fn create(&self) -> Session {
        self.create_titled(DEFAULT_SESSION_TITLE)
    }

    pub fn create_titled(&self, title: &str) -> Session {
        let documents = self.state.documents();
        let session = Session::create(
            title,
            &documents,
            self.state.ids.as_ref(),
            persona_core::now_millis(),
        );

        let created = session.clone();
        self.state.sessions.update(move |sessions| {
            let mut next = Vec::with_capacity(sessions.len() + 1);
            next.push(created);
            next.extend(sessions.iter().cloned());
            next
        });
        tracing::info!(id = %session.id, "Session created");
        session
    }

    /// Renames a session. Whitespace is trimmed; an empty title becomes "Untitled Chat".
    pub fn rename(&self, session_id: &str, title: &str) -> Result<Session> {
        let title = normalize_title(title);
        self.modify(session_id, |session| session.title = title)
    }

    /// Sets the cooldown applied after each bot reply in this session.
    pub fn set_delay(&self, session_id: &str, delay_seconds: u32) -> Result<Session> {
        self.modify(session_id, |session| session.delay_seconds = delay_seconds)
    }

    pub fn delete(&self, session_id: &str) -> Result<Session> {
        let removed = self.state.sessions.try_update(|sessions| -> Result<_> {
            let index = sessions
                .iter()
                .position(|s| s.id == session_id)
                .ok_or_else(|| PersonaError::not_found("Session", session_id))?;
            let mut next = sessions.clone();
            let removed = next.remove(index);
            Ok((next, removed))
        })?;
        tracing::info!(id = %removed.id, "Session deleted");
        Ok(removed)
    }

    pub fn stats(&self) -> AdminStats {
        AdminStats::compute(&self.state.documents(), &self.state.sessions())
    }

    /// Find, change and store one session in a single update.
    fn modify<F>(&self, session_id: &str, change: F) -> Result<Session>
    where
        F: FnOnce(&mut Session),
    {
        let updated = self.state.sessions.try_update(|sessions| -> Result<_> {
            let mut next = sessions.clone();
            let session = next
                .iter_mut()
                .find(|s| s.id == session_id)
                .ok_or_else(|| PersonaError::not_found("Session", session_id))?;
            change(session);
            let updated = session.clone();
            Ok((next, updated))
        })?;
        tracing::debug!(id = %updated.id, title = %updated.title, delay = updated.delay_seconds, "Session updated");
        Ok(updated)
    }
}
