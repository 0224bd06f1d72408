//! Share links: packing a session into a URL and importing one back.

use crate::app_state::AppState;
use crate::route::{Navigation, Route};
use persona_core::error::{PersonaError, Result};
use persona_core::share::{self, merge_documents, merge_session};
use std::sync::Arc;

/// Length past which a share link is likely to be truncated by browsers or chat apps.
pub const MAX_PRACTICAL_URL_LEN: usize = 8192;

/// Shown after a link is created.
pub const SHARE_LINK_NOTE: &str =
    "Note: The app must be on a public URL for others to use this link.";

/// Shown when an opened share link cannot be imported.
pub const INVALID_LINK_NOTICE: &str =
    "The shared link is invalid or corrupted. Redirecting to admin page.";

pub struct ShareService {
    state: Arc<AppState>,
    base_url: String,
}

impl ShareService {
    /// `base_url` is the address the application is served from; any
    /// fragment on it is dropped.
    pub fn new(state: Arc<AppState>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let base_url = match base_url.split_once('#') {
            Some((base, _)) => base.to_string(),
            None => base_url,
        };
        Self { state, base_url }
    }

    /// Builds a link carrying the session and every loaded document.
    pub fn share_url(&self, session_id: &str) -> Result<String> {
        let session = self
            .state
            .find_session(session_id)
            .ok_or_else(|| PersonaError::not_found("Session", session_id))?;
        let token = share::encode(&self.state.documents(), &session)?;
        let url = format!("{}#{}", self.base_url, Route::Share { token });

        if url.len() > MAX_PRACTICAL_URL_LEN {
            tracing::warn!(
                session_id,
                length = url.len(),
                "Share link is very long and may not survive copy and paste"
            );
        }
        Ok(url)
    }

    /// Decodes a token and merges it into the local collections.
    ///
    /// Returns the imported session's id. Nothing is written when the token
    /// does not decode.
    pub fn import(&self, token: &str) -> Result<String> {
        let payload = share::decode(token)?;
        let incoming_documents = payload.files;
        let incoming_session = payload.session;
        let session_id = incoming_session.id.clone();

        self.state
            .documents
            .update(|documents| merge_documents(documents, &incoming_documents));
        self.state
            .sessions
            .update(|sessions| merge_session(sessions, &incoming_session));

        tracing::info!(
            session_id = %session_id,
            documents = incoming_documents.len(),
            "Imported shared session"
        );
        Ok(session_id)
    }

    /// Resolves a route the way the router does on navigation.
    ///
    /// Share routes import and continue to the chat; a bad token lands on
    /// the admin view with a notice. Unknown paths go to the admin view.
    pub fn open(&self, input: &str) -> Navigation {
        match Route::parse(input) {
            Some(Route::Share { token }) => match self.import(&token) {
                Ok(session_id) => Navigation::to(Route::Chat { session_id }),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load shared chat");
                    Navigation::with_notice(Route::Admin, INVALID_LINK_NOTICE)
                }
            },
            Some(route) => Navigation::to(route),
            None => Navigation::to(Route::Admin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persona_core::document::Document;
    use persona_core::id::SequentialIdGenerator;
    use persona_core::session::Session;
    use persona_infrastructure::MemoryStorageArea;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::open_with_ids(
            Arc::new(MemoryStorageArea::new()),
            Arc::new(SequentialIdGenerator::new()),
        ))
    }

    fn seeded() -> (Arc<AppState>, Session) {
        let state = state();
        let documents = vec![Document::new("faq.md-1", "faq.md", "Shipping takes 3 days.")];
        let session = Session::create("Shipping", &documents, state.ids.as_ref(), 0);
        state.documents.set(documents);
        state.sessions.set(vec![session.clone()]);
        (state, session)
    }

    #[test]
    fn test_share_url_drops_base_fragment() {
        let (state, session) = seeded();
        let service = ShareService::new(state, "https://chat.example.com/app/#/admin");
        let url = service.share_url(&session.id).unwrap();
        assert!(url.starts_with("https://chat.example.com/app/#/share/"));
    }

    #[test]
    fn test_share_unknown_session() {
        let service = ShareService::new(state(), "http://localhost/");
        assert!(service.share_url("chat-nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_open_imports_into_another_store() {
        let (sender, session) = seeded();
        let url = ShareService::new(sender, "http://localhost:5173/")
            .share_url(&session.id)
            .unwrap();

        let receiver = state();
        let navigation = ShareService::new(receiver.clone(), "http://localhost:5173/").open(&url);

        assert_eq!(
            navigation,
            Navigation::to(Route::Chat {
                session_id: session.id.clone()
            })
        );
        assert_eq!(receiver.sessions(), vec![session]);
        assert_eq!(receiver.documents()[0].name, "faq.md");
    }

    #[test]
    fn test_bad_token_redirects_with_notice_and_writes_nothing() {
        let receiver = state();
        let service = ShareService::new(receiver.clone(), "http://localhost/");

        let navigation = service.open("#/share/not-a-real-token");

        assert_eq!(
            navigation,
            Navigation::with_notice(Route::Admin, INVALID_LINK_NOTICE)
        );
        assert!(receiver.sessions().is_empty());
        assert!(receiver.documents().is_empty());
    }

    #[test]
    fn test_open_plain_routes() {
        let service = ShareService::new(state(), "http://localhost/");
        assert_eq!(service.open("/").route, Route::Admin);
        assert_eq!(service.open("/nowhere").route, Route::Admin);
        assert_eq!(
            service.open("/chat/chat-3").route,
            Route::Chat {
                session_id: "chat-3".to_string()
            }
        );
    }
}
