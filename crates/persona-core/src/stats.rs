//! Aggregate numbers shown on the admin dashboard.

use crate::document::Document;
use crate::session::Session;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdminStats {
    pub document_count: usize,
    pub session_count: usize,
    pub total_messages: usize,
    /// Mean message count per session; 0 when there are no sessions.
    pub average_messages: f64,
}

impl AdminStats {
    pub fn compute(documents: &[Document], sessions: &[Session]) -> Self {
        let total_messages: usize = sessions.iter().map(|s| s.messages.len()).sum();
        let average_messages = if sessions.is_empty() {
            0.0
        } else {
            total_messages as f64 / sessions.len() as f64
        };
        Self {
            document_count: documents.len(),
            session_count: sessions.len(),
            total_messages,
            average_messages,
        }
    }
}

impl fmt::Display for AdminStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Documents: {}\nSessions: {}\nAvg. messages per session: {:.1}",
            self.document_count, self.session_count, self.average_messages
        )
    }
}
