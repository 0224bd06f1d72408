//! Deciding what to ask the answer generator for a turn.

use super::machine::TurnTicket;
use crate::document::Document;

/// Separator placed between document contents in the context blob.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Context sent on a session's first user turn when no documents exist.
pub const NO_CONTEXT_MARKER: &str = "No documents have been uploaded, so there is no context available.";

/// Answer used instead of calling the generator once a session is past its
/// first turn and there is still nothing to ground answers in.
pub const NO_DOCUMENTS_REPLY: &str = "I can't answer any questions because no documents have been uploaded. An administrator needs to upload files first.";

/// What the caller should do to produce the bot's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerPlan {
    /// Call the answer generator with this question and context.
    Ask { question: String, context: String },
    /// Use this text as the reply without calling the generator.
    Fallback(String),
}

/// Concatenates every document's content in collection order.
pub fn build_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Chooses between calling the generator and the fixed fallback reply.
///
/// With no documents, the generator is still called on the very first user
/// turn (only the welcome message preceded it) so small talk gets an opening
/// reply; every later turn gets [`NO_DOCUMENTS_REPLY`].
pub fn plan_answer(documents: &[Document], ticket: &TurnTicket) -> AnswerPlan {
    if documents.is_empty() {
        if ticket.prior_message_count > 1 {
            return AnswerPlan::Fallback(NO_DOCUMENTS_REPLY.to_string());
        }
        return AnswerPlan::Ask {
            question: ticket.question.clone(),
            context: NO_CONTEXT_MARKER.to_string(),
        };
    }

    AnswerPlan::Ask {
        question: ticket.question.clone(),
        context: build_context(documents),
    }
}
