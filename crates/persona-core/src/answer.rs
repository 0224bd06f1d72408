//! Contract for the hosted model that turns a question plus context into a reply.

use async_trait::async_trait;

/// Generates the bot's reply for a question, grounded in `context`.
///
/// Implementations never fail: missing configuration, transport errors and
/// provider errors are all turned into human-readable text that becomes the
/// bot message. There is no retry and no cancellation.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn answer(&self, question: &str, context: &str) -> String;
}
