//! Hosted model clients for PersonaChat RAG.
//!
//! Currently a single backend: [`GeminiAnswerClient`], which implements the
//! `AnswerGenerator` contract from `persona-core` over the Gemini REST API.

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiAnswerClient, GenerationError};
