//! GeminiAnswerClient - Direct REST API implementation for Gemini.
//!
//! Sends one grounded question per call. Every failure is turned into answer
//! text, so callers always get something to show.

use crate::prompt::{SYSTEM_INSTRUCTION, render_prompt};
use async_trait::async_trait;
use persona_core::answer::AnswerGenerator;
use persona_core::config::GeminiSettings;
use persona_infrastructure::SecretServiceImpl;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Answer returned when no API key is available.
pub const NOT_CONFIGURED_ANSWER: &str =
    "API Key is not configured. Please contact the administrator.";

/// Why a generation request produced no answer.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Prompt(String),

    #[error("Gemini API request failed: {0}")]
    Request(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse Gemini response: {0}")]
    Parse(String),

    #[error("Gemini API returned no text in the response candidates")]
    EmptyResponse,
}

impl GenerationError {
    /// Text shown in place of an answer.
    pub fn to_answer(&self) -> String {
        format!("An error occurred while communicating with the AI: {self}")
    }
}

/// Answer generator that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiAnswerClient {
    client: Client,
    api_key: Option<String>,
    settings: GeminiSettings,
    base_url: String,
}

impl GeminiAnswerClient {
    /// Creates a client. `None` or a blank key makes every answer the
    /// "not configured" notice.
    pub fn new(api_key: Option<String>, settings: GeminiSettings) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("Gemini API key not found; answers will report missing configuration");
        }
        Self {
            client: Client::new(),
            api_key,
            settings,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Builds a client from the resolved secrets and generation settings.
    ///
    /// A model name in `secret.json` overrides the configured one.
    pub fn from_secrets(secrets: &SecretServiceImpl, mut settings: GeminiSettings) -> Self {
        if let Some(model) = secrets.model_name() {
            settings.model = model;
        }
        Self::new(secrets.api_key(), settings)
    }

    /// Points the client at another endpoint root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.settings.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, question: &str, context: &str) -> Result<GenerateContentRequest, GenerationError> {
        let prompt =
            render_prompt(question, context).map_err(|e| GenerationError::Prompt(e.to_string()))?;
        Ok(GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                top_k: self.settings.top_k,
            },
        })
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/{model}:generateContent",
            self.base_url,
            model = self.settings.model
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|err| GenerationError::Request(err.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::Parse(err.without_url().to_string()))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl AnswerGenerator for GeminiAnswerClient {
    async fn answer(&self, question: &str, context: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return NOT_CONFIGURED_ANSWER.to_string();
        };

        let result = match self.build_request(question, context) {
            Ok(request) => self.send_request(api_key, &request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(text) => {
                tracing::debug!(model = %self.settings.model, chars = text.len(), "Gemini answered");
                text
            }
            Err(e) => {
                tracing::error!(model = %self.settings.model, error = %e, "Error generating content from Gemini");
                e.to_answer()
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Joins the text parts of the first candidate that has any.
fn extract_text_response(response: GenerateContentResponse) -> Result<String, GenerationError> {
    response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .find(|text| !text.is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), body.trim()));

    GenerationError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_answers_with_notice() {
        let client = GeminiAnswerClient::new(None, GeminiSettings::default());
        assert!(!client.is_configured());
        assert_eq!(client.answer("q", "c").await, NOT_CONFIGURED_ANSWER);

        let blank = GeminiAnswerClient::new(Some("   ".to_string()), GeminiSettings::default());
        assert_eq!(blank.answer("q", "c").await, NOT_CONFIGURED_ANSWER);
    }

    #[test]
    fn test_request_body_shape() {
        let client = GeminiAnswerClient::new(Some("k".to_string()), GeminiSettings::default());
        let request = client.build_request("Why?", "Because.").unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "CONTEXT:\n---\nBecause.\n---\n\nQUESTION:\nWhy?"
        );
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
        assert_eq!(json["generationConfig"]["topK"], 10);
    }

    #[test]
    fn test_extracts_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Paris"},{"text":" it is."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "Paris it is.");
    }

    #[test]
    fn test_empty_candidates_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert!(matches!(
            extract_text_response(response),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn test_http_error_uses_api_message() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
        );
        assert_eq!(
            err.to_answer(),
            "An error occurred while communicating with the AI: INVALID_ARGUMENT: API key not valid."
        );

        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "HTTP 502: upstream down");
    }
}
