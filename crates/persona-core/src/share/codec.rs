//! Share token codec.
//!
//! `encode` serializes `{ files, session }` to compact JSON, deflates it with
//! zlib and writes the bytes as unpadded URL-safe base64, so a token only
//! contains `[A-Za-z0-9_-]` and can sit in a URL path segment unescaped.

use crate::document::Document;
use crate::session::Session;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

/// URL-safe base64 that never emits padding but tolerates it on input.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The content of a share token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub files: Vec<Document>,
    pub session: Session,
}

#[derive(Serialize)]
struct SharePayloadRef<'a> {
    files: &'a [Document],
    session: &'a Session,
}

/// Why a token could not be decoded. Decoding never applies partially.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The token is not base64url, or the bytes do not inflate to UTF-8 text.
    #[error("malformed token: {0}")]
    Malformed(String),
    /// The inflated text is not the expected JSON structure.
    #[error("invalid payload: {0}")]
    InvalidData(String),
    /// The payload lacks the documents sequence or the session object.
    #[error("payload is missing files or session")]
    Incomplete,
}

/// Why a payload could not be packed into a token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("failed to serialize share payload: {0}")]
    Serialize(String),
    #[error("failed to compress share payload: {0}")]
    Compress(String),
}

/// Packs documents and one session into a share token.
pub fn encode(documents: &[Document], session: &Session) -> Result<String, EncodeError> {
    let json = serde_json::to_vec(&SharePayloadRef {
        files: documents,
        session,
    })
    .map_err(|e| EncodeError::Serialize(e.to_string()))?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&json)
        .map_err(|e| EncodeError::Compress(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| EncodeError::Compress(e.to_string()))?;

    tracing::debug!(
        json_bytes = json.len(),
        compressed_bytes = compressed.len(),
        "Encoded share payload"
    );
    Ok(TOKEN_ENGINE.encode(compressed))
}

/// Unpacks a share token produced by [`encode`].
pub fn decode(token: &str) -> Result<SharePayload, DecodeError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(DecodeError::Malformed("token is empty".to_string()));
    }

    let compressed = TOKEN_ENGINE
        .decode(token)
        .map_err(|e| DecodeError::Malformed(format!("not base64url: {e}")))?;

    let mut text = String::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_string(&mut text)
        .map_err(|e| DecodeError::Malformed(format!("cannot decompress: {e}")))?;

    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| DecodeError::InvalidData(e.to_string()))?;

    let present = |field: &str| value.get(field).is_some_and(|v| !v.is_null());
    if !present("files") || !present("session") {
        return Err(DecodeError::Incomplete);
    }

    serde_json::from_value(value).map_err(|e| DecodeError::InvalidData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIdGenerator;
    use crate::session::Message;

    fn deflate_to_token(text: &str) -> String {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        TOKEN_ENGINE.encode(encoder.finish().unwrap())
    }

    fn sample() -> (Vec<Document>, Session) {
        let ids = SequentialIdGenerator::new();
        let documents = vec![
            Document::new("notes.txt-1", "notes.txt", "Paris is the capital of France."),
            Document::new("faq.md-2", "faq.md", "# FAQ\n\nUnicode: café, 東京, 🚀"),
        ];
        let mut session = Session::create("Geography", &documents, &ids, 1_700_000_000_000);
        session.delay_seconds = 3;
        session
            .messages
            .push(Message::user("msg-u", "What is the capital of France?", 1_700_000_000_500));
        session
            .messages
            .push(Message::bot("msg-b", "Paris.", 1_700_000_001_000));
        (documents, session)
    }

    #[test]
    fn test_round_trip() {
        let (documents, session) = sample();
        let token = encode(&documents, &session).unwrap();
        let payload = decode(&token).unwrap();
        assert_eq!(payload.files, documents);
        assert_eq!(payload.session, session);
    }

    #[test]
    fn test_round_trip_with_no_documents_and_pending_message() {
        let (_, mut session) = sample();
        session.messages.push(Message::pending_bot("msg-p", 9));
        let token = encode(&[], &session).unwrap();
        let payload = decode(&token).unwrap();
        assert!(payload.files.is_empty());
        assert_eq!(payload.session, session);
    }

    #[test]
    fn test_token_is_url_safe() {
        let (documents, session) = sample();
        let token = encode(&documents, &session).unwrap();
        assert!(!token.is_empty());
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_repetitive_content_compresses() {
        let ids = SequentialIdGenerator::new();
        let content = "The quick brown fox jumps over the lazy dog. ".repeat(500);
        let documents = vec![Document::new("big-1", "big.txt", content.clone())];
        let session = Session::create("t", &documents, &ids, 0);
        let token = encode(&documents, &session).unwrap();
        assert!(token.len() < content.len() / 4);
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(matches!(decode(""), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("not a token!"), Err(DecodeError::Malformed(_))));
        // Valid base64url, but not a zlib stream
        assert!(matches!(decode("aGVsbG8"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_truncated_token_is_rejected() {
        let (documents, session) = sample();
        let token = encode(&documents, &session).unwrap();
        let truncated = &token[..token.len() / 2];
        assert!(decode(truncated).is_err());
    }

    #[test]
    fn test_non_json_payload() {
        let token = deflate_to_token("definitely not json");
        assert!(matches!(decode(&token), Err(DecodeError::InvalidData(_))));
    }

    #[test]
    fn test_missing_fields_are_incomplete() {
        let token = deflate_to_token(r#"{"files":[]}"#);
        assert_eq!(decode(&token), Err(DecodeError::Incomplete));

        let token = deflate_to_token(r#"{"files":null,"session":{}}"#);
        assert_eq!(decode(&token), Err(DecodeError::Incomplete));
    }

    #[test]
    fn test_wrong_shape_is_invalid() {
        let token = deflate_to_token(r#"{"files":[],"session":{"id":"chat-1"}}"#);
        assert!(matches!(decode(&token), Err(DecodeError::InvalidData(_))));
    }
}
