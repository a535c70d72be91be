//! Generate Content API
//!
//! Request, response, and error-body shapes for
//! `POST /v1beta/models/{model}:generateContent`.

use serde::{Deserialize, Serialize};

/// Body of a generateContent request
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Conversation turns; a single user turn for extraction prompts
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Build a single-turn request from a fully assembled prompt
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

/// A content block: an optional role and its parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model"; responses may omit it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Ordered parts of this block
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single text part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Part text; non-text parts are not requested and not modeled
    #[serde(default)]
    pub text: String,
}

/// Body of a successful generateContent response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates, best first
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when generation was blocked
    pub content: Option<Content>,

    /// Why generation stopped ("STOP", "MAX_TOKENS", "SAFETY", ...)
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, with parts concatenated.
    ///
    /// Returns `None` when there is no candidate or the candidate carries
    /// no text, which the client treats as a failed attempt.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;

        let text: String = content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// The error payload
    pub error: ApiError,
}

/// Error payload: numeric code, message, and canonical reason code
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// HTTP status duplicated in the body
    #[serde(default)]
    pub code: u16,

    /// Human-readable message
    #[serde(default)]
    pub message: String,

    /// Canonical status, e.g. "RESOURCE_EXHAUSTED" or "INVALID_ARGUMENT"
    #[serde(default)]
    pub status: String,
}
