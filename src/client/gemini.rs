//! Gemini Backend
//!
//! HTTP implementation of [`GenerationBackend`] against the Gemini
//! generateContent endpoint, with failure classification at the boundary.

use crate::api::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};
use crate::client::GenerationBackend;
use crate::error::{ErrorKind, Result, SiftError, UpstreamError};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Public Gemini API base URL
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP backend for the Gemini generateContent API
pub struct GeminiBackend {
    /// Inner reqwest client
    client: Client,

    /// Base URL, overridable for tests
    base_url: String,
}

impl GeminiBackend {
    /// Create a backend against the public Gemini endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(GEMINI_API_BASE_URL)
    }

    /// Create a backend against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // 5 minute timeout for long completions
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| SiftError::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

impl GenerationBackend for GeminiBackend {
    async fn generate(
        &self,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> std::result::Result<String, UpstreamError> {
        let url = self.model_url(model);
        let body = GenerateContentRequest::from_prompt(prompt);

        let api_key_value = HeaderValue::from_str(api_key).map_err(|e| {
            UpstreamError::new(ErrorKind::Fatal, format!("invalid API key format: {}", e))
        })?;

        debug!(%url, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(API_KEY_HEADER, api_key_value)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            UpstreamError::new(
                ErrorKind::Unknown,
                format!(
                    "failed to parse response: {}. Body: {}",
                    e,
                    &body[..body.len().min(500)]
                ),
            )
        })?;

        parsed.text().ok_or_else(|| {
            UpstreamError::new(ErrorKind::Unknown, "response contained no candidate text")
        })
    }
}

/// Classify a non-2xx response into an [`ErrorKind`].
///
/// Rate limiting is recognized only as HTTP 429 paired with the
/// RESOURCE_EXHAUSTED reason code; that combination is the one signal the
/// client answers with key rotation instead of model fallback.
fn classify_failure(status: StatusCode, body: &str) -> UpstreamError {
    let reason = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.status)
        .unwrap_or_default();

    let resource_exhausted =
        reason == "RESOURCE_EXHAUSTED" || body.contains("RESOURCE_EXHAUSTED");

    let kind = if status == StatusCode::TOO_MANY_REQUESTS && resource_exhausted {
        ErrorKind::RateLimited
    } else if status.is_server_error() {
        ErrorKind::Transient
    } else if status.is_client_error() {
        ErrorKind::Fatal
    } else {
        ErrorKind::Unknown
    };

    UpstreamError::new(
        kind,
        format!(
            "status {}: {}",
            status.as_u16(),
            &body[..body.len().min(500)]
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    fn error_body(code: u16, status: &str, message: &str) -> String {
        serde_json::json!({
            "error": {"code": code, "message": message, "status": status}
        })
        .to_string()
    }

    #[tokio::test]
    async fn successful_response_yields_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_header(API_KEY_HEADER, "test-key")
            .with_status(200)
            .with_body(success_body(r#"{"items": []}"#))
            .create_async()
            .await;

        let backend = GeminiBackend::with_base_url(server.url()).unwrap();
        let text = backend
            .generate("gemini-2.0-flash", "test-key", "extract")
            .await
            .unwrap();

        assert_eq!(text, r#"{"items": []}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn quota_exhaustion_classifies_as_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .with_status(429)
            .with_body(error_body(429, "RESOURCE_EXHAUSTED", "Quota exceeded"))
            .create_async()
            .await;

        let backend = GeminiBackend::with_base_url(server.url()).unwrap();
        let err = backend
            .generate("gemini-2.0-flash", "k", "p")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn bare_429_without_reason_code_is_not_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let backend = GeminiBackend::with_base_url(server.url()).unwrap();
        let err = backend
            .generate("gemini-2.0-flash", "k", "p")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Fatal);
    }

    #[tokio::test]
    async fn bad_request_classifies_as_fatal() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/nope:generateContent")
            .with_status(400)
            .with_body(error_body(400, "INVALID_ARGUMENT", "unknown model"))
            .create_async()
            .await;

        let backend = GeminiBackend::with_base_url(server.url()).unwrap();
        let err = backend.generate("nope", "k", "p").await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Fatal);
    }

    #[tokio::test]
    async fn server_error_classifies_as_transient() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .with_status(503)
            .with_body(error_body(503, "UNAVAILABLE", "overloaded"))
            .create_async()
            .await;

        let backend = GeminiBackend::with_base_url(server.url()).unwrap();
        let err = backend
            .generate("gemini-2.0-flash", "k", "p")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Transient);
    }

    #[tokio::test]
    async fn unparseable_success_body_classifies_as_unknown() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let backend = GeminiBackend::with_base_url(server.url()).unwrap();
        let err = backend
            .generate("gemini-2.0-flash", "k", "p")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Unknown);
    }
}
