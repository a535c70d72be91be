//! Error Types
//!
//! Error taxonomy for the extraction service: fatal configuration errors,
//! classified upstream failures, and local I/O or serialization errors.

use std::fmt;
use thiserror::Error;

/// Main error type for mailsift operations
#[derive(Debug, Error)]
pub enum SiftError {
    /// Configuration errors (empty key/model list, bad inputs).
    /// Raised at construction time; no upstream call is ever made
    /// against a misconfigured client.
    #[error("configuration error: {0}")]
    Config(String),

    /// Prompt derivation failed: every model/key combination was
    /// exhausted while turning the user goal into an extraction prompt.
    /// Fatal for the job - there is no prompt to extract with.
    #[error("prompt derivation failed: {0}")]
    PromptDerivation(String),

    /// Filesystem error while reading documents or writing results
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization of an output record failed
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error (HTTP client construction and the like)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for mailsift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Classification of a failed generation attempt, produced at the
/// upstream boundary.
///
/// Only [`ErrorKind::RateLimited`] changes retry behavior (the key is
/// rotated and the same model retried after a delay); every other kind
/// triggers fallback to the next model. The distinction between the
/// remaining kinds exists for the exhaustion report and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Quota exhausted for the key in use (HTTP 429 + RESOURCE_EXHAUSTED)
    RateLimited,

    /// Likely-temporary fault: 5xx, connection failure, timeout
    Transient,

    /// Not fixable by retrying: bad request, auth failure, unknown model
    Fatal,

    /// Could not be classified (unrecognized body, malformed payload)
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::RateLimited => "rate-limited",
            ErrorKind::Transient => "transient",
            ErrorKind::Fatal => "fatal",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A single failed generation attempt as seen at the upstream boundary
#[derive(Debug, Clone, Error)]
#[error("{kind} upstream error: {message}")]
pub struct UpstreamError {
    /// Classification of the failure
    pub kind: ErrorKind,

    /// Human-readable detail, kept for the exhaustion report
    pub message: String,
}

impl UpstreamError {
    /// Create a new upstream error
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True if this attempt failed on the key's quota rather than the
    /// request or the model
    pub fn is_rate_limited(&self) -> bool {
        self.kind == ErrorKind::RateLimited
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::new(ErrorKind::Transient, format!("request timeout: {}", err))
        } else if err.is_connect() {
            UpstreamError::new(ErrorKind::Transient, format!("connection failed: {}", err))
        } else {
            UpstreamError::new(ErrorKind::Unknown, err.to_string())
        }
    }
}
