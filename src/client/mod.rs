//! Client Module
//!
//! The upstream backend boundary and the resilient generation client
//! built on top of it.

pub mod gemini;
pub mod resilient;

#[cfg(test)]
pub(crate) mod testing;

use crate::error::UpstreamError;
use std::future::Future;

pub use gemini::{GeminiBackend, GEMINI_API_BASE_URL};
pub use resilient::{Attempt, ExhaustionReport, GenerationOutcome, ResilientClient};

/// One generation attempt against the upstream service.
///
/// Implementations issue a single blocking call for the given model and
/// credential and classify any failure into an
/// [`ErrorKind`](crate::error::ErrorKind) at the boundary. Retry and
/// fallback decisions belong to [`ResilientClient`], never to the backend.
pub trait GenerationBackend: Send + Sync {
    /// Produce the response text for `prompt` using `model` and `api_key`
    fn generate(
        &self,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, UpstreamError>> + Send;
}
