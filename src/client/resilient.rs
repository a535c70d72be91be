//! Resilient Generation Client
//!
//! Produces a text completion for a prompt while maximizing the chance of
//! success against an unreliable upstream: rate-limit errors are absorbed
//! by rotating to the next key on the same (preferred) model after a short
//! delay, and any other failure downgrades to the next model instead of
//! burning through the remaining keys. Total work is bounded at
//! `models x keys` attempts.

use crate::client::GenerationBackend;
use crate::config::{JobConfig, RetryPolicy};
use crate::error::{ErrorKind, Result, SiftError};
use crate::router::KeyPool;
use backoff::backoff::Backoff;
use std::fmt;
use tracing::{debug, info, warn};

/// Result of one `generate()` call.
///
/// Upstream failures are never surfaced as errors; the terminal case is a
/// report of everything that was tried. Callers treat `Exhausted` as "skip
/// this unit of work", not as a process-fatal condition.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// A model produced a response
    Text(String),

    /// Every model/key combination failed
    Exhausted(ExhaustionReport),
}

impl GenerationOutcome {
    /// The response text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationOutcome::Text(t) => Some(t),
            GenerationOutcome::Exhausted(_) => None,
        }
    }

    /// Consume the outcome, yielding the response text if any
    pub fn into_text(self) -> Option<String> {
        match self {
            GenerationOutcome::Text(t) => Some(t),
            GenerationOutcome::Exhausted(_) => None,
        }
    }
}

/// Everything that was tried before giving up
#[derive(Debug, Default)]
pub struct ExhaustionReport {
    /// Failed attempts in the order they were made
    pub attempts: Vec<Attempt>,
}

impl fmt::Display for ExhaustionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed attempts", self.attempts.len())?;
        for attempt in &self.attempts {
            write!(
                f,
                "; {} (key #{}): {}",
                attempt.model, attempt.key_index, attempt.kind
            )?;
        }
        Ok(())
    }
}

/// One failed attempt in the model x key traversal
#[derive(Debug, Clone)]
pub struct Attempt {
    /// Model the attempt was made against
    pub model: String,

    /// Index of the key drawn from the pool
    pub key_index: usize,

    /// Boundary classification of the failure
    pub kind: ErrorKind,

    /// Detail from the upstream error
    pub message: String,
}

/// Resilient generation client for a single extraction job.
///
/// Construct one per job from that job's [`JobConfig`]; instances hold the
/// job's rotation cursor and must not be shared or reused across jobs.
pub struct ResilientClient<B> {
    backend: B,
    keys: KeyPool,
    models: Vec<String>,
    retry: RetryPolicy,
}

impl<B: GenerationBackend> ResilientClient<B> {
    /// Build a client, validating the configuration.
    ///
    /// Fails with a configuration error before any upstream call if the
    /// key or model list is empty.
    pub fn new(backend: B, config: JobConfig) -> Result<Self> {
        let JobConfig {
            api_keys,
            models,
            retry,
        } = config;

        let keys = KeyPool::new(api_keys)?;
        if models.is_empty() {
            return Err(SiftError::Config(
                "at least one model identifier must be supplied".to_string(),
            ));
        }

        info!(
            keys = keys.len(),
            models = models.len(),
            "generation client initialized"
        );

        Ok(Self {
            backend,
            keys,
            models,
            retry,
        })
    }

    /// The candidate models in priority order
    pub fn models(&self) -> &[String] {
        &self.models
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate a completion for a fully assembled prompt.
    ///
    /// Models are tried in priority order. For each model every key is
    /// tried at most once: a rate-limited attempt sleeps the policy delay
    /// and continues with the next key on the same model, while any other
    /// failure abandons the remaining keys and falls back to the next
    /// model. The first success short-circuits everything.
    pub async fn generate(&self, prompt: &str) -> GenerationOutcome {
        let mut attempts = Vec::new();

        for model in &self.models {
            let mut delays = self.retry.schedule();

            for _ in 0..self.keys.len() {
                let (key_index, api_key) = self.keys.next_key();
                debug!(%model, key_index, "attempting generation");

                match self.backend.generate(model, api_key, prompt).await {
                    Ok(text) => {
                        info!(%model, key_index, "received response");
                        return GenerationOutcome::Text(text);
                    }
                    Err(err) => {
                        let kind = err.kind;
                        attempts.push(Attempt {
                            model: model.clone(),
                            key_index,
                            kind,
                            message: err.message,
                        });

                        if kind == ErrorKind::RateLimited {
                            warn!(%model, key_index, "rate limit hit, rotating key");
                            if let Some(delay) = delays.next_backoff() {
                                tokio::time::sleep(delay).await;
                            }
                        } else {
                            warn!(%model, key_index, %kind, "attempt failed, falling back to next model");
                            break;
                        }
                    }
                }
            }
        }

        warn!(
            total_attempts = attempts.len(),
            "all models and keys exhausted without a response"
        );
        GenerationOutcome::Exhausted(ExhaustionReport { attempts })
    }
}
