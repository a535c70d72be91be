//! Job Configuration
//!
//! One [`JobConfig`] is built per extraction job and handed to the client
//! by value. There is no process-wide configuration: two concurrent jobs
//! never share credentials, model lists, or rotation state.

use crate::error::{Result, SiftError};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;

/// Environment variable holding a comma-separated list of API keys
pub const API_KEYS_ENV: &str = "GEMINI_API_KEYS";

/// Environment variable holding a comma-separated list of model identifiers
pub const MODELS_ENV: &str = "GEMINI_MODELS";

/// Configuration for a single extraction job
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Ordered credential list, rotated round-robin. Never empty.
    pub api_keys: Vec<String>,

    /// Ordered model identifiers, most preferred first. Never empty.
    pub models: Vec<String>,

    /// Delay schedule applied between rate-limited attempts
    pub retry: RetryPolicy,
}

impl JobConfig {
    /// Build a validated configuration from explicit key and model lists
    pub fn new(api_keys: Vec<String>, models: Vec<String>) -> Result<Self> {
        let config = Self {
            api_keys,
            models,
            retry: RetryPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from comma-separated key and model strings,
    /// the format accepted from users and environment variables.
    ///
    /// Entries are trimmed and blank entries dropped, so trailing commas
    /// are harmless.
    pub fn from_csv(api_keys: &str, models: &str) -> Result<Self> {
        Self::new(split_csv(api_keys), split_csv(models))
    }

    /// Load a configuration from `GEMINI_API_KEYS` and `GEMINI_MODELS`.
    ///
    /// CLI convenience only: the variables are read once and the result is
    /// an ordinary immutable value, never re-read or mutated afterwards.
    pub fn from_env() -> Result<Self> {
        let keys = std::env::var(API_KEYS_ENV).unwrap_or_default();
        let models = std::env::var(MODELS_ENV).unwrap_or_default();
        Self::from_csv(&keys, &models).map_err(|_| {
            SiftError::Config(format!(
                "{} and {} must both be set to non-empty comma-separated lists",
                API_KEYS_ENV, MODELS_ENV
            ))
        })
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.api_keys.is_empty() {
            return Err(SiftError::Config(
                "at least one API key must be supplied".to_string(),
            ));
        }
        if self.models.is_empty() {
            return Err(SiftError::Config(
                "at least one model identifier must be supplied".to_string(),
            ));
        }
        Ok(())
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Delay schedule between rate-limited attempts on the same model.
///
/// The default reproduces the fixed one-second wait the service has always
/// used. Raising `multiplier` above 1.0 turns it into a bounded exponential
/// schedule; `max_delay` caps every individual wait.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// First wait after a rate-limited attempt
    pub initial_delay: Duration,

    /// Growth factor applied to successive waits within one generate() call
    pub multiplier: f64,

    /// Upper bound on any single wait
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            multiplier: 1.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A zero-delay policy, used by tests to avoid real sleeping
    pub fn none() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            multiplier: 1.0,
            max_delay: Duration::ZERO,
        }
    }

    /// Build the stateful schedule for one generate() call.
    ///
    /// No jitter and no elapsed-time cutoff: the outer loop already bounds
    /// total attempts at models x keys.
    pub(crate) fn schedule(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_delay)
            .with_multiplier(self.multiplier)
            .with_max_interval(self.max_delay)
            .with_randomization_factor(0.0)
            .with_max_elapsed_time(None)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoff::backoff::Backoff;

    #[test]
    fn empty_keys_rejected() {
        let err = JobConfig::new(vec![], vec!["gemini-2.0-flash".into()]).unwrap_err();
        assert!(matches!(err, SiftError::Config(_)));
    }

    #[test]
    fn empty_models_rejected() {
        let err = JobConfig::new(vec!["key".into()], vec![]).unwrap_err();
        assert!(matches!(err, SiftError::Config(_)));
    }

    #[test]
    fn csv_entries_are_trimmed_and_blanks_dropped() {
        let config = JobConfig::from_csv(
            " key1, key2 ,,key3,",
            "gemini-2.5-flash-lite, gemini-2.0-flash",
        )
        .unwrap();

        assert_eq!(config.api_keys, vec!["key1", "key2", "key3"]);
        assert_eq!(
            config.models,
            vec!["gemini-2.5-flash-lite", "gemini-2.0-flash"]
        );
    }

    #[test]
    fn whitespace_only_csv_is_a_configuration_error() {
        assert!(JobConfig::from_csv("  ,  ", "model").is_err());
        assert!(JobConfig::from_csv("key", "").is_err());
    }

    #[test]
    fn default_policy_waits_a_fixed_second() {
        let mut schedule = RetryPolicy::default().schedule();

        assert_eq!(schedule.next_backoff(), Some(Duration::from_secs(1)));
        assert_eq!(schedule.next_backoff(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn raised_multiplier_grows_the_delay_up_to_the_cap() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(2),
        };
        let mut schedule = policy.schedule();

        assert_eq!(schedule.next_backoff(), Some(Duration::from_secs(1)));
        assert_eq!(schedule.next_backoff(), Some(Duration::from_secs(2)));
        // Capped at max_delay from here on
        assert_eq!(schedule.next_backoff(), Some(Duration::from_secs(2)));
    }
}
