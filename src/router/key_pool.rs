//! API Key Pool
//!
//! Round-robin rotation over the credentials supplied with a job.
//!
//! The pool is deliberately dumb: it never skips a key, never shrinks, and
//! keeps no per-key health state. Which key to try next after a failure is
//! the [`ResilientClient`](crate::client::ResilientClient)'s decision; the
//! pool only guarantees that `len()` consecutive draws visit every key
//! exactly once, in list order, before wrapping.

use crate::error::{Result, SiftError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Pool of API keys with round-robin rotation
#[derive(Debug)]
pub struct KeyPool {
    /// Credentials in the order the caller supplied them
    keys: Vec<String>,

    /// Cursor into `keys`, wrapping modulo the pool size
    cursor: AtomicUsize,
}

impl KeyPool {
    /// Create a pool from an ordered, non-empty credential list.
    ///
    /// Rotation state is private to one job; pools must not be shared
    /// across jobs.
    pub fn new(keys: Vec<String>) -> Result<Self> {
        if keys.is_empty() {
            return Err(SiftError::Config(
                "at least one API key must be supplied".to_string(),
            ));
        }

        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Get the number of keys in the pool
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// The pool is never empty after construction
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Return the key at the cursor along with its index, then advance
    /// the cursor by one position modulo the pool size.
    ///
    /// The cursor wraps after exactly `len()` calls, so within one
    /// fallback pass each key is drawn at most once per model.
    pub fn next_key(&self) -> (usize, &str) {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        (idx, &self.keys[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(keys: &[&str]) -> KeyPool {
        KeyPool::new(keys.iter().map(|k| k.to_string()).collect()).unwrap()
    }

    #[test]
    fn empty_key_list_is_a_configuration_error() {
        let err = KeyPool::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SiftError::Config(_)));
    }

    #[test]
    fn rotation_is_round_robin_in_list_order() {
        let pool = pool(&["key1", "key2", "key3"]);

        assert_eq!(pool.next_key(), (0, "key1"));
        assert_eq!(pool.next_key(), (1, "key2"));
        assert_eq!(pool.next_key(), (2, "key3"));
        // Wraps after exactly len() calls
        assert_eq!(pool.next_key(), (0, "key1"));
    }

    #[test]
    fn each_key_appears_exactly_once_per_pass() {
        let pool = pool(&["a", "b", "c", "d"]);

        let drawn: Vec<String> = (0..pool.len())
            .map(|_| pool.next_key().1.to_string())
            .collect();

        assert_eq!(drawn, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn single_key_pool_always_returns_the_same_key() {
        let pool = pool(&["only"]);

        for _ in 0..3 {
            assert_eq!(pool.next_key(), (0, "only"));
        }
    }
}
