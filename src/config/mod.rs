//! Configuration Module
//!
//! Per-job configuration: credentials, candidate models, retry policy.

pub mod job;

pub use job::{JobConfig, RetryPolicy};
