//! Router Module
//!
//! API key pool management.

pub mod key_pool;

pub use key_pool::KeyPool;
