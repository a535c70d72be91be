//! mailsift - bulk structured-data extraction from email text
//!
//! Extracts structured JSON from batches of email-derived text documents
//! using the Gemini API, driven by a user-supplied extraction prompt or an
//! informal goal. The heart of the crate is a resilient generation client:
//! rate-limited attempts rotate to the next API key on the same model after
//! a short delay, any other upstream failure falls back to the next
//! candidate model, and total work is bounded at `models x keys` attempts
//! per call.
//!
//! Credentials are bring-your-own-key: every extraction job builds its own
//! [`JobConfig`] and [`ResilientClient`], so concurrent jobs never share
//! keys, model lists, or rotation state.
//!
//! # Example
//!
//! ```no_run
//! use mailsift::{Document, GeminiBackend, JobConfig, OutputMode, Pipeline, ResilientClient};
//! use std::path::Path;
//!
//! # async fn example() -> mailsift::Result<()> {
//! let config = JobConfig::from_csv(
//!     "key-a,key-b",
//!     "gemini-2.5-flash-lite,gemini-2.0-flash",
//! )?;
//! let client = ResilientClient::new(GeminiBackend::new()?, config)?;
//!
//! let pipeline = Pipeline::new(
//!     client,
//!     "Extract every grocery item with name, quantity and price.".to_string(),
//!     OutputMode::OnePerRelevantFile,
//! );
//!
//! let documents = vec![Document {
//!     name: "receipt.eml".to_string(),
//!     text: "2x milk @ 1.20 ...".to_string(),
//! }];
//! let summary = pipeline.run(&documents, Path::new("out")).await?;
//! println!("{} of {} documents had data", summary.documents_with_data, summary.total_documents);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod router;

pub use client::{
    Attempt, ExhaustionReport, GeminiBackend, GenerationBackend, GenerationOutcome,
    ResilientClient,
};
pub use config::{JobConfig, RetryPolicy};
pub use error::{ErrorKind, Result, SiftError, UpstreamError};
pub use pipeline::{
    compose_prompt, derive_extraction_prompt, BatchSummary, Document, OutputMode, Pipeline,
};
pub use router::KeyPool;
