//! Extraction Pipeline
//!
//! Drives one extraction job: for each input document, assembles the full
//! prompt, invokes the resilient client, interprets the returned text as a
//! JSON payload, and persists results according to the selected output
//! mode. A document that fails (no upstream response, unparseable output)
//! is skipped; the batch always continues.

pub mod output;
pub mod parser;
pub mod prompt;

pub use output::{
    ConsolidatedEntry, ConsolidatedMetadata, ConsolidatedRecord, ExtractionRecord, OutputMode,
    RecordMetadata,
};
pub use parser::{parse_extraction, strip_code_fences, ParsedPayload};
pub use prompt::{compose_prompt, derive_extraction_prompt};

use crate::client::{GenerationBackend, GenerationOutcome, ResilientClient};
use crate::error::Result;
use output::OutputWriter;
use std::path::Path;
use tracing::{info, warn};

/// An input document whose plain text has already been extracted
#[derive(Debug, Clone)]
pub struct Document {
    /// Source file name, carried into the output metadata
    pub name: String,

    /// Plain text content
    pub text: String,
}

/// Counters for one completed batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents handed to the pipeline
    pub total_documents: usize,

    /// Documents that yielded a non-empty payload
    pub documents_with_data: usize,

    /// Skipped: every model/key combination failed
    pub skipped_no_response: usize,

    /// Skipped: the model's output was not valid JSON
    pub skipped_unparseable: usize,

    /// Skipped: the model confirmed there was nothing to extract
    pub skipped_empty: usize,
}

/// One extraction job over a batch of documents
pub struct Pipeline<B> {
    client: ResilientClient<B>,
    base_prompt: String,
    mode: OutputMode,
}

impl<B: GenerationBackend> Pipeline<B> {
    /// Create a pipeline around a job-scoped client and a base prompt
    pub fn new(client: ResilientClient<B>, base_prompt: String, mode: OutputMode) -> Self {
        Self {
            client,
            base_prompt,
            mode,
        }
    }

    /// The job's client, e.g. for prompt derivation before the run
    pub fn client(&self) -> &ResilientClient<B> {
        &self.client
    }

    /// Process every document, writing results under `output_dir`.
    ///
    /// Unparseable and confirmed-empty payloads produce identical file
    /// output (none, or the placeholder in `one_per_file` mode) but are
    /// counted separately in the summary.
    pub async fn run(&self, documents: &[Document], output_dir: &Path) -> Result<BatchSummary> {
        let writer = OutputWriter::new(output_dir);
        let mut summary = BatchSummary {
            total_documents: documents.len(),
            ..BatchSummary::default()
        };
        let mut consolidated: Vec<ConsolidatedEntry> = Vec::new();

        for document in documents {
            info!(source = %document.name, "processing document");
            let full_prompt = compose_prompt(&self.base_prompt, &document.text);

            let raw = match self.client.generate(&full_prompt).await {
                GenerationOutcome::Text(text) => text,
                GenerationOutcome::Exhausted(report) => {
                    warn!(source = %document.name, %report, "no response from API, skipping");
                    summary.skipped_no_response += 1;
                    continue;
                }
            };

            let payload = parse_extraction(&raw);
            match &payload {
                ParsedPayload::Data(data) => {
                    summary.documents_with_data += 1;
                    match self.mode {
                        OutputMode::SingleFile => consolidated.push(ConsolidatedEntry {
                            source_file: document.name.clone(),
                            data: data.clone(),
                        }),
                        OutputMode::OnePerFile | OutputMode::OnePerRelevantFile => {
                            writer.write_record(&document.name, Some(data.clone()))?;
                        }
                    }
                }
                ParsedPayload::Empty => {
                    info!(source = %document.name, "no relevant data found");
                    summary.skipped_empty += 1;
                    if self.mode == OutputMode::OnePerFile {
                        writer.write_record(&document.name, None)?;
                    }
                }
                ParsedPayload::Unparseable(detail) => {
                    warn!(source = %document.name, %detail, "failed to decode JSON from model output");
                    summary.skipped_unparseable += 1;
                    if self.mode == OutputMode::OnePerFile {
                        writer.write_record(&document.name, None)?;
                    }
                }
            }
        }

        // The consolidated file is only written when something was found
        if self.mode == OutputMode::SingleFile && !consolidated.is_empty() {
            writer.write_consolidated(summary.total_documents, consolidated)?;
        }

        info!(
            total = summary.total_documents,
            with_data = summary.documents_with_data,
            no_response = summary.skipped_no_response,
            unparseable = summary.skipped_unparseable,
            empty = summary.skipped_empty,
            "batch finished"
        );
        Ok(summary)
    }
}
