//! Output Records
//!
//! Persisted record shapes and the writer for the three output modes.

use crate::error::{Result, SiftError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Name of the consolidated output file in `single_file` mode
pub const CONSOLIDATED_FILE_NAME: &str = "consolidated_results.json";

/// How results are materialized on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// A JSON file for every input document, placeholder when empty
    OnePerFile,

    /// A JSON file only for documents that yielded data
    OnePerRelevantFile,

    /// One consolidated JSON file for the whole batch
    SingleFile,
}

impl FromStr for OutputMode {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "one_per_file" => Ok(OutputMode::OnePerFile),
            "one_per_relevant_file" => Ok(OutputMode::OnePerRelevantFile),
            "single_file" => Ok(OutputMode::SingleFile),
            other => Err(SiftError::Config(format!(
                "unknown output method '{}' (expected one_per_file, one_per_relevant_file, or single_file)",
                other
            ))),
        }
    }
}

/// Metadata attached to every per-document record
#[derive(Debug, Clone, Serialize)]
pub struct RecordMetadata {
    /// When the extraction ran
    pub extraction_timestamp_utc: DateTime<Utc>,

    /// Name of the input file the data came from
    pub source_file: String,
}

/// Per-document output record
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRecord {
    /// Record metadata
    pub metadata: RecordMetadata,

    /// Extracted payload; `null` when nothing was found
    pub extracted_data: Option<Value>,
}

/// Metadata for the consolidated record
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidatedMetadata {
    /// When the extraction ran
    pub extraction_timestamp_utc: DateTime<Utc>,

    /// Total documents handed to the pipeline
    pub total_files_processed: usize,

    /// Documents that yielded data
    pub files_with_data: usize,
}

/// One entry in the consolidated record
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidatedEntry {
    /// Name of the input file the data came from
    pub source_file: String,

    /// The extracted payload
    pub data: Value,
}

/// Consolidated output record for `single_file` mode
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidatedRecord {
    /// Record metadata
    pub metadata: ConsolidatedMetadata,

    /// One entry per document with data
    pub extracted_data: Vec<ConsolidatedEntry>,
}

/// Writes pretty-printed records under the job's output directory
pub(crate) struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub(crate) fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Write a per-document record; `None` produces the placeholder with
    /// `extracted_data: null`
    pub(crate) fn write_record(&self, source_file: &str, data: Option<Value>) -> Result<()> {
        let record = ExtractionRecord {
            metadata: RecordMetadata {
                extraction_timestamp_utc: Utc::now(),
                source_file: source_file.to_string(),
            },
            extracted_data: data,
        };

        let path = self.output_dir.join(output_file_name(source_file));
        self.write_json(&path, &record)
    }

    /// Write the consolidated record for the whole batch
    pub(crate) fn write_consolidated(
        &self,
        total_files_processed: usize,
        entries: Vec<ConsolidatedEntry>,
    ) -> Result<()> {
        let record = ConsolidatedRecord {
            metadata: ConsolidatedMetadata {
                extraction_timestamp_utc: Utc::now(),
                total_files_processed,
                files_with_data: entries.len(),
            },
            extracted_data: entries,
        };

        let path = self.output_dir.join(CONSOLIDATED_FILE_NAME);
        self.write_json(&path, &record)
    }

    fn write_json<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::write(path, serde_json::to_string_pretty(record)?)?;
        info!(path = %path.display(), "saved extracted data");
        Ok(())
    }
}

/// Map an input file name to its JSON output name, e.g. `a.eml` -> `a.json`
fn output_file_name(source_file: &str) -> String {
    let stem = Path::new(source_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_file.to_string());
    format!("{}.json", stem)
}
