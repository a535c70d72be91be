//! mailsift CLI - batch extraction over a folder of text documents.
//!
//! Reads every `.txt` file in the input folder (email bodies whose plain
//! text has already been extracted), runs the extraction pipeline against
//! the Gemini API, and writes JSON results to the output folder. Keys and
//! models come from `GEMINI_API_KEYS` / `GEMINI_MODELS` (a `.env` file is
//! honored).

use clap::Parser;
use mailsift::{
    derive_extraction_prompt, Document, GeminiBackend, JobConfig, OutputMode, Pipeline,
    ResilientClient, Result, SiftError,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Extract structured data from a folder of email text files
#[derive(Debug, Parser)]
#[command(name = "mailsift", version, about)]
struct Cli {
    /// Folder containing the input .txt documents
    #[arg(long)]
    input_folder: PathBuf,

    /// Folder where output .json files are written
    #[arg(long)]
    output_folder: PathBuf,

    /// File containing a ready extraction prompt
    #[arg(long, conflicts_with = "goal")]
    prompt_file: Option<PathBuf>,

    /// Informal extraction goal; a detailed prompt is derived from it
    #[arg(long)]
    goal: Option<String>,

    /// one_per_file, one_per_relevant_file, or single_file
    #[arg(long, default_value = "one_per_file")]
    output_method: String,
}

#[tokio::main]
async fn main() {
    // Load .env before reading configuration from the environment
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mode: OutputMode = cli.output_method.parse()?;

    // One client per job: the key pool and rotation cursor live and die
    // with this invocation.
    let config = JobConfig::from_env()?;
    let client = ResilientClient::new(GeminiBackend::new()?, config)?;

    let base_prompt = match (&cli.prompt_file, &cli.goal) {
        (Some(path), _) => std::fs::read_to_string(path)?,
        (None, Some(goal)) => derive_extraction_prompt(&client, goal).await?,
        (None, None) => {
            return Err(SiftError::Config(
                "either --prompt-file or --goal must be supplied".to_string(),
            ))
        }
    };

    let documents = load_documents(&cli.input_folder)?;
    if documents.is_empty() {
        return Err(SiftError::Config(format!(
            "no .txt documents found in {}",
            cli.input_folder.display()
        )));
    }
    info!(count = documents.len(), "loaded documents");

    let pipeline = Pipeline::new(client, base_prompt, mode);
    let summary = pipeline.run(&documents, &cli.output_folder).await?;

    info!(
        with_data = summary.documents_with_data,
        total = summary.total_documents,
        "extraction finished"
    );
    Ok(())
}

/// Read every .txt file in the folder as one document
fn load_documents(input_folder: &Path) -> Result<Vec<Document>> {
    let mut documents = Vec::new();

    let mut entries: Vec<_> = std::fs::read_dir(input_folder)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    entries.sort();

    for path in entries {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = std::fs::read_to_string(&path)?;
        documents.push(Document { name, text });
    }

    Ok(documents)
}
