//! Prompt Assembly
//!
//! Builds the per-document prompt and, when the user supplies an informal
//! goal instead of a ready prompt, derives a detailed extraction prompt by
//! running the goal through the same resilient client.

use crate::client::{GenerationBackend, GenerationOutcome, ResilientClient};
use crate::error::{Result, SiftError};
use tracing::info;

/// Template for turning an informal goal into an extraction prompt.
/// `{goal}` is replaced with the user's goal text.
const DERIVE_PROMPT_TEMPLATE: &str = "\
You write instructions for a data-extraction system.

Turn the goal below into a single, detailed extraction prompt. The prompt \
you write must instruct a model to read one email's text and respond with \
only a JSON object containing the requested fields - no prose, no markdown, \
and the literal value null when the email contains none of the requested \
information. Name each field explicitly and state its expected type.

Goal: {goal}

Respond with only the prompt text.";

/// Assemble the full per-document prompt from the base prompt and the
/// document's extracted text
pub fn compose_prompt(base_prompt: &str, document_text: &str) -> String {
    format!(
        "{}\n\nHere is the email content:\n\n---\n{}\n---",
        base_prompt, document_text
    )
}

/// Derive a detailed extraction prompt from an informal user goal.
///
/// Runs one generation call through the job's client. Exhaustion here is
/// fatal for the whole job: without a prompt there is nothing to extract
/// with.
pub async fn derive_extraction_prompt<B: GenerationBackend>(
    client: &ResilientClient<B>,
    goal: &str,
) -> Result<String> {
    let prompt = DERIVE_PROMPT_TEMPLATE.replace("{goal}", goal.trim());

    match client.generate(&prompt).await {
        GenerationOutcome::Text(text) => {
            let derived = text.trim().to_string();
            info!(chars = derived.len(), "derived extraction prompt from goal");
            Ok(derived)
        }
        GenerationOutcome::Exhausted(report) => Err(SiftError::PromptDerivation(format!(
            "no model produced a prompt ({})",
            report
        ))),
    }
}
