//! Prompt templates.
//!
//! Prompts handed to the generative model, organized by phase:
//! - `extraction`: structuring the dilemma description, context analysis
//! - `elicitation`: comparative questions and the rating conversation
//!
//! Prompts that expect a structured answer embed the JSON schema of the type
//! the answer is coerced into, generated with `schemars`. The wording matters
//! less than the shape: every answer goes through the normalizer and the
//! schema coercion whatever the model does.
//!
//! # Example
//!
//! ```
//! use decision_core::prompts::extraction_prompt;
//!
//! let prompt = extraction_prompt("Should I take the job in Haifa or stay in Tel Aviv?");
//! assert!(prompt.contains("summarizedDilemma"));
//! assert!(prompt.ends_with("stay in Tel Aviv?"));
//! ```

mod elicitation;
mod extraction;

pub use elicitation::{elicitation_system_prompt, question_generation_prompt};
pub use extraction::{context_analysis_prompt, extraction_prompt};

use schemars::{JsonSchema, Schema};

/// Pretty-printed JSON schema of `T`.
fn schema_of<T: JsonSchema>() -> String {
    let schema: Schema = schemars::schema_for!(T);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Names as a JSON array literal.
fn json_list(names: &[String]) -> String {
    serde_json::to_string(names).unwrap_or_else(|_| "[]".to_string())
}
