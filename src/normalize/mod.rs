//! Response normalization.
//!
//! Generative models are asked for JSON and answer with something close to
//! it: prose around the payload, fenced code blocks, literal newlines inside
//! strings, or output cut off at the token limit. [`extract_json`] recovers
//! the intended value or fails with [`NormalizeError::MalformedExtractedData`].
//!
//! # Strategy order
//!
//! First success wins:
//!
//! 1. The first fenced block, minus its language tag
//! 2. First `{` to last `}` of the fence-stripped text
//! 3. First `[` to last `]`
//! 4. First `{` to end of text
//! 5. First `[` to end of text
//!
//! Strategies 2–5 are each tried on the raw candidate, the candidate with
//! control characters re-escaped, and the escaped candidate with truncated
//! structure closed (see [`repair`]).

pub mod repair;

use serde_json::Value;
use tracing::debug;

use crate::error::NormalizeError;

/// Number of characters of the offending text carried by the error.
pub const EXCERPT_CHARS: usize = 200;

const FENCE: &str = "```";

/// Extract one JSON value from free-form model text.
///
/// # Errors
///
/// Returns [`NormalizeError::MalformedExtractedData`] carrying the first 200
/// characters of `text` when no strategy yields a value.
///
/// # Examples
///
/// ```
/// use decision_core::normalize::extract_json;
///
/// let value = extract_json("Sure!\n```json\n{\"options\": [\"A\", \"B\"]}\n```").unwrap();
/// assert_eq!(value["options"][1], "B");
///
/// // Truncated output is closed rather than rejected
/// let value = extract_json(r#"{"a": [1,2,"#).unwrap();
/// assert_eq!(value["a"], serde_json::json!([1, 2]));
///
/// assert!(extract_json("no json here").is_err());
/// ```
pub fn extract_json(text: &str) -> Result<Value, NormalizeError> {
    if let Some(block) = first_fenced_block(text) {
        if let Ok(value) = serde_json::from_str::<Value>(block.trim()) {
            debug!("Parsed JSON from fenced block");
            return Ok(value);
        }
    }

    let stripped = text.replace(FENCE, "");
    let candidates = [
        ("object", enclosed(&stripped, '{', '}')),
        ("array", enclosed(&stripped, '[', ']')),
        ("object-tail", tail_from(&stripped, '{')),
        ("array-tail", tail_from(&stripped, '[')),
    ];

    for (strategy, candidate) in candidates {
        let Some(candidate) = candidate else {
            continue;
        };
        if let Some(value) = parse_with_repairs(candidate) {
            debug!(strategy, "Recovered JSON");
            return Ok(value);
        }
    }

    Err(NormalizeError::MalformedExtractedData {
        excerpt: excerpt(text),
    })
}

/// Try a candidate raw, escaped, then escaped and closed.
fn parse_with_repairs(candidate: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(candidate) {
        return Some(value);
    }
    let escaped = repair::escape_control_chars(candidate);
    if let Ok(value) = serde_json::from_str(&escaped) {
        return Some(value);
    }
    serde_json::from_str(&repair::close_truncated(&escaped)).ok()
}

/// Content of the first fence group, without a language tag on the fence line.
///
/// An unterminated fence runs to the end of the text.
fn first_fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let rest = &text[start..];
    let body = rest.find(FENCE).map_or(rest, |end| &rest[..end]);

    let (first_line, remainder) = body.split_once('\n').unwrap_or((body, ""));
    let tag = first_line.trim();
    let is_language_tag = !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'));

    let content = if is_language_tag { remainder } else { body };
    if content.trim().is_empty() {
        return None;
    }
    Some(content)
}

/// Substring from the first `open` to the last `close`, inclusive.
fn enclosed(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Substring from the first `open` to the end of the text.
fn tail_from(text: &str, open: char) -> Option<&str> {
    text.find(open).map(|start| &text[start..])
}

/// First [`EXCERPT_CHARS`] characters of `text`.
#[must_use]
pub fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

/// Serialize a value for logging, truncating if too long.
///
/// Truncation counts characters, so multi-byte text never splits mid-char.
#[must_use]
pub fn serialize_for_log<T: serde::Serialize>(value: &T, max_len: usize) -> String {
    match serde_json::to_string(value) {
        Ok(s) if s.chars().count() <= max_len => s,
        Ok(s) => format!("{}...", s.chars().take(max_len).collect::<String>()),
        Err(_) => "<serialization failed>".to_string(),
    }
}
