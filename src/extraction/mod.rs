//! Schema coercion for extraction and context-analysis output.
//!
//! The model's answers are parsed with [`extract_json`](crate::normalize::extract_json)
//! and then checked field by field. Absent or wrong-typed fields fall back to
//! documented defaults, never to an error:
//!
//! | Field | Default |
//! |---|---|
//! | `options`, `criteria` | empty |
//! | `userContext` | empty, null-like values dropped |
//! | `summarizedDilemma` | empty |
//! | `isVague`, `isOverlyDetailed` | `false` |
//!
//! Whatever the model claims, fewer than two options is never sufficient.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::{display_name, normalize_name};

/// Personal details the user mentioned: budget, location, timeline, ...
pub type UserContext = BTreeMap<String, Value>;

/// Structured view of a free-text dilemma description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Alternatives explicitly mentioned.
    pub options: Vec<String>,
    /// Factors explicitly mentioned.
    pub criteria: Vec<String>,
    /// Personal details relevant to the decision.
    pub user_context: UserContext,
    /// One-line question capturing the decision.
    pub summarized_dilemma: String,
    /// The description was too vague to structure.
    pub is_vague: bool,
    /// The description already listed options, criteria or extensive context.
    pub is_overly_detailed: bool,
}

impl ExtractionResult {
    /// The result used when the description cannot be structured.
    #[must_use]
    pub fn vague() -> Self {
        Self {
            is_vague: true,
            ..Self::default()
        }
    }

    /// Coerce the model's extraction payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use decision_core::extraction::ExtractionResult;
    /// use serde_json::json;
    ///
    /// let result = ExtractionResult::from_value(&json!({
    ///     "options": ["Tel Aviv", "Haifa", 3],
    ///     "criteria": ["Rent", "rent ", "Commute"],
    ///     "userContext": {"budget": "6000", "location": null}
    /// }));
    /// assert_eq!(result.options, vec!["Tel Aviv", "Haifa"]);
    /// assert_eq!(result.criteria, vec!["Rent", "Commute"]);
    /// assert!(result.user_context.get("location").is_none());
    /// assert!(result.is_sufficient());
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let options = string_list(value.get("options"));
        let criteria = string_list(value.get("criteria"));
        let user_context = clean_context(value.get("userContext"));
        let summarized_dilemma = value
            .get("summarizedDilemma")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let claimed_vague = value.get("isVague").and_then(Value::as_bool) == Some(true);
        let is_vague = claimed_vague || (options.len() < 2 && summarized_dilemma.is_empty());
        let is_overly_detailed =
            value.get("isOverlyDetailed").and_then(Value::as_bool) == Some(true);

        debug!(
            options = options.len(),
            criteria = criteria.len(),
            context_fields = user_context.len(),
            is_vague,
            "Coerced extraction"
        );

        Self {
            options,
            criteria,
            user_context,
            summarized_dilemma,
            is_vague,
            is_overly_detailed,
        }
    }

    /// At least two options were found, whatever the flags say.
    #[must_use]
    pub fn is_sufficient(&self) -> bool {
        self.options.len() >= 2
    }
}

/// One follow-up question about the user's situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContextQuestion {
    /// Context field the answer fills, e.g. `current_city`.
    pub field: String,
    /// Question shown to the user.
    pub question: String,
    /// Why the answer matters for the comparison.
    #[serde(default)]
    pub reason: String,
}

/// What is already known about the user and what is still worth asking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ContextAnalysis {
    /// Facts extracted from the description.
    pub already_known_context: UserContext,
    /// Whether any question remains.
    pub needs_more_context: bool,
    /// Follow-up questions for fields not yet known.
    pub questions: Vec<ContextQuestion>,
}

impl ContextAnalysis {
    /// Nothing more to ask.
    #[must_use]
    pub fn complete() -> Self {
        Self::default()
    }

    /// Coerce the model's context-analysis payload.
    ///
    /// Questions for fields already known are dropped, and
    /// `needs_more_context` is false once no question remains.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let already_known_context = clean_context(value.get("already_known_context"));

        let questions: Vec<ContextQuestion> = value
            .get("questions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|q| serde_json::from_value::<ContextQuestion>(q.clone()).ok())
                    .filter(|q| !q.question.trim().is_empty())
                    .filter(|q| {
                        let known = already_known_context.contains_key(&q.field);
                        if known {
                            debug!(field = %q.field, "Dropped question for known field");
                        }
                        !known
                    })
                    .collect()
            })
            .unwrap_or_default();

        let claimed = value
            .get("needs_more_context")
            .and_then(Value::as_bool)
            .unwrap_or(!questions.is_empty());

        Self {
            needs_more_context: claimed && !questions.is_empty(),
            already_known_context,
            questions,
        }
    }
}

/// Whether every option is a placeholder such as "Option A" or "Choice 2".
///
/// Context questions are pointless for placeholders, so the assistant skips
/// context analysis for them. An empty list is not abstract.
#[must_use]
pub fn is_abstract_option_set<S: AsRef<str>>(options: &[S]) -> bool {
    !options.is_empty() && options.iter().all(|o| is_placeholder(o.as_ref()))
}

const PLACEHOLDER_PREFIXES: [&str; 5] = ["option", "choice", "job", "alternative", "candidate"];

fn is_placeholder(option: &str) -> bool {
    let lowered = option.trim().to_lowercase();
    PLACEHOLDER_PREFIXES.iter().any(|prefix| {
        lowered.strip_prefix(prefix).is_some_and(|rest| {
            rest.trim_start()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
    })
}

/// Render a context value for prompts and queries.
///
/// Strings are returned as is, numbers and booleans formatted, lists joined
/// with `", "`. Objects and nulls have no text form.
#[must_use]
pub fn context_text(context: &UserContext, key: &str) -> Option<String> {
    match context.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

/// Trimmed strings of a JSON array, deduplicated by normalized name.
fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        if value.is_some_and(|v| !v.is_null()) {
            warn!("Expected a list of names, ignoring");
        }
        return Vec::new();
    };

    let mut seen = std::collections::HashSet::new();
    items
        .iter()
        .filter_map(Value::as_str)
        .map(display_name)
        .filter(|name| !name.is_empty() && seen.insert(normalize_name(name)))
        .collect()
}

/// Object entries minus null, `"null"` and empty-string values.
fn clean_context(value: Option<&Value>) -> UserContext {
    value
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter(|(_, v)| match v {
                    Value::Null => false,
                    Value::String(s) => !s.trim().is_empty() && s.trim() != "null",
                    _ => true,
                })
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_from_value_full_payload() {
        let result = ExtractionResult::from_value(&json!({
            "options": ["iPhone 14 Pro Max", "Samsung Galaxy S23"],
            "criteria": ["Price", "Battery Life", "Camera"],
            "userContext": {
                "budget": "4000",
                "currency": "ILS",
                "location": "null",
                "timeline": "",
                "constraints": ["must fit in pocket"]
            },
            "summarizedDilemma": "Which phone should I buy?",
            "isVague": false,
            "isOverlyDetailed": true
        }));

        assert_eq!(result.options.len(), 2);
        assert_eq!(result.criteria, vec!["Price", "Battery Life", "Camera"]);
        assert_eq!(
            result.user_context.keys().collect::<Vec<_>>(),
            vec!["budget", "constraints", "currency"]
        );
        assert_eq!(result.summarized_dilemma, "Which phone should I buy?");
        assert!(!result.is_vague);
        assert!(result.is_overly_detailed);
        assert!(result.is_sufficient());
    }

    #[test]
    fn test_from_value_wrong_types_default() {
        let result = ExtractionResult::from_value(&json!({
            "options": "A and B",
            "criteria": null,
            "userContext": [1, 2],
            "summarizedDilemma": 7,
            "isVague": "no"
        }));
        assert_eq!(result.options, Vec::<String>::new());
        assert!(result.user_context.is_empty());
        assert!(result.is_vague);
        assert!(!result.is_sufficient());
    }

    #[test]
    fn test_single_option_insufficient_even_if_not_vague() {
        let result = ExtractionResult::from_value(&json!({
            "options": ["Move to Berlin"],
            "summarizedDilemma": "Should I move to Berlin?",
            "isVague": false
        }));
        assert!(!result.is_vague);
        assert!(!result.is_sufficient());
    }

    #[test]
    fn test_vague_fallback() {
        let result = ExtractionResult::vague();
        assert!(result.is_vague);
        assert!(result.options.is_empty());
        assert!(!result.is_overly_detailed);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(ExtractionResult::vague()).unwrap();
        assert_eq!(json["isVague"], true);
        assert!(json.get("summarizedDilemma").is_some());
    }

    #[test]
    fn test_context_analysis_drops_known_fields() {
        let analysis = ContextAnalysis::from_value(&json!({
            "already_known_context": {"current_city": "London"},
            "needs_more_context": true,
            "questions": [
                {"field": "current_city", "question": "Where do you live?", "reason": "r"},
                {"field": "budget", "question": "What is your budget?"}
            ]
        }));
        assert_eq!(analysis.questions.len(), 1);
        assert_eq!(analysis.questions[0].field, "budget");
        assert!(analysis.needs_more_context);
    }

    #[test]
    fn test_context_analysis_no_questions_left() {
        let analysis = ContextAnalysis::from_value(&json!({
            "already_known_context": {"budget": "5000"},
            "needs_more_context": true,
            "questions": [{"field": "budget", "question": "Budget?"}]
        }));
        assert!(analysis.questions.is_empty());
        assert!(!analysis.needs_more_context);
    }

    #[test]
    fn test_context_analysis_malformed() {
        let analysis = ContextAnalysis::from_value(&json!({"questions": [{"text": "?"}, 3]}));
        assert_eq!(analysis, ContextAnalysis::complete());
    }

    #[test_case(&["Option A", "Option B"], true ; "lettered options")]
    #[test_case(&["choice 1", "Choice2"], true ; "numbered choices")]
    #[test_case(&["Job A", "Candidate"], true ; "bare prefix")]
    #[test_case(&["Option A", "Stay in London"], false ; "one concrete")]
    #[test_case(&["Optional extras", "Option B"], false ; "longer word")]
    #[test_case(&[], false ; "empty")]
    fn test_is_abstract_option_set(options: &[&str], expected: bool) {
        assert_eq!(is_abstract_option_set(options), expected);
    }

    #[test]
    fn test_context_text() {
        let context: UserContext = [
            ("budget".to_string(), json!(5000)),
            ("city".to_string(), json!(" Haifa ")),
            ("constraints".to_string(), json!(["no car", "remote"])),
            ("nested".to_string(), json!({"a": 1})),
        ]
        .into_iter()
        .collect();
        assert_eq!(context_text(&context, "budget").as_deref(), Some("5000"));
        assert_eq!(context_text(&context, "city").as_deref(), Some("Haifa"));
        assert_eq!(
            context_text(&context, "constraints").as_deref(),
            Some("no car, remote")
        );
        assert_eq!(context_text(&context, "nested"), None);
        assert_eq!(context_text(&context, "missing"), None);
    }
}
