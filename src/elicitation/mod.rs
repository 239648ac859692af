//! Comparative elicitation.
//!
//! Ratings are gathered with exactly one question per criterion. Each question
//! names every option and asks for a 1–10 rating of each, so the number of
//! turns depends on the criteria alone.
//!
//! - [`plan_questions`] builds the templated plan
//! - [`coerce_questions`] reconciles model-written questions with that plan
//! - [`ComparativeAnswer`] turns one answer into a [`MatrixUpdate`]
//! - [`search_query`] and [`QueryDeduper`] derive fact lookups per question

use std::collections::{BTreeMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::extraction::{context_text, UserContext};
use crate::model::{normalize_name, Confidence, RatingScale};
use crate::reconcile::MatrixUpdate;

/// Scale comparative answers are given on.
pub const ANSWER_SCALE: RatingScale = RatingScale::TenPoint;

/// What a question asks about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RelatesTo {
    /// Options the user rates in this question.
    pub options: Vec<String>,
    /// The criterion being rated.
    pub criterion: String,
}

/// One comparative question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ElicitationQuestion {
    /// `q1`, `q2`, ... in criterion order.
    pub id: String,
    /// Question shown to the user.
    pub text: String,
    /// Targeted options and criterion.
    pub relates_to: RelatesTo,
}

/// Number of questions for a decision: one per criterion.
///
/// The option count does not enter the budget; every question covers all
/// options at once.
#[must_use]
pub const fn question_budget(criteria: usize, _options: usize) -> usize {
    criteria
}

/// The templated question for one criterion.
#[must_use]
pub fn template_question(criterion: &str) -> String {
    format!("From 1 to 10, how well does each option do on {criterion}?")
}

/// One templated question per criterion, each covering every option.
///
/// # Examples
///
/// ```
/// use decision_core::elicitation::plan_questions;
///
/// let options = vec!["Laptop A".to_string(), "Laptop B".to_string()];
/// let criteria = vec!["Battery Life".to_string(), "Price".to_string()];
/// let plan = plan_questions(&options, &criteria);
///
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan[1].id, "q2");
/// assert_eq!(plan[1].relates_to.criterion, "Price");
/// assert_eq!(plan[1].relates_to.options, options);
/// ```
#[must_use]
pub fn plan_questions(options: &[String], criteria: &[String]) -> Vec<ElicitationQuestion> {
    criteria
        .iter()
        .enumerate()
        .map(|(i, criterion)| ElicitationQuestion {
            id: question_id(i),
            text: template_question(criterion),
            relates_to: RelatesTo {
                options: options.to_vec(),
                criterion: criterion.clone(),
            },
        })
        .collect()
}

/// Reconcile model-written questions with the plan.
///
/// The result has exactly one question per criterion in criterion order:
///
/// - the first model question naming a known criterion supplies its text
/// - questions for unknown or repeated criteria are dropped
/// - missing `relates_to.options` become all options; unknown names are removed
/// - criteria the model skipped get the templated question
#[must_use]
pub fn coerce_questions(
    value: &Value,
    options: &[String],
    criteria: &[String],
) -> Vec<ElicitationQuestion> {
    let proposed: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map
            .get("questions")
            .and_then(Value::as_array)
            .map(|items| items.iter().collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    let mut by_criterion: BTreeMap<String, (String, Vec<String>)> = BTreeMap::new();
    for item in proposed {
        let Some(text) = item
            .get("text")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            continue;
        };
        let relates_to = item.get("relates_to");
        let Some(criterion) = relates_to
            .and_then(|r| r.get("criterion"))
            .and_then(Value::as_str)
            .and_then(|c| find(criteria, c))
        else {
            warn!(text, "Dropped question for unknown criterion");
            continue;
        };

        let named: Vec<String> = relates_to
            .and_then(|r| r.get("options"))
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|n| find(options, n))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let targets = if named.is_empty() {
            options.to_vec()
        } else {
            named
        };

        by_criterion
            .entry(normalize_name(criterion))
            .or_insert_with(|| (text.to_string(), targets));
    }

    criteria
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            let (text, targets) = by_criterion
                .remove(&normalize_name(criterion))
                .unwrap_or_else(|| {
                    debug!(criterion, "Using templated question");
                    (template_question(criterion), options.to_vec())
                });
            ElicitationQuestion {
                id: question_id(i),
                text,
                relates_to: RelatesTo {
                    options: targets,
                    criterion: criterion.clone(),
                },
            }
        })
        .collect()
}

fn question_id(index: usize) -> String {
    format!("q{}", index + 1)
}

fn find<'a>(names: &'a [String], name: &str) -> Option<&'a str> {
    let key = normalize_name(name);
    names
        .iter()
        .find(|n| normalize_name(n) == key)
        .map(String::as_str)
}

// ============================================================================
// Answers
// ============================================================================

/// The user's answer to one comparative question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparativeAnswer {
    /// Question answered.
    pub question_id: String,
    /// Criterion the question targeted.
    pub criterion: String,
    /// The user's words.
    pub raw_answer: String,
    /// 1–10 rating per option; options left out were not answered.
    pub scores: BTreeMap<String, f64>,
}

impl ComparativeAnswer {
    /// An answer to `question` with no ratings yet.
    #[must_use]
    pub fn new(question: &ElicitationQuestion, raw_answer: impl Into<String>) -> Self {
        Self {
            question_id: question.id.clone(),
            criterion: question.relates_to.criterion.clone(),
            raw_answer: raw_answer.into(),
            scores: BTreeMap::new(),
        }
    }

    /// Record a rating for one option.
    #[must_use]
    pub fn with_score(mut self, option: impl Into<String>, score: f64) -> Self {
        self.scores.insert(option.into(), score);
        self
    }

    /// The reconciliation update this answer implies, on the 1–10 scale.
    ///
    /// Every rated option gets its score at `high` confidence with the raw
    /// answer as evidence. Non-finite ratings are left out.
    #[must_use]
    pub fn to_update(&self) -> MatrixUpdate {
        let evidence = self.raw_answer.trim();
        self.scores
            .iter()
            .filter(|(_, score)| score.is_finite())
            .fold(MatrixUpdate::new(ANSWER_SCALE), |update, (option, score)| {
                let update = update
                    .score(option, &self.criterion, *score)
                    .confidence(option, &self.criterion, Confidence::High);
                if evidence.is_empty() {
                    update
                } else {
                    update.evidence(option, &self.criterion, evidence)
                }
            })
    }
}

// ============================================================================
// Fact lookups
// ============================================================================

/// Phrases stripped from option names before building a lookup, so that
/// "Engineer at Acme" searches for "Acme".
const OPTION_MARKERS: [&str; 4] = ["at ", "position ", "stay in ", "move to "];

/// Lookup string for the facts behind one question.
///
/// `"<option> vs <option> <criterion> <specialisation>"`, where the
/// specialisation comes from the user's context:
///
/// - distance-like criteria use `family_location` or `home_location`
/// - career-like criteria use `current_position`
/// - cost-like criteria use `budget`
///
/// Returns `None` when the question names no option or criterion.
///
/// # Examples
///
/// ```
/// use decision_core::elicitation::{search_query, ElicitationQuestion, RelatesTo};
/// use decision_core::extraction::UserContext;
///
/// let question = ElicitationQuestion {
///     id: "q1".into(),
///     text: "How is the pay?".into(),
///     relates_to: RelatesTo {
///         options: vec!["Engineer at Acme".into(), "Engineer at Globex".into()],
///         criterion: "Salary".into(),
///     },
/// };
/// let mut context = UserContext::new();
/// context.insert("current_position".into(), "backend developer".into());
///
/// assert_eq!(
///     search_query(&question, &context).as_deref(),
///     Some("Acme vs Globex Salary for a backend developer")
/// );
/// ```
#[must_use]
pub fn search_query(question: &ElicitationQuestion, context: &UserContext) -> Option<String> {
    let criterion = question.relates_to.criterion.trim();
    if criterion.is_empty() {
        return None;
    }
    let options: Vec<&str> = question
        .relates_to
        .options
        .iter()
        .map(|o| clean_option(o))
        .filter(|o| !o.is_empty())
        .collect();
    if options.is_empty() {
        return None;
    }

    let query = format!(
        "{} {} {}",
        options.join(" vs "),
        criterion,
        specialisation(criterion, context).unwrap_or_default()
    );
    Some(query.trim().to_string())
}

fn clean_option(option: &str) -> &str {
    let trimmed = option.trim();
    for marker in OPTION_MARKERS {
        let found = trimmed.char_indices().find(|&(i, _)| {
            trimmed
                .get(i..i + marker.len())
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(marker))
                && (i == 0 || trimmed[..i].ends_with(char::is_whitespace))
        });
        if let Some((i, _)) = found {
            let rest = trimmed[i + marker.len()..].trim();
            if !rest.is_empty() {
                return rest;
            }
        }
    }
    trimmed
}

fn specialisation(criterion: &str, context: &UserContext) -> Option<String> {
    let lowered = criterion.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

    if mentions(&["family", "proximity", "distance", "travel"]) {
        context_text(context, "family_location")
            .or_else(|| context_text(context, "home_location"))
            .map(|place| format!("from {place}"))
    } else if mentions(&["salary", "career", "job", "professional"]) {
        context_text(context, "current_position").map(|role| format!("for a {role}"))
    } else if mentions(&["budget", "price", "cost"]) {
        context_text(context, "budget").map(|budget| format!("within budget {budget}"))
    } else {
        None
    }
}

/// Seen-set of lookups issued during one elicitation pass.
#[derive(Debug, Clone, Default)]
pub struct QueryDeduper {
    seen: HashSet<String>,
}

impl QueryDeduper {
    /// Empty seen-set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `query`; true if it had not been seen before.
    pub fn admit(&mut self, query: &str) -> bool {
        let fresh = self.seen.insert(normalize_name(query));
        if !fresh {
            debug!(query, "Skipped repeated lookup");
        }
        fresh
    }

    /// Lookups for `questions`, each distinct query once, in question order.
    pub fn queries_for(
        &mut self,
        questions: &[ElicitationQuestion],
        context: &UserContext,
    ) -> Vec<(String, String)> {
        questions
            .iter()
            .filter_map(|q| search_query(q, context).map(|query| (q.id.clone(), query)))
            .filter(|(_, query)| self.admit(query))
            .collect()
    }

    /// Number of distinct lookups seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
