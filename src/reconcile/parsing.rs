//! Coercion of model-proposed matrix updates.
//!
//! The model answers with three parallel maps keyed by option, then
//! criterion: `scores`, `confidence` and `evidence`. Nothing about their shape
//! is trusted. Wrong-typed values are treated as absent, so a sloppy answer
//! can only ever leave pairs untouched.

use serde_json::Value;
use tracing::warn;

use crate::model::{Confidence, RatingScale};

use super::types::MatrixUpdate;

impl MatrixUpdate {
    /// Coerce a model-proposed update declared on `scale`.
    ///
    /// - non-numeric scores are absent, numeric ones are clamped into `scale`
    /// - unrecognised confidence labels are absent
    /// - evidence must be a non-empty string
    ///
    /// Names are kept as spelled; [`RatingMatrix::apply`](super::RatingMatrix::apply)
    /// resolves them and ignores unknown ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use decision_core::model::{Confidence, RatingPair, RatingScale};
    /// use decision_core::reconcile::MatrixUpdate;
    /// use serde_json::json;
    ///
    /// let update = MatrixUpdate::from_value(
    ///     &json!({
    ///         "scores": {"A": {"Cost": 9, "Speed": null}},
    ///         "confidence": {"A": {"Cost": "HIGH", "Speed": "sure"}}
    ///     }),
    ///     RatingScale::FivePoint,
    /// );
    /// let cost = &update.pairs[&RatingPair::new("A", "Cost")];
    /// assert_eq!(cost.score, Some(5.0));
    /// assert_eq!(cost.confidence, Some(Confidence::High));
    /// assert!(!update.pairs.contains_key(&RatingPair::new("A", "Speed")));
    /// ```
    #[must_use]
    pub fn from_value(value: &Value, scale: RatingScale) -> Self {
        let mut update = Self::new(scale);

        for (option, criterion, raw) in nested_entries(value, "scores") {
            match raw.as_f64().filter(|s| s.is_finite()) {
                Some(score) => {
                    let clamped = scale.clamp(score);
                    if (clamped - score).abs() > f64::EPSILON {
                        warn!(option, criterion, score, "Clamped out-of-range score");
                    }
                    update.entry(option, criterion).score = Some(clamped);
                }
                None if !raw.is_null() => {
                    warn!(option, criterion, value = %raw, "Ignored non-numeric score");
                }
                None => {}
            }
        }

        for (option, criterion, raw) in nested_entries(value, "confidence") {
            match raw.as_str().and_then(Confidence::parse_lenient) {
                Some(confidence) => update.entry(option, criterion).confidence = Some(confidence),
                None => warn!(option, criterion, value = %raw, "Ignored unknown confidence"),
            }
        }

        for (option, criterion, raw) in nested_entries(value, "evidence") {
            if let Some(text) = raw.as_str().map(str::trim).filter(|t| !t.is_empty()) {
                update.entry(option, criterion).evidence = Some(text.to_string());
            }
        }

        update
    }
}

/// `(option, criterion, value)` triples of `value[field][option][criterion]`.
fn nested_entries<'a>(
    value: &'a Value,
    field: &str,
) -> impl Iterator<Item = (&'a str, &'a str, &'a Value)> {
    value
        .get(field)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|options| options.iter())
        .filter_map(|(option, row)| row.as_object().map(|row| (option, row)))
        .flat_map(|(option, row)| {
            row.iter()
                .map(move |(criterion, v)| (option.as_str(), criterion.as_str(), v))
        })
}
