//! Decision documents.
//!
//! A decision document is a [`ScoringInput`] written as JSON, usually
//! recovered from free-form text with
//! [`extract_json`](crate::normalize::extract_json). Only `options` and
//! `criteria` are required.

use serde_json::{json, Value};

use crate::error::ScoringError;
use crate::model::RatingScale;

use super::types::ScoringInput;

impl ScoringInput {
    /// Read a request from a decision document.
    ///
    /// A missing or null `scale` becomes `default_scale`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidScoringRequest`] if the document does not
    /// have the shape of a request. Its contents are validated later, by
    /// [`rank`](super::rank).
    ///
    /// # Examples
    ///
    /// ```
    /// use decision_core::model::RatingScale;
    /// use decision_core::scoring::ScoringInput;
    /// use serde_json::json;
    ///
    /// let input = ScoringInput::from_document(
    ///     &json!({"options": ["A", "B"], "criteria": ["Cost"]}),
    ///     RatingScale::FivePoint,
    /// )
    /// .unwrap();
    /// assert_eq!(input.scale, RatingScale::FivePoint);
    /// ```
    pub fn from_document(value: &Value, default_scale: RatingScale) -> Result<Self, ScoringError> {
        let Value::Object(fields) = value else {
            return Err(ScoringError::invalid("decision document must be a JSON object"));
        };

        let mut fields = fields.clone();
        let declared = fields.get("scale").is_some_and(|scale| !scale.is_null());
        if !declared {
            fields.insert("scale".to_string(), json!(default_scale));
        }

        serde_json::from_value(Value::Object(fields))
            .map_err(|e| ScoringError::invalid(format!("malformed decision document: {e}")))
    }
}
