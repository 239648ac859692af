//! Value types shared by every stage of the decision pipeline.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lowest criterion weight a user can set.
pub const MIN_WEIGHT: u32 = 1;

/// Highest criterion weight a user can set.
pub const MAX_WEIGHT: u32 = 10;

/// Weight given to a newly created criterion.
pub const DEFAULT_WEIGHT: u32 = 5;

/// Ratings keyed by option, then criterion.
///
/// The scale of the numbers is never implied by this type; whoever builds a
/// table declares its [`RatingScale`] alongside it.
pub type RatingTable = HashMap<String, HashMap<String, f64>>;

/// Identity key for option and criterion names.
///
/// Trims, collapses internal whitespace and lowercases, so `"  New   York "`
/// and `"new york"` name the same option.
///
/// # Examples
///
/// ```
/// use decision_core::model::normalize_name;
///
/// assert_eq!(normalize_name("  Battery   Life "), "battery life");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Trim and collapse whitespace while keeping the user's casing.
#[must_use]
pub fn display_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One cell of the option × criterion matrix.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct RatingPair {
    /// Option name.
    pub option: String,
    /// Criterion name.
    pub criterion: String,
}

impl RatingPair {
    /// Build a pair from any string-like names.
    #[must_use]
    pub fn new(option: impl Into<String>, criterion: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            criterion: criterion.into(),
        }
    }
}

impl fmt::Display for RatingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.option, self.criterion)
    }
}

// ============================================================================
// Rating scale
// ============================================================================

/// A declared integer rating range.
///
/// The direct-entry matrix rates on 1–5 and guided elicitation on 1–10. Every
/// producer of ratings declares which one it uses and converts explicitly with
/// [`RatingScale::convert`]; the scoring engine never guesses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RatingScale {
    /// 1 = very poor, 5 = excellent.
    FivePoint,
    /// 1–10 satisfaction, used by comparative elicitation questions.
    #[default]
    TenPoint,
}

impl RatingScale {
    /// Lowest rating on this scale.
    #[must_use]
    pub const fn min(self) -> f64 {
        1.0
    }

    /// Highest rating on this scale.
    #[must_use]
    pub const fn max(self) -> f64 {
        match self {
            Self::FivePoint => 5.0,
            Self::TenPoint => 10.0,
        }
    }

    /// Centre of the scale.
    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.min() + self.max()) / 2.0
    }

    /// Whether `value` lies inside the scale.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value.is_finite() && value >= self.min() && value <= self.max()
    }

    /// Clamp a finite value into the scale.
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min(), self.max())
    }

    /// Linearly map `value` from this scale onto `target`.
    ///
    /// The endpoints map onto each other, so 1 stays 1 and the maximum of one
    /// scale becomes the maximum of the other.
    ///
    /// # Examples
    ///
    /// ```
    /// use decision_core::model::RatingScale;
    ///
    /// assert_eq!(RatingScale::FivePoint.convert(3.0, RatingScale::TenPoint), 5.5);
    /// assert_eq!(RatingScale::TenPoint.convert(10.0, RatingScale::FivePoint), 5.0);
    /// ```
    #[must_use]
    pub fn convert(self, value: f64, target: Self) -> f64 {
        if self == target {
            return value;
        }
        let fraction = (value - self.min()) / (self.max() - self.min());
        target.min() + fraction * (target.max() - target.min())
    }

    /// Stable identifier used in configuration and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FivePoint => "five_point",
            Self::TenPoint => "ten_point",
        }
    }
}

impl fmt::Display for RatingScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a rating scale name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseScaleError(pub String);

impl fmt::Display for ParseScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown rating scale: {}", self.0)
    }
}

impl std::error::Error for ParseScaleError {}

impl FromStr for RatingScale {
    type Err = ParseScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "five_point" | "1-5" | "5" => Ok(Self::FivePoint),
            "ten_point" | "1-10" | "10" => Ok(Self::TenPoint),
            other => Err(ParseScaleError(other.to_string())),
        }
    }
}

// ============================================================================
// Polarity
// ============================================================================

/// Direction in which a criterion's raw rating is better.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Higher raw rating is better.
    #[default]
    Positive,
    /// Lower raw rating is better (cost, risk, commute time).
    Negative,
}

impl Polarity {
    /// Orient a rating so that higher is always better.
    ///
    /// Negative criteria are mirrored around the scale centre.
    #[must_use]
    pub fn orient(self, rating: f64, scale: RatingScale) -> f64 {
        match self {
            Self::Positive => rating,
            Self::Negative => scale.min() + scale.max() - rating,
        }
    }
}

// ============================================================================
// Confidence
// ============================================================================

/// Certainty behind a reconciled rating.
///
/// Ordered `Low < Medium < High`, so reconciliation can keep the maximum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// No direct evidence; the score is a placeholder.
    #[default]
    Low,
    /// Partial or vague evidence, enough to estimate.
    Medium,
    /// Explicit, detailed evidence.
    High,
}

impl Confidence {
    /// Parse a model-supplied confidence label, ignoring case and whitespace.
    ///
    /// Returns `None` for anything unrecognised.
    #[must_use]
    pub fn parse_lenient(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" | "moderate" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Whether this level is enough to stop eliciting the pair.
    #[must_use]
    pub fn is_settled(self) -> bool {
        self >= Self::Medium
    }
}

// ============================================================================
// Criterion
// ============================================================================

/// A named decision factor with its user-assigned importance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Criterion {
    /// Display name.
    pub name: String,
    /// Importance, 1–10.
    pub weight: u32,
    /// Whether higher raw ratings are better.
    #[serde(default)]
    pub polarity: Polarity,
}

impl Criterion {
    /// Create a criterion with the default weight and positive polarity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: DEFAULT_WEIGHT,
            polarity: Polarity::Positive,
        }
    }

    /// Set the weight.
    #[must_use]
    pub const fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the polarity.
    #[must_use]
    pub const fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Identity key of this criterion.
    #[must_use]
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Cost", "cost" ; "lowercases")]
    #[test_case("  Battery   Life ", "battery life" ; "collapses whitespace")]
    #[test_case("\tNew\nYork", "new york" ; "treats tabs and newlines as spaces")]
    #[test_case("   ", "" ; "blank becomes empty")]
    fn test_normalize_name(input: &str, expected: &str) {
        assert_eq!(normalize_name(input), expected);
    }

    #[test]
    fn test_display_name_keeps_case() {
        assert_eq!(display_name("  MacBook   Air "), "MacBook Air");
    }

    #[test_case(RatingScale::FivePoint, 1.0, 1.0)]
    #[test_case(RatingScale::FivePoint, 5.0, 10.0)]
    #[test_case(RatingScale::FivePoint, 3.0, 5.5)]
    #[test_case(RatingScale::TenPoint, 7.0, 7.0)]
    fn test_convert_to_ten_point(from: RatingScale, value: f64, expected: f64) {
        assert_eq!(from.convert(value, RatingScale::TenPoint), expected);
    }

    #[test]
    fn test_convert_ten_to_five() {
        assert_eq!(RatingScale::TenPoint.convert(1.0, RatingScale::FivePoint), 1.0);
        assert_eq!(RatingScale::TenPoint.convert(10.0, RatingScale::FivePoint), 5.0);
        assert_eq!(RatingScale::TenPoint.convert(5.5, RatingScale::FivePoint), 3.0);
    }

    #[test]
    fn test_scale_contains_and_clamp() {
        assert!(RatingScale::FivePoint.contains(5.0));
        assert!(!RatingScale::FivePoint.contains(6.0));
        assert!(!RatingScale::TenPoint.contains(f64::NAN));
        assert_eq!(RatingScale::FivePoint.clamp(9.0), 5.0);
        assert_eq!(RatingScale::TenPoint.clamp(-2.0), 1.0);
    }

    #[test]
    fn test_scale_from_str() {
        assert_eq!("five_point".parse(), Ok(RatingScale::FivePoint));
        assert_eq!(" 1-10 ".parse(), Ok(RatingScale::TenPoint));
        assert!("percent".parse::<RatingScale>().is_err());
    }

    #[test]
    fn test_scale_serde_names() {
        let json = serde_json::to_string(&RatingScale::FivePoint).unwrap();
        assert_eq!(json, "\"five_point\"");
    }

    #[test]
    fn test_negative_polarity_mirrors() {
        let scale = RatingScale::FivePoint;
        assert_eq!(Polarity::Negative.orient(1.0, scale), 5.0);
        assert_eq!(Polarity::Negative.orient(3.0, scale), 3.0);
        assert_eq!(Polarity::Positive.orient(2.0, scale), 2.0);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
        assert_eq!(Confidence::Low.max(Confidence::High), Confidence::High);
        assert!(!Confidence::Low.is_settled());
        assert!(Confidence::Medium.is_settled());
    }

    #[test_case("HIGH", Some(Confidence::High))]
    #[test_case(" medium ", Some(Confidence::Medium))]
    #[test_case("low", Some(Confidence::Low))]
    #[test_case("certain", None)]
    fn test_confidence_parse_lenient(label: &str, expected: Option<Confidence>) {
        assert_eq!(Confidence::parse_lenient(label), expected);
    }

    #[test]
    fn test_criterion_defaults() {
        let criterion = Criterion::new("Price");
        assert_eq!(criterion.weight, DEFAULT_WEIGHT);
        assert_eq!(criterion.polarity, Polarity::Positive);
        assert_eq!(criterion.key(), "price");
    }

    #[test]
    fn test_criterion_deserializes_without_polarity() {
        let criterion: Criterion =
            serde_json::from_str(r#"{"name": "Cost", "weight": 8}"#).unwrap();
        assert_eq!(criterion.polarity, Polarity::Positive);
        assert_eq!(criterion.weight, 8);
    }
}
