//! Reconciliation state and update types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Confidence, RatingPair, RatingScale, RatingTable};

/// What is known about one (option, criterion) pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PairState {
    /// Reconciled rating on the matrix scale, `None` while unknown.
    pub score: Option<f64>,
    /// Certainty behind the rating.
    pub confidence: Confidence,
    /// Justification gathered from the user's answers.
    pub evidence: String,
}

/// Supplied values for one pair. `None` fields leave the pair untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PairUpdate {
    /// Proposed rating, on the update's scale.
    pub score: Option<f64>,
    /// Proposed confidence.
    pub confidence: Option<Confidence>,
    /// New evidence.
    pub evidence: Option<String>,
}

/// A partial update for a [`RatingMatrix`](super::RatingMatrix).
///
/// Only the pairs present are touched. Scores are declared on
/// [`MatrixUpdate::scale`] and converted when applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatrixUpdate {
    /// Scale the scores of this update are expressed on.
    pub scale: RatingScale,
    /// Supplied values keyed by pair, names as the producer spelled them.
    pub pairs: BTreeMap<RatingPair, PairUpdate>,
}

impl MatrixUpdate {
    /// Start an empty update on `scale`.
    #[must_use]
    pub fn new(scale: RatingScale) -> Self {
        Self {
            scale,
            pairs: BTreeMap::new(),
        }
    }

    /// Propose a score for one pair.
    #[must_use]
    pub fn score(mut self, option: &str, criterion: &str, score: f64) -> Self {
        self.entry(option, criterion).score = Some(score);
        self
    }

    /// Propose a confidence for one pair.
    #[must_use]
    pub fn confidence(mut self, option: &str, criterion: &str, confidence: Confidence) -> Self {
        self.entry(option, criterion).confidence = Some(confidence);
        self
    }

    /// Add evidence for one pair.
    #[must_use]
    pub fn evidence(mut self, option: &str, criterion: &str, evidence: impl Into<String>) -> Self {
        self.entry(option, criterion).evidence = Some(evidence.into());
        self
    }

    /// Whether the update touches no pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn entry(&mut self, option: &str, criterion: &str) -> &mut PairUpdate {
        self.pairs
            .entry(RatingPair::new(option, criterion))
            .or_default()
    }
}

/// Concrete ratings ready for scoring.
///
/// Pairs with no reconciled score hold the neutral rating and are listed in
/// `defaulted_pairs`; any such pair means the result rests on reduced
/// confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRatings {
    /// One rating per pair on `scale`.
    pub ratings: RatingTable,
    /// Scale of `ratings`.
    pub scale: RatingScale,
    /// Pairs filled with the neutral rating, in matrix order.
    pub defaulted_pairs: Vec<RatingPair>,
}

impl ResolvedRatings {
    /// Whether any pair was filled with the neutral rating.
    #[must_use]
    pub fn reduced_confidence(&self) -> bool {
        !self.defaulted_pairs.is_empty()
    }
}
