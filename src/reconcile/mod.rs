//! Rating reconciliation.
//!
//! A [`RatingMatrix`] holds, for every (option, criterion) pair, a score, a
//! [`Confidence`] and the evidence gathered so far. Each elicitation turn
//! produces a [`MatrixUpdate`]; [`RatingMatrix::apply`] folds it in and returns
//! the next matrix, leaving the previous one intact.
//!
//! Merge rules per touched pair:
//!
//! - the latest supplied score wins, converted onto the matrix scale
//! - confidence is the maximum of prior and supplied, so it never regresses
//! - evidence is appended unless the same text is already recorded
//!
//! Pairs an update omits are never touched, and applying the same update
//! twice gives the same matrix as applying it once. The version only moves
//! when state changes, so replayed turns are visible as no-ops.

mod parsing;
mod types;

pub use types::{MatrixUpdate, PairState, PairUpdate, ResolvedRatings};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::{normalize_name, Confidence, RatingPair, RatingScale, RatingTable};

const EVIDENCE_SEPARATOR: &str = "; ";

/// Versioned option × criterion matrix threaded through elicitation turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingMatrix {
    id: Uuid,
    version: u64,
    scale: RatingScale,
    options: Vec<String>,
    criteria: Vec<String>,
    cells: BTreeMap<String, BTreeMap<String, PairState>>,
}

impl RatingMatrix {
    /// Every pair unknown, `low` confidence, empty evidence.
    ///
    /// Names are kept as given; duplicates by normalized name are dropped.
    #[must_use]
    pub fn new<O, C>(options: O, criteria: C, scale: RatingScale) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let options = dedup(options.into_iter().map(Into::into));
        let criteria = dedup(criteria.into_iter().map(Into::into));
        let cells = options
            .iter()
            .map(|o| {
                let row = criteria
                    .iter()
                    .map(|c| (c.clone(), PairState::default()))
                    .collect();
                (o.clone(), row)
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            version: 0,
            scale,
            options,
            criteria,
            cells,
        }
    }

    /// Matrix identity, stable across versions.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Number of state-changing updates applied so far.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Scale of the stored scores.
    #[must_use]
    pub const fn scale(&self) -> RatingScale {
        self.scale
    }

    /// Options in order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Criteria in order.
    #[must_use]
    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }

    /// Number of pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.options.len() * self.criteria.len()
    }

    /// State of one pair, looked up by normalized names.
    #[must_use]
    pub fn get(&self, option: &str, criterion: &str) -> Option<&PairState> {
        let option = self.resolve_option(option)?;
        let criterion = self.resolve_criterion(criterion)?;
        self.cells.get(option)?.get(criterion)
    }

    /// Pairs with their state, option-major in declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (RatingPair, &PairState)> + '_ {
        self.options.iter().flat_map(move |o| {
            self.criteria.iter().filter_map(move |c| {
                self.cells
                    .get(o)
                    .and_then(|row| row.get(c))
                    .map(|state| (RatingPair::new(o.clone(), c.clone()), state))
            })
        })
    }

    /// Fold an update into a new matrix.
    ///
    /// Unknown option or criterion names are skipped. The returned matrix has
    /// the same id and a version one higher if any pair changed, otherwise the
    /// same version.
    ///
    /// # Examples
    ///
    /// ```
    /// use decision_core::model::{Confidence, RatingScale};
    /// use decision_core::reconcile::{MatrixUpdate, RatingMatrix};
    ///
    /// let matrix = RatingMatrix::new(["A", "B"], ["Cost"], RatingScale::FivePoint);
    /// let update = MatrixUpdate::new(RatingScale::FivePoint)
    ///     .score("a", "cost", 4.0)
    ///     .confidence("A", "Cost", Confidence::High);
    ///
    /// let next = matrix.apply(&update);
    /// assert_eq!(next.get("A", "Cost").unwrap().score, Some(4.0));
    /// assert_eq!(next.version(), 1);
    /// assert_eq!(next.apply(&update), next);
    /// ```
    #[must_use]
    pub fn apply(&self, update: &MatrixUpdate) -> Self {
        let mut next = self.clone();
        let mut changed = false;

        for (pair, supplied) in &update.pairs {
            let (Some(option), Some(criterion)) = (
                self.resolve_option(&pair.option),
                self.resolve_criterion(&pair.criterion),
            ) else {
                debug!(pair = %pair, "Skipped update for unknown pair");
                continue;
            };

            let Some(cell) = next
                .cells
                .get_mut(option)
                .and_then(|row| row.get_mut(criterion))
            else {
                continue;
            };

            let merged = merge(cell, supplied, update.scale, self.scale);
            if merged != *cell {
                debug!(option, criterion, "Updated pair");
                *cell = merged;
                changed = true;
            }
        }

        if changed {
            next.version += 1;
        }
        next
    }

    /// Elicitation is finished when every pair is at least `medium`, or when
    /// the caller asks to proceed.
    #[must_use]
    pub fn is_finished(&self, proceed: bool) -> bool {
        proceed || self.pairs().all(|(_, state)| state.confidence.is_settled())
    }

    /// Pairs still below `medium` confidence.
    #[must_use]
    pub fn unresolved_pairs(&self) -> Vec<RatingPair> {
        self.pairs()
            .filter(|(_, state)| !state.confidence.is_settled())
            .map(|(pair, _)| pair)
            .collect()
    }

    /// Fraction of pairs at `medium` or above. An empty matrix is fully covered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage(&self) -> f64 {
        let total = self.pair_count();
        if total == 0 {
            return 1.0;
        }
        let settled = self
            .pairs()
            .filter(|(_, state)| state.confidence.is_settled())
            .count();
        settled as f64 / total as f64
    }

    /// Lowest confidence present; `High` for an empty matrix.
    #[must_use]
    pub fn weakest_confidence(&self) -> Confidence {
        self.pairs()
            .map(|(_, state)| state.confidence)
            .min()
            .unwrap_or(Confidence::High)
    }

    /// Concrete ratings on `scale`, one per pair.
    ///
    /// Unknown scores become `neutral_five_point` (a rating on the 1–5 scale)
    /// converted to `scale`, and are listed as defaulted.
    #[must_use]
    pub fn resolve(&self, scale: RatingScale, neutral_five_point: f64) -> ResolvedRatings {
        let neutral = RatingScale::FivePoint.convert(neutral_five_point, scale);
        let mut ratings = RatingTable::new();
        let mut defaulted_pairs = Vec::new();

        for (pair, state) in self.pairs() {
            let rating = match state.score {
                Some(score) => self.scale.convert(score, scale),
                None => {
                    defaulted_pairs.push(pair.clone());
                    neutral
                }
            };
            ratings
                .entry(pair.option)
                .or_default()
                .insert(pair.criterion, rating);
        }

        if !defaulted_pairs.is_empty() {
            warn!(
                defaulted = defaulted_pairs.len(),
                neutral, "Filled unknown ratings with the neutral default"
            );
        }

        ResolvedRatings {
            ratings,
            scale,
            defaulted_pairs,
        }
    }

    fn resolve_option(&self, name: &str) -> Option<&str> {
        find_by_key(&self.options, name)
    }

    fn resolve_criterion(&self, name: &str) -> Option<&str> {
        find_by_key(&self.criteria, name)
    }
}

/// Merge supplied values into a copy of `cell`.
fn merge(
    cell: &PairState,
    supplied: &PairUpdate,
    from: RatingScale,
    to: RatingScale,
) -> PairState {
    let mut merged = cell.clone();

    if let Some(score) = supplied.score.filter(|s| s.is_finite()) {
        merged.score = Some(to.clamp(from.convert(from.clamp(score), to)));
    }

    if let Some(confidence) = supplied.confidence {
        merged.confidence = merged.confidence.max(confidence);
    }

    if let Some(evidence) = supplied.evidence.as_deref().map(str::trim) {
        let recorded = merged
            .evidence
            .split(EVIDENCE_SEPARATOR)
            .any(|segment| segment == evidence);
        if !evidence.is_empty() && !recorded {
            if !merged.evidence.is_empty() {
                merged.evidence.push_str(EVIDENCE_SEPARATOR);
            }
            merged.evidence.push_str(evidence);
        }
    }

    merged
}

fn find_by_key<'a>(names: &'a [String], name: &str) -> Option<&'a str> {
    let key = normalize_name(name);
    names
        .iter()
        .find(|n| normalize_name(n) == key)
        .map(String::as_str)
}

fn dedup(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if normalize_name(&name).is_empty() || find_by_key(&out, &name).is_some() {
            continue;
        }
        out.push(name);
    }
    out
}

impl Default for RatingMatrix {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), Vec::<String>::new(), RatingScale::default())
    }
}
