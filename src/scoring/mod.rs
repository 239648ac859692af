//! Weighted Sum Model scoring.
//!
//! `score(option) = Σ weight(criterion) × rating(option, criterion)`
//!
//! [`rank`] is a pure, total function over a validated [`ScoringInput`]: no
//! model calls, no randomness, and ties broken only by input order. Requests
//! that cannot produce a meaningful winner are refused with
//! [`ScoringError::InvalidScoringRequest`].

mod parsing;
mod types;

pub use types::{
    ContributionRow, CriterionContribution, RankingEntry, ScoringInput, ScoringOutcome,
};

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::ScoringError;
use crate::model::{normalize_name, Polarity, RatingScale, MAX_WEIGHT, MIN_WEIGHT};

/// Weight of a criterion missing from the weight map.
pub const ABSENT_WEIGHT: u32 = 1;

/// Rating of a pair missing from the rating table.
pub const ABSENT_RATING: f64 = 0.0;

/// Rank options by weighted sum.
///
/// Lookups of weights, ratings and polarity match names by
/// [`normalize_name`], so `"cost"` in the weight map applies to `"Cost"`.
///
/// # Errors
///
/// Returns [`ScoringError::InvalidScoringRequest`] when:
/// - fewer than 2 options or no criteria are given
/// - option or criterion names repeat
/// - two weight, polarity or rating keys normalize to the same name
/// - a weight lies outside 1..=10
/// - a rating is not finite or lies outside the declared scale
///
/// # Examples
///
/// ```
/// use decision_core::model::RatingScale;
/// use decision_core::scoring::{rank, ScoringInput};
///
/// let input = ScoringInput::new(["A", "B"], ["Cost", "Speed"])
///     .with_scale(RatingScale::FivePoint)
///     .with_weight("Cost", 5)
///     .with_weight("Speed", 3)
///     .with_rating("A", "Cost", 4.0)
///     .with_rating("A", "Speed", 2.0)
///     .with_rating("B", "Cost", 2.0)
///     .with_rating("B", "Speed", 5.0);
///
/// let outcome = rank(&input).unwrap();
/// assert_eq!(outcome.pairs(), vec![("A".to_string(), 26.0), ("B".to_string(), 25.0)]);
/// ```
pub fn rank(input: &ScoringInput) -> Result<ScoringOutcome, ScoringError> {
    validate(input)?;

    let weights = weight_lookup(input);
    let polarity: HashMap<String, Polarity> = input
        .polarity
        .iter()
        .map(|(k, v)| (normalize_name(k), *v))
        .collect();
    let ratings = rating_lookup(input);

    let rows: Vec<ContributionRow> = input
        .options
        .iter()
        .map(|option| {
            let option_key = normalize_name(option);
            let contributions: Vec<CriterionContribution> = input
                .criteria
                .iter()
                .map(|criterion| {
                    let criterion_key = normalize_name(criterion);
                    let weight = weights
                        .get(&criterion_key)
                        .copied()
                        .unwrap_or(ABSENT_WEIGHT);
                    let rating = ratings
                        .get(&(option_key.clone(), criterion_key.clone()))
                        .map_or(ABSENT_RATING, |&raw| {
                            polarity
                                .get(&criterion_key)
                                .copied()
                                .unwrap_or_default()
                                .orient(raw, input.scale)
                        });
                    CriterionContribution {
                        criterion: criterion.clone(),
                        weight,
                        rating,
                        contribution: f64::from(weight) * rating,
                    }
                })
                .collect();
            let total = contributions.iter().map(|c| c.contribution).sum();
            ContributionRow {
                option: option.clone(),
                total,
                contributions,
            }
        })
        .collect();

    let mut ordered: Vec<&ContributionRow> = rows.iter().collect();
    // Stable sort: equal totals keep input order.
    ordered.sort_by(|a, b| b.total.total_cmp(&a.total));

    let ranking: Vec<RankingEntry> = ordered
        .iter()
        .map(|row| RankingEntry {
            option: row.option.clone(),
            score: row.total,
            rank: competition_rank(&rows, row.total),
        })
        .collect();

    #[allow(clippy::float_cmp)]
    let tied_winners: Vec<String> = match ranking.first() {
        Some(top) => rows
            .iter()
            .filter(|r| r.total == top.score)
            .map(|r| r.option.clone())
            .collect(),
        None => Vec::new(),
    };
    let has_tie = tied_winners.len() > 1;

    let max_possible_score = input
        .criteria
        .iter()
        .map(|c| {
            let weight = weights
                .get(&normalize_name(c))
                .copied()
                .unwrap_or(ABSENT_WEIGHT);
            f64::from(weight) * input.scale.max()
        })
        .sum();

    debug!(
        options = input.options.len(),
        criteria = input.criteria.len(),
        winner = ranking.first().map_or("none", |e| e.option.as_str()),
        has_tie,
        "Ranked options"
    );

    Ok(ScoringOutcome {
        ranking,
        contributions: rows,
        has_tie,
        tied_winners,
        scale: input.scale,
        max_possible_score,
    })
}

/// 1 + number of options scoring strictly higher.
fn competition_rank(rows: &[ContributionRow], total: f64) -> u32 {
    let higher = rows.iter().filter(|r| r.total > total).count();
    u32::try_from(higher).map_or(u32::MAX, |h| h.saturating_add(1))
}

fn weight_lookup(input: &ScoringInput) -> HashMap<String, u32> {
    input
        .weights
        .iter()
        .map(|(k, v)| (normalize_name(k), *v))
        .collect()
}

fn rating_lookup(input: &ScoringInput) -> HashMap<(String, String), f64> {
    input
        .ratings
        .iter()
        .flat_map(|(option, row)| {
            let option_key = normalize_name(option);
            row.iter()
                .map(move |(criterion, rating)| ((option_key.clone(), normalize_name(criterion)), *rating))
        })
        .collect()
}

fn validate(input: &ScoringInput) -> Result<(), ScoringError> {
    if input.options.len() < 2 {
        return Err(ScoringError::invalid(format!(
            "at least 2 options are required, got {}",
            input.options.len()
        )));
    }
    if input.criteria.is_empty() {
        return Err(ScoringError::invalid("at least 1 criterion is required"));
    }
    ensure_unique("option", &input.options)?;
    ensure_unique("criterion", &input.criteria)?;
    ensure_distinct_keys("weight", input.weights.keys())?;
    ensure_distinct_keys("polarity", input.polarity.keys())?;
    ensure_distinct_keys("rating row", input.ratings.keys())?;
    for (option, row) in &input.ratings {
        ensure_distinct_keys(&format!("rating in row {option}"), row.keys())?;
    }

    for (criterion, weight) in &input.weights {
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(weight) {
            return Err(ScoringError::invalid(format!(
                "weight for {criterion} must be between {MIN_WEIGHT} and {MAX_WEIGHT}, got {weight}"
            )));
        }
    }

    for (option, row) in &input.ratings {
        for (criterion, rating) in row {
            if !input.scale.contains(*rating) {
                return Err(ScoringError::invalid(format!(
                    "rating for {option}/{criterion} must lie on the {} scale, got {rating}",
                    scale_label(input.scale)
                )));
            }
        }
    }

    Ok(())
}

fn ensure_unique(kind: &str, names: &[String]) -> Result<(), ScoringError> {
    let mut seen = HashSet::new();
    for name in names {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(ScoringError::invalid(format!("{kind} name must not be empty")));
        }
        if !seen.insert(key) {
            return Err(ScoringError::invalid(format!("duplicate {kind}: {name}")));
        }
    }
    Ok(())
}

/// Map keys that collapse to one normalized name would make lookups depend on
/// map iteration order.
fn ensure_distinct_keys<'a>(
    kind: &str,
    keys: impl Iterator<Item = &'a String>,
) -> Result<(), ScoringError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(normalize_name(key)) {
            return Err(ScoringError::invalid(format!(
                "{kind} keys collide after normalization: {key}"
            )));
        }
    }
    Ok(())
}

const fn scale_label(scale: RatingScale) -> &'static str {
    match scale {
        RatingScale::FivePoint => "1-5",
        RatingScale::TenPoint => "1-10",
    }
}
