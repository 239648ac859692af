//! Sensitivity and attribution analysis.
//!
//! Explains why the top-ranked option won, comparing only the winner and the
//! runner-up:
//!
//! - `gap = score(winner) − score(runner-up)`
//! - `delta(c) = contribution(winner, c) − contribution(runner-up, c)`
//!
//! Nothing here calls a model; turning the numbers into prose is left to the
//! caller. With a single ranked option there is nothing to compare and every
//! function returns an empty result.

mod types;

pub use types::{AnalysisSettings, DecisionAnalysis, Driver, FlipPoint, KeyDriver};

use chrono::Utc;
use tracing::debug;

use crate::model::RatingPair;
use crate::scoring::{ContributionRow, ScoringOutcome};

/// Winner row, runner-up row and the gap between them.
fn leaders(outcome: &ScoringOutcome) -> Option<(&ContributionRow, &ContributionRow, f64)> {
    let winner = outcome.row(&outcome.winner()?.option)?;
    let runner_up = outcome.row(&outcome.runner_up()?.option)?;
    Some((winner, runner_up, winner.total - runner_up.total))
}

/// `(criterion, delta)` for every criterion, in criterion order.
///
/// Returns `None` when there is no runner-up.
#[must_use]
pub fn criterion_deltas(outcome: &ScoringOutcome) -> Option<Vec<(String, f64)>> {
    let (winner, runner_up, _) = leaders(outcome)?;
    Some(
        winner
            .contributions
            .iter()
            .map(|c| {
                let other = runner_up
                    .contribution(&c.criterion)
                    .map_or(0.0, |r| r.contribution);
                (c.criterion.clone(), c.contribution - other)
            })
            .collect(),
    )
}

/// The criterion with the largest `|delta|`, if it explains at least `share`
/// of the gap.
///
/// A tied top score has no margin to explain and yields `None`. Among equal
/// `|delta|` values the earliest criterion wins.
///
/// # Examples
///
/// ```
/// use decision_core::analysis::key_driver;
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
/// let driver = key_driver(&rank(&input).unwrap(), 0.5).unwrap();
/// assert_eq!(driver.criterion, "Cost");
/// assert_eq!(driver.delta, 10.0);
/// ```
#[must_use]
pub fn key_driver(outcome: &ScoringOutcome, share: f64) -> Option<KeyDriver> {
    let (_, _, gap) = leaders(outcome)?;
    if gap <= 0.0 {
        return None;
    }

    let deltas = criterion_deltas(outcome)?;
    let (criterion, delta) = deltas.into_iter().fold(None, |best, (name, delta)| match best {
        Some((_, best_delta)) if f64::abs(best_delta) >= delta.abs() => best,
        _ => Some((name, delta)),
    })?;

    if delta.abs() < share * gap {
        debug!(criterion, delta, gap, "No single criterion dominates the gap");
        return None;
    }

    Some(KeyDriver {
        criterion,
        delta,
        percent_of_gap: delta.abs() / gap * 100.0,
    })
}

/// Criteria with `|delta| > epsilon`, largest first, at most `max` of them.
#[must_use]
pub fn top_drivers(outcome: &ScoringOutcome, epsilon: f64, max: usize) -> Vec<Driver> {
    let Some((winner, runner_up, _)) = leaders(outcome) else {
        return Vec::new();
    };
    let Some(deltas) = criterion_deltas(outcome) else {
        return Vec::new();
    };

    let mut drivers: Vec<Driver> = deltas
        .into_iter()
        .filter(|(_, delta)| delta.abs() > epsilon)
        .map(|(criterion, delta)| Driver {
            criterion,
            delta,
            favours: if delta > 0.0 {
                winner.option.clone()
            } else {
                runner_up.option.clone()
            },
        })
        .collect();
    drivers.sort_by(|a, b| b.delta.abs().total_cmp(&a.delta.abs()));
    drivers.truncate(max);
    drivers
}

/// Weights at which changing one criterion alone would tie the leaders.
///
/// Changing weight `w` by `Δw` moves the gap by `Δw × (r_winner − r_runner_up)`,
/// so the flip weight is `w − gap / rating_diff`. Only flip weights inside the
/// 1–10 weight range are reported, and a tie has none.
#[must_use]
pub fn flip_points(outcome: &ScoringOutcome) -> Vec<FlipPoint> {
    let Some((winner, runner_up, gap)) = leaders(outcome) else {
        return Vec::new();
    };
    if gap <= 0.0 {
        return Vec::new();
    }

    let min = f64::from(crate::model::MIN_WEIGHT);
    let max = f64::from(crate::model::MAX_WEIGHT);

    winner
        .contributions
        .iter()
        .filter_map(|c| {
            let other = runner_up.contribution(&c.criterion)?;
            let rating_diff = c.rating - other.rating;
            if rating_diff == 0.0 {
                return None;
            }
            let weight_change = -gap / rating_diff;
            let flip_weight = f64::from(c.weight) + weight_change;
            (min..=max).contains(&flip_weight).then(|| FlipPoint {
                criterion: c.criterion.clone(),
                current_weight: c.weight,
                flip_weight,
                weight_change,
            })
        })
        .collect()
}

/// Assemble the full hand-off for the explanation layer.
///
/// `defaulted_pairs` lists ratings that were filled with the neutral default;
/// any entry sets `reduced_confidence`.
#[must_use]
pub fn analyze(
    outcome: ScoringOutcome,
    defaulted_pairs: Vec<RatingPair>,
    settings: &AnalysisSettings,
) -> DecisionAnalysis {
    let gap = leaders(&outcome).map(|(_, _, gap)| gap);
    let key = key_driver(&outcome, settings.key_driver_share);
    let drivers = top_drivers(&outcome, settings.driver_epsilon, settings.max_drivers);
    let flips = flip_points(&outcome);

    debug!(
        key_driver = key.as_ref().map_or("none", |k| k.criterion.as_str()),
        drivers = drivers.len(),
        flip_points = flips.len(),
        defaulted = defaulted_pairs.len(),
        "Analyzed ranking"
    );

    DecisionAnalysis {
        winner: outcome.winner().map(|e| e.option.clone()),
        runner_up: outcome.runner_up().map(|e| e.option.clone()),
        gap,
        has_tie: outcome.has_tie,
        tied_winners: outcome.tied_winners,
        key_driver: key,
        top_drivers: drivers,
        flip_points: flips,
        max_possible_score: outcome.max_possible_score,
        scale: outcome.scale,
        reduced_confidence: !defaulted_pairs.is_empty(),
        defaulted_pairs,
        ranking: outcome.ranking,
        contributions: outcome.contributions,
        computed_at: Utc::now(),
    }
}
