//! Sensitivity and attribution result types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{RatingPair, RatingScale};
use crate::scoring::{ContributionRow, RankingEntry};

// ============================================================================
// Settings
// ============================================================================

/// Thresholds applied by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Share of the winning margin a criterion must explain to be the key driver.
    pub key_driver_share: f64,
    /// Contribution differences at or below this are ignored by top drivers.
    pub driver_epsilon: f64,
    /// Number of top drivers reported.
    pub max_drivers: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            key_driver_share: 0.5,
            driver_epsilon: 0.01,
            max_drivers: 3,
        }
    }
}

// ============================================================================
// Attribution
// ============================================================================

/// The criterion that explains most of the winner's margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeyDriver {
    /// Criterion name.
    pub criterion: String,
    /// `contribution(winner) − contribution(runner-up)`.
    pub delta: f64,
    /// `|delta| / gap × 100`.
    pub percent_of_gap: f64,
}

/// A criterion on which winner and runner-up differ noticeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Driver {
    /// Criterion name.
    pub criterion: String,
    /// `contribution(winner) − contribution(runner-up)`.
    pub delta: f64,
    /// The option this criterion favours.
    pub favours: String,
}

/// Weight at which a criterion alone would close the winning margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlipPoint {
    /// Criterion name.
    pub criterion: String,
    /// Weight currently assigned.
    pub current_weight: u32,
    /// Weight at which winner and runner-up would tie.
    pub flip_weight: f64,
    /// `flip_weight − current_weight`.
    pub weight_change: f64,
}

// ============================================================================
// Hand-off
// ============================================================================

/// Everything the explanation layer needs, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionAnalysis {
    /// Options by descending score.
    pub ranking: Vec<RankingEntry>,
    /// Top-ranked option.
    pub winner: Option<String>,
    /// Second-ranked option.
    pub runner_up: Option<String>,
    /// `score(winner) − score(runner-up)`.
    pub gap: Option<f64>,
    /// Whether the top score is shared.
    pub has_tie: bool,
    /// Options sharing the top score, in input order.
    pub tied_winners: Vec<String>,
    /// Dominant criterion, when one explains enough of the gap.
    pub key_driver: Option<KeyDriver>,
    /// Largest contribution differences between winner and runner-up.
    pub top_drivers: Vec<Driver>,
    /// Weights at which the runner-up would catch up.
    pub flip_points: Vec<FlipPoint>,
    /// Per-option breakdown in input order.
    pub contributions: Vec<ContributionRow>,
    /// Σ weight × scale max.
    pub max_possible_score: f64,
    /// Scale the ratings were expressed on.
    pub scale: RatingScale,
    /// Pairs that had no reconciled score and were filled with the neutral rating.
    pub defaulted_pairs: Vec<RatingPair>,
    /// True when any pair was defaulted.
    pub reduced_confidence: bool,
    /// When the analysis was produced.
    pub computed_at: DateTime<Utc>,
}
