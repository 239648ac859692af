//! Scoring request and result types.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Polarity, RatingScale, RatingTable};

/// Everything the scoring engine needs, with the rating scale declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringInput {
    /// Options in caller order; this order breaks ties.
    pub options: Vec<String>,
    /// Criteria in caller order.
    pub criteria: Vec<String>,
    /// Weight per criterion (1–10). Absent criteria weigh 1.
    #[serde(default)]
    pub weights: HashMap<String, u32>,
    /// Rating per option and criterion. Absent pairs rate 0.
    #[serde(default)]
    pub ratings: RatingTable,
    /// Scale every rating in `ratings` is expressed on.
    #[serde(default)]
    pub scale: RatingScale,
    /// Polarity per criterion. Absent criteria are positive.
    #[serde(default)]
    pub polarity: HashMap<String, Polarity>,
}

impl ScoringInput {
    /// Start a request for the given options and criteria.
    #[must_use]
    pub fn new<O, C>(options: O, criteria: C) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            criteria: criteria.into_iter().map(Into::into).collect(),
            weights: HashMap::new(),
            ratings: RatingTable::new(),
            scale: RatingScale::default(),
            polarity: HashMap::new(),
        }
    }

    /// Declare the rating scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: RatingScale) -> Self {
        self.scale = scale;
        self
    }

    /// Set one criterion's weight.
    #[must_use]
    pub fn with_weight(mut self, criterion: impl Into<String>, weight: u32) -> Self {
        self.weights.insert(criterion.into(), weight);
        self
    }

    /// Set one rating.
    #[must_use]
    pub fn with_rating(
        mut self,
        option: impl Into<String>,
        criterion: impl Into<String>,
        rating: f64,
    ) -> Self {
        self.ratings
            .entry(option.into())
            .or_default()
            .insert(criterion.into(), rating);
        self
    }

    /// Replace the whole rating table.
    #[must_use]
    pub fn with_ratings(mut self, ratings: RatingTable) -> Self {
        self.ratings = ratings;
        self
    }

    /// Set one criterion's polarity.
    #[must_use]
    pub fn with_polarity(mut self, criterion: impl Into<String>, polarity: Polarity) -> Self {
        self.polarity.insert(criterion.into(), polarity);
        self
    }
}

/// One option's place in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RankingEntry {
    /// Option name as given in the request.
    pub option: String,
    /// Weighted sum.
    pub score: f64,
    /// Competition rank: tied options share a rank, the next rank skips.
    pub rank: u32,
}

/// `weight × rating` for one option on one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CriterionContribution {
    /// Criterion name.
    pub criterion: String,
    /// Weight used.
    pub weight: u32,
    /// Rating used, after polarity orientation (0 when absent).
    pub rating: f64,
    /// `weight × rating`.
    pub contribution: f64,
}

/// Per-criterion breakdown of one option's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContributionRow {
    /// Option name.
    pub option: String,
    /// Sum of all contributions.
    pub total: f64,
    /// Contributions in criterion order.
    pub contributions: Vec<CriterionContribution>,
}

impl ContributionRow {
    /// Contribution of one criterion.
    #[must_use]
    pub fn contribution(&self, criterion: &str) -> Option<&CriterionContribution> {
        self.contributions.iter().find(|c| c.criterion == criterion)
    }
}

/// Result of a weighted-sum ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringOutcome {
    /// Options by descending score; ties keep input order.
    pub ranking: Vec<RankingEntry>,
    /// Breakdown per option, in input order.
    pub contributions: Vec<ContributionRow>,
    /// Whether two or more options share the top score.
    pub has_tie: bool,
    /// Every option holding the top score, in input order.
    pub tied_winners: Vec<String>,
    /// Scale the ratings were expressed on.
    pub scale: RatingScale,
    /// Highest score any option could reach: Σ weight × scale max.
    pub max_possible_score: f64,
}

impl ScoringOutcome {
    /// Top-ranked entry.
    #[must_use]
    pub fn winner(&self) -> Option<&RankingEntry> {
        self.ranking.first()
    }

    /// Second-ranked entry.
    #[must_use]
    pub fn runner_up(&self) -> Option<&RankingEntry> {
        self.ranking.get(1)
    }

    /// Contribution row of one option.
    #[must_use]
    pub fn row(&self, option: &str) -> Option<&ContributionRow> {
        self.contributions.iter().find(|r| r.option == option)
    }

    /// Total score of one option.
    #[must_use]
    pub fn score_of(&self, option: &str) -> Option<f64> {
        self.row(option).map(|r| r.total)
    }

    /// `(option, score)` pairs in ranking order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(String, f64)> {
        self.ranking
            .iter()
            .map(|e| (e.option.clone(), e.score))
            .collect()
    }
}
