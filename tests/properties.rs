//! Property tests across the public pipeline.
//!
//! - Decision documents survive prose wrapping and rank identically
//! - The per-criterion deltas always account for the whole gap
//! - Drivers and flip points stay within their documented bounds

#![allow(clippy::expect_used, clippy::unwrap_used)]

use decision_core::analysis::{criterion_deltas, flip_points, top_drivers};
use decision_core::model::{RatingScale, MAX_WEIGHT, MIN_WEIGHT};
use decision_core::normalize::extract_json;
use decision_core::scoring::{rank, ScoringInput};
use proptest::prelude::*;

const OPTIONS: [&str; 5] = ["Berlin", "Lisbon", "Vienna", "Oslo", "Porto"];
const CRITERIA: [&str; 4] = ["Cost", "Weather", "Commute", "Culture"];

fn arb_input() -> impl Strategy<Value = ScoringInput> {
    (2..=OPTIONS.len(), 1..=CRITERIA.len()).prop_flat_map(|(n_options, n_criteria)| {
        (
            prop::collection::vec(MIN_WEIGHT..=MAX_WEIGHT, n_criteria),
            prop::collection::vec(1u8..=10, n_options * n_criteria),
        )
            .prop_map(move |(weights, ratings)| {
                let options = &OPTIONS[..n_options];
                let criteria = &CRITERIA[..n_criteria];
                let mut input = ScoringInput::new(options.iter().copied(), criteria.iter().copied())
                    .with_scale(RatingScale::TenPoint);
                for (criterion, weight) in criteria.iter().zip(&weights) {
                    input = input.with_weight(*criterion, *weight);
                }
                for (i, option) in options.iter().enumerate() {
                    for (j, criterion) in criteria.iter().enumerate() {
                        let rating = f64::from(ratings[i * n_criteria + j]);
                        input = input.with_rating(*option, *criterion, rating);
                    }
                }
                input
            })
    })
}

proptest! {
    #[test]
    fn prop_wrapped_document_ranks_identically(input in arb_input()) {
        let json = serde_json::to_string_pretty(&input).unwrap();
        let text = format!("Here is the decision you asked for:\n```json\n{json}\n```\nGood luck!");

        let document = extract_json(&text).unwrap();
        let parsed = ScoringInput::from_document(&document, RatingScale::FivePoint).unwrap();

        prop_assert_eq!(&parsed, &input);
        prop_assert_eq!(rank(&parsed).unwrap(), rank(&input).unwrap());
    }

    #[test]
    fn prop_deltas_sum_to_gap(input in arb_input()) {
        let outcome = rank(&input).unwrap();
        let gap = outcome.ranking[0].score - outcome.ranking[1].score;
        let total: f64 = criterion_deltas(&outcome).unwrap().iter().map(|(_, d)| d).sum();
        prop_assert!((total - gap).abs() < 1e-9);
    }

    #[test]
    fn prop_top_drivers_bounded_and_sorted(input in arb_input(), max in 1usize..=4) {
        let outcome = rank(&input).unwrap();
        let drivers = top_drivers(&outcome, 0.01, max);

        prop_assert!(drivers.len() <= max);
        for pair in drivers.windows(2) {
            prop_assert!(pair[0].delta.abs() >= pair[1].delta.abs());
        }
        for driver in &drivers {
            prop_assert!(driver.delta.abs() > 0.01);
        }
    }

    #[test]
    fn prop_flip_points_close_the_gap(input in arb_input()) {
        let outcome = rank(&input).unwrap();
        let winner = outcome.row(&outcome.ranking[0].option).unwrap().clone();
        let runner_up = outcome.row(&outcome.ranking[1].option).unwrap().clone();

        for flip in flip_points(&outcome) {
            prop_assert!(flip.flip_weight >= f64::from(MIN_WEIGHT));
            prop_assert!(flip.flip_weight <= f64::from(MAX_WEIGHT));

            // Re-weighting the criterion to the flip weight ties the leaders
            let rating_diff = winner.contribution(&flip.criterion).unwrap().rating
                - runner_up.contribution(&flip.criterion).unwrap().rating;
            let new_gap = (winner.total - runner_up.total) + flip.weight_change * rating_diff;
            prop_assert!(new_gap.abs() < 1e-9);
        }
    }
}
