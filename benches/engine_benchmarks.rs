//! Benchmarks for the deterministic core.
//!
//! Run with `cargo bench`.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use decision_core::analysis::{analyze, AnalysisSettings};
use decision_core::model::RatingScale;
use decision_core::normalize::extract_json;
use decision_core::reconcile::{MatrixUpdate, RatingMatrix};
use decision_core::scoring::{rank, ScoringInput};

fn names(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix} {i}")).collect()
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn input(options: usize, criteria: usize) -> ScoringInput {
    let option_names = names("Option", options);
    let criterion_names = names("Criterion", criteria);
    let mut input = ScoringInput::new(option_names.clone(), criterion_names.clone());
    for (j, criterion) in criterion_names.iter().enumerate() {
        input = input.with_weight(criterion.as_str(), (j % 10) as u32 + 1);
        for (i, option) in option_names.iter().enumerate() {
            let rating = ((i * 7 + j * 3) % 10 + 1) as f64;
            input = input.with_rating(option.as_str(), criterion.as_str(), rating);
        }
    }
    input
}

fn bench_normalize(c: &mut Criterion) {
    let document = serde_json::to_string_pretty(&input(8, 8)).unwrap();
    let fenced = format!("Here you go:\n```json\n{document}\n```\nAnything else?");
    let truncated = &document[..document.len() * 2 / 3];

    let mut group = c.benchmark_group("normalize");
    group.bench_function("fenced", |b| b.iter(|| extract_json(black_box(&fenced))));
    group.bench_function("truncated", |b| {
        b.iter(|| extract_json(black_box(truncated)));
    });
    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    for size in [2usize, 8, 32] {
        let request = input(size, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &request, |b, request| {
            b.iter(|| rank(black_box(request)));
        });
    }
    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let outcome = rank(&input(8, 8)).unwrap();
    let settings = AnalysisSettings::default();
    c.bench_function("analyze", |b| {
        b.iter(|| analyze(black_box(outcome.clone()), Vec::new(), &settings));
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let options = names("Option", 8);
    let criteria = names("Criterion", 8);
    let matrix = RatingMatrix::new(options.clone(), criteria.clone(), RatingScale::TenPoint);
    let update = options.iter().fold(MatrixUpdate::new(RatingScale::FivePoint), |update, o| {
        criteria.iter().fold(update, |update, c| {
            update.score(o, c, 4.0).evidence(o, c, "benchmark")
        })
    });

    c.bench_function("apply", |b| b.iter(|| matrix.apply(black_box(&update))));
}

criterion_group!(
    benches,
    bench_normalize,
    bench_scoring,
    bench_analysis,
    bench_reconcile
);
criterion_main!(benches);
