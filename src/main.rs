//! Decision Core binary entry point.
//!
//! Reads a decision document from the file named by the first argument, or
//! from stdin when there is none, and writes its analysis as JSON to stdout.
//! The document may be wrapped in prose or code fences, or cut short; it is
//! normalized before it is read. All logs go to stderr.
//!
//! Coverage is excluded because the main function only wires the process
//! environment to the library.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::Read;

use decision_core::analysis::{analyze, DecisionAnalysis};
use decision_core::config::Config;
use decision_core::error::AppError;
use decision_core::normalize::extract_json;
use decision_core::scoring::{rank, ScoringInput};

#[cfg_attr(coverage_nightly, coverage(off))]
fn main() {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging to stderr only (stdout is for the analysis)
    tracing_subscriber::fmt()
        .with_env_filter(
            config
                .log_level
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(
        "Configuration loaded: scale={}, max_drivers={}",
        config.rating_scale,
        config.max_drivers
    );

    let text = match read_input() {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to read decision document: {e}");
            std::process::exit(1);
        }
    };

    let analysis = match run(&text, &config) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&analysis) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("Failed to serialize analysis: {e}");
            std::process::exit(1);
        }
    }
}

fn read_input() -> std::io::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn run(text: &str, config: &Config) -> Result<DecisionAnalysis, AppError> {
    let document = extract_json(text)?;
    let input = ScoringInput::from_document(&document, config.rating_scale)?;
    let outcome = rank(&input)?;
    let analysis = analyze(outcome, Vec::new(), &config.analysis_settings());
    tracing::info!(
        winner = analysis.winner.as_deref().unwrap_or("none"),
        tie = analysis.has_tie,
        "Ranked {} options",
        analysis.ranking.len()
    );
    Ok(analysis)
}
