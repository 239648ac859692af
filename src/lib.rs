//! Decision Core
//!
//! A deterministic multi-criteria decision engine. Options are rated against
//! weighted criteria, ranked with a weighted-sum model and the ranking is
//! explained: which criterion drove it and how far a weight would have to move
//! to change it.
//!
//! # Features
//!
//! - Recovery of JSON payloads from generative-model text, including truncated output
//! - Versioned rating matrix reconciled from partial, noisy updates
//! - Weighted-sum ranking with stable tie handling and competition ranks
//! - Key driver, top drivers and flip points for every ranking
//! - Optional generative collaborator behind a single mockable trait
//!
//! # Quick Start
//!
//! ```bash
//! echo '{"options":["A","B"],"criteria":["Cost"],"ratings":{"A":{"Cost":7},"B":{"Cost":4}}}' \
//!   | ./decision-core
//! ```
//!
//! # Architecture
//!
//! ```text
//!  model text ──▶ normalize ──▶ reconcile ──▶ scoring ──▶ analysis ──▶ DecisionAnalysis
//!                    ▲              ▲
//!                    │              │
//!              extraction      elicitation
//!                    ▲              ▲
//!                    └── assistant ─┘ ◀──▶ GenerativeClient
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod assistant;
pub mod config;
pub mod elicitation;
pub mod error;
pub mod extraction;
pub mod model;
pub mod normalize;
pub mod prompts;
pub mod reconcile;
pub mod scoring;
pub mod traits;

#[cfg(test)]
mod test_utils;
