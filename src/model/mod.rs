//! Decision data model.
//!
//! - [`Decision`]: the options and criteria of one session, editable until
//!   weights are locked
//! - [`Criterion`]: a weighted decision factor with its [`Polarity`]
//! - [`RatingScale`]: the declared range of a set of ratings
//! - [`Confidence`]: certainty behind a reconciled rating
//!
//! Options have no id; their identity is [`normalize_name`].

mod decision;
mod types;

pub use decision::Decision;
pub use types::{
    display_name, normalize_name, Confidence, Criterion, ParseScaleError, Polarity, RatingPair,
    RatingScale, RatingTable, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT,
};
