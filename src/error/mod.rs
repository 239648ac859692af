//! Error types for the decision engine.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`NormalizeError`]: No JSON could be recovered from model text
//! - [`ScoringError`]: A scoring request was refused
//! - [`DecisionError`]: An edit to a decision was rejected
//! - [`CollaboratorError`]: The generative model could not be reached
//! - [`ConfigError`]: Configuration errors
//!
//! An incomplete rating matrix is deliberately not an error: it is filled with
//! neutral defaults and reported through
//! [`ResolvedRatings`](crate::reconcile::ResolvedRatings).
//!
//! All errors implement `Send + Sync` so they can cross the async boundary of
//! the [`assistant`](crate::assistant).

use thiserror::Error;

/// Top-level application error.
///
/// Wraps every subsystem error for callers that want a single error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Response normalization error.
    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Scoring error.
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Decision editing error.
    #[error("Decision error: {0}")]
    Decision(#[from] DecisionError),

    /// Generative model error.
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Response normalization errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Every extraction strategy failed.
    #[error("No JSON value could be recovered from model output: {excerpt}")]
    MalformedExtractedData {
        /// The first 200 characters of the offending text.
        excerpt: String,
    },
}

/// Scoring engine errors.
///
/// Producing a wrong ranking is worse than refusing to rank, so precondition
/// failures always surface to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// The request cannot produce a meaningful ranking.
    #[error("Invalid scoring request: {reason}")]
    InvalidScoringRequest {
        /// Why the request was refused.
        reason: String,
    },
}

impl ScoringError {
    /// Build an [`ScoringError::InvalidScoringRequest`] from any displayable reason.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidScoringRequest {
            reason: reason.into(),
        }
    }
}

/// Errors raised while editing a [`Decision`](crate::model::Decision).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionError {
    /// A name was empty after normalization.
    #[error("Name must not be empty")]
    EmptyName,

    /// An option with the same normalized name already exists.
    #[error("Duplicate option: {name}")]
    DuplicateOption {
        /// The rejected name.
        name: String,
    },

    /// A criterion with the same normalized name already exists.
    #[error("Duplicate criterion: {name}")]
    DuplicateCriterion {
        /// The rejected name.
        name: String,
    },

    /// No option with this name exists.
    #[error("Unknown option: {name}")]
    UnknownOption {
        /// The name that was looked up.
        name: String,
    },

    /// No criterion with this name exists.
    #[error("Unknown criterion: {name}")]
    UnknownCriterion {
        /// The name that was looked up.
        name: String,
    },

    /// Weight outside 1..=10.
    #[error("Weight for {criterion} must be between 1 and 10, got {weight}")]
    WeightOutOfRange {
        /// The criterion being weighted.
        criterion: String,
        /// The rejected weight.
        weight: u32,
    },

    /// Options, criteria and weights are frozen once weights are locked.
    #[error("Weights are locked; the decision can no longer be edited")]
    WeightsLocked,
}

/// Errors from the generative model collaborator.
///
/// The core never depends on these succeeding; they only reduce how much
/// evidence is available.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The model or its transport failed.
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable {
        /// Description of the failure.
        message: String,
    },

    /// The model did not answer in time.
    #[error("Upstream timed out after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed time in milliseconds.
        elapsed_ms: u64,
    },
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(AppError: Send, Sync, std::error::Error);
    assert_impl_all!(NormalizeError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(ScoringError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(DecisionError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(CollaboratorError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(ConfigError: Send, Sync, std::error::Error, Clone);

    #[test]
    fn test_app_error_display_normalize() {
        let err = AppError::Normalize(NormalizeError::MalformedExtractedData {
            excerpt: "not json".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Normalization error: No JSON value could be recovered from model output: not json"
        );
    }

    #[test]
    fn test_app_error_display_scoring() {
        let err = AppError::Scoring(ScoringError::invalid("at least 2 options are required"));
        assert_eq!(
            err.to_string(),
            "Scoring error: Invalid scoring request: at least 2 options are required"
        );
    }

    #[test]
    fn test_app_error_display_collaborator() {
        let err = AppError::Collaborator(CollaboratorError::UpstreamUnavailable {
            message: "503".to_string(),
        });
        assert_eq!(err.to_string(), "Collaborator error: Upstream unavailable: 503");
    }

    #[test]
    fn test_app_error_from_conversions() {
        let err: AppError = DecisionError::WeightsLocked.into();
        assert!(matches!(err, AppError::Decision(_)));

        let err: AppError = ConfigError::InvalidValue {
            var: "X".to_string(),
            reason: "bad".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Config(_)));

        let err: AppError = CollaboratorError::Timeout { elapsed_ms: 10 }.into();
        assert!(matches!(err, AppError::Collaborator(_)));
    }

    #[test]
    fn test_decision_error_display_weight_out_of_range() {
        let err = DecisionError::WeightOutOfRange {
            criterion: "Cost".to_string(),
            weight: 11,
        };
        assert_eq!(
            err.to_string(),
            "Weight for Cost must be between 1 and 10, got 11"
        );
    }

    #[test]
    fn test_collaborator_error_display_timeout() {
        let err = CollaboratorError::Timeout { elapsed_ms: 30000 };
        assert_eq!(err.to_string(), "Upstream timed out after 30000ms");
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            var: "KEY_DRIVER_SHARE".to_string(),
            reason: "must be in (0, 1]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for KEY_DRIVER_SHARE: must be in (0, 1]"
        );
    }

    #[test]
    fn test_scoring_error_clone_eq() {
        let err = ScoringError::invalid("no criteria");
        assert_eq!(err.clone(), err);
        assert_ne!(err, ScoringError::invalid("one option"));
    }
}
