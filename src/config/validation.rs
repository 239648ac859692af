//! Configuration validation.
//!
//! Ensures every value lies in the range the engine can work with.

use super::Config;
use crate::error::ConfigError;
use crate::model::RatingScale;

/// Maximum number of top drivers that can be requested.
pub const MAX_DRIVERS_LIMIT: usize = 10;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `NEUTRAL_RATING` must lie on the 1–5 scale
/// - `KEY_DRIVER_SHARE` must be in `(0, 1]`
/// - `DRIVER_EPSILON` must not be negative
/// - `MAX_DRIVERS` must be between 1 and 10
/// - `MIN_DESCRIPTION_CHARS` must be at least 1
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if !RatingScale::FivePoint.contains(config.neutral_rating) {
        return Err(ConfigError::InvalidValue {
            var: "NEUTRAL_RATING".into(),
            reason: "must be between 1 and 5".into(),
        });
    }

    let share = config.key_driver_share;
    if share.is_nan() || share <= 0.0 || share > 1.0 {
        return Err(ConfigError::InvalidValue {
            var: "KEY_DRIVER_SHARE".into(),
            reason: "must be in (0, 1]".into(),
        });
    }

    if config.driver_epsilon.is_nan() || config.driver_epsilon < 0.0 {
        return Err(ConfigError::InvalidValue {
            var: "DRIVER_EPSILON".into(),
            reason: "must not be negative".into(),
        });
    }

    if config.max_drivers == 0 || config.max_drivers > MAX_DRIVERS_LIMIT {
        return Err(ConfigError::InvalidValue {
            var: "MAX_DRIVERS".into(),
            reason: format!("must be between 1 and {MAX_DRIVERS_LIMIT}"),
        });
    }

    if config.min_description_chars == 0 {
        return Err(ConfigError::InvalidValue {
            var: "MIN_DESCRIPTION_CHARS".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(())
}
