//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with `.env` support)
//! - Configuration validation
//! - Default value handling
//!
//! Every value has a default, so an empty environment is a valid one.
//!
//! # Example
//!
//! ```
//! use decision_core::config::{Config, DEFAULT_KEY_DRIVER_SHARE};
//! use decision_core::model::RatingScale;
//!
//! // Use Config::from_env() in production
//! let config = Config::default();
//!
//! assert_eq!(config.rating_scale, RatingScale::TenPoint);
//! assert_eq!(config.analysis_settings().key_driver_share, DEFAULT_KEY_DRIVER_SHARE);
//! ```

mod validation;

pub use validation::{validate_config, MAX_DRIVERS_LIMIT};

use crate::analysis::AnalysisSettings;
use crate::error::ConfigError;
use crate::model::RatingScale;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default neutral rating, on the 1–5 scale.
pub const DEFAULT_NEUTRAL_RATING: f64 = 3.0;

/// Default share of the gap the key driver must explain.
pub const DEFAULT_KEY_DRIVER_SHARE: f64 = 0.5;

/// Default threshold below which contribution differences are ignored.
pub const DEFAULT_DRIVER_EPSILON: f64 = 0.01;

/// Default number of top drivers reported.
pub const DEFAULT_MAX_DRIVERS: usize = 3;

/// Default minimum description length before the model is consulted.
pub const DEFAULT_MIN_DESCRIPTION_CHARS: usize = 10;

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Log level (error, warn, info, debug, trace) or any tracing filter.
    pub log_level: String,
    /// Scale used when none is declared.
    pub rating_scale: RatingScale,
    /// Rating substituted for unknown pairs, on the 1–5 scale.
    pub neutral_rating: f64,
    /// Share of the winning margin the key driver must explain.
    pub key_driver_share: f64,
    /// Contribution differences at or below this are not drivers.
    pub driver_epsilon: f64,
    /// Number of top drivers reported.
    pub max_drivers: usize,
    /// Descriptions shorter than this are vague without asking the model.
    pub min_description_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            rating_scale: RatingScale::default(),
            neutral_rating: DEFAULT_NEUTRAL_RATING,
            key_driver_share: DEFAULT_KEY_DRIVER_SHARE,
            driver_epsilon: DEFAULT_DRIVER_EPSILON,
            max_drivers: DEFAULT_MAX_DRIVERS,
            min_description_chars: DEFAULT_MIN_DESCRIPTION_CHARS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    /// - `RATING_SCALE`: `five_point` or `ten_point` (default: `ten_point`)
    /// - `NEUTRAL_RATING`: Neutral fallback on the 1–5 scale (default: `3`)
    /// - `KEY_DRIVER_SHARE`: Share of the gap, in `(0, 1]` (default: `0.5`)
    /// - `DRIVER_EPSILON`: Negligible contribution difference (default: `0.01`)
    /// - `MAX_DRIVERS`: Top drivers reported (default: `3`)
    /// - `MIN_DESCRIPTION_CHARS`: Shortest description worth extracting (default: `10`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - a numeric variable does not parse
    /// - `RATING_SCALE` names no known scale
    /// - any value fails validation (see [`validate_config`])
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let rating_scale = match std::env::var("RATING_SCALE") {
            Ok(val) => val.parse().map_err(|e| ConfigError::InvalidValue {
                var: "RATING_SCALE".into(),
                reason: format!("{e}"),
            })?,
            Err(_) => RatingScale::default(),
        };

        let config = Self {
            log_level,
            rating_scale,
            neutral_rating: parse_env_f64("NEUTRAL_RATING", DEFAULT_NEUTRAL_RATING)?,
            key_driver_share: parse_env_f64("KEY_DRIVER_SHARE", DEFAULT_KEY_DRIVER_SHARE)?,
            driver_epsilon: parse_env_f64("DRIVER_EPSILON", DEFAULT_DRIVER_EPSILON)?,
            max_drivers: parse_env_usize("MAX_DRIVERS", DEFAULT_MAX_DRIVERS)?,
            min_description_chars: parse_env_usize(
                "MIN_DESCRIPTION_CHARS",
                DEFAULT_MIN_DESCRIPTION_CHARS,
            )?,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Thresholds for the analyzer.
    #[must_use]
    pub const fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            key_driver_share: self.key_driver_share,
            driver_epsilon: self.driver_epsilon,
            max_drivers: self.max_drivers,
        }
    }
}

/// Parse an environment variable as f64, using a default if not set.
fn parse_env_f64(name: &str, default: f64) -> Result<f64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConfigError::InvalidValue {
                var: name.into(),
                reason: "must be a finite number".into(),
            })
    })
}

/// Parse an environment variable as usize, using a default if not set.
fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to set up a clean test environment.
    fn setup_test_env() {
        for var in [
            "LOG_LEVEL",
            "RATING_SCALE",
            "NEUTRAL_RATING",
            "KEY_DRIVER_SHARE",
            "DRIVER_EPSILON",
            "MAX_DRIVERS",
            "MIN_DESCRIPTION_CHARS",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        setup_test_env();

        let config = Config::from_env().expect("should load config");
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_config_from_env_with_all_vars() {
        setup_test_env();

        env::set_var("LOG_LEVEL", "debug");
        env::set_var("RATING_SCALE", "five_point");
        env::set_var("NEUTRAL_RATING", "2.5");
        env::set_var("KEY_DRIVER_SHARE", "0.75");
        env::set_var("DRIVER_EPSILON", "0.1");
        env::set_var("MAX_DRIVERS", "5");
        env::set_var("MIN_DESCRIPTION_CHARS", "20");

        let config = Config::from_env().expect("should load config");
        setup_test_env();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.rating_scale, RatingScale::FivePoint);
        assert_eq!(config.neutral_rating, 2.5);
        assert_eq!(config.key_driver_share, 0.75);
        assert_eq!(config.driver_epsilon, 0.1);
        assert_eq!(config.max_drivers, 5);
        assert_eq!(config.min_description_chars, 20);
    }

    #[test]
    #[serial]
    fn test_config_invalid_scale() {
        setup_test_env();
        env::set_var("RATING_SCALE", "percent");

        let err = Config::from_env().unwrap_err();
        setup_test_env();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "RATING_SCALE"
        ));
    }

    #[test]
    #[serial]
    fn test_config_invalid_number_format() {
        setup_test_env();
        env::set_var("KEY_DRIVER_SHARE", "half");

        let err = Config::from_env().unwrap_err();
        setup_test_env();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "KEY_DRIVER_SHARE"
        ));
    }

    #[test]
    #[serial]
    fn test_config_rejects_nan() {
        setup_test_env();
        env::set_var("DRIVER_EPSILON", "NaN");

        let err = Config::from_env().unwrap_err();
        setup_test_env();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "DRIVER_EPSILON"
        ));
    }

    #[test]
    #[serial]
    fn test_config_validation_failure() {
        setup_test_env();
        env::set_var("MAX_DRIVERS", "0");

        let err = Config::from_env().unwrap_err();
        setup_test_env();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "MAX_DRIVERS"
        ));
    }

    #[test]
    fn test_analysis_settings_follow_config() {
        let config = Config {
            key_driver_share: 0.8,
            max_drivers: 1,
            ..Config::default()
        };
        let settings = config.analysis_settings();
        assert_eq!(settings.key_driver_share, 0.8);
        assert_eq!(settings.max_drivers, 1);
        assert_eq!(settings.driver_epsilon, DEFAULT_DRIVER_EPSILON);
    }

    #[test]
    fn test_parse_env_usize_invalid() {
        env::set_var("TEST_USIZE_INVALID", "-3");
        let result = parse_env_usize("TEST_USIZE_INVALID", 0);
        assert!(result.is_err());
        env::remove_var("TEST_USIZE_INVALID");
    }

    #[test]
    fn test_parse_env_f64_default() {
        env::remove_var("TEST_F64_MISSING");
        assert_eq!(parse_env_f64("TEST_F64_MISSING", 1.5).unwrap(), 1.5);
    }
}
