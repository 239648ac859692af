//! Test utilities and mock factories.
//!
//! This module provides shared testing infrastructure:
//! - Mock generative clients with fixed behaviour
//! - Decision fixtures
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::error::CollaboratorError;
use crate::model::{Decision, Polarity, RatingScale};
use crate::scoring::ScoringInput;
use crate::traits::{CompletionResponse, MockGenerativeClient, Usage};

/// Create a mock client that always replies with `response`.
///
/// # Example
///
/// ```ignore
/// let mock = mock_client_success("{\"options\": []}");
/// let result = mock.complete(messages, config).await;
/// assert_eq!(result.unwrap().content, "{\"options\": []}");
/// ```
#[must_use]
pub fn mock_client_success(response: impl Into<String>) -> MockGenerativeClient {
    let response = response.into();
    let mut mock = MockGenerativeClient::new();
    mock.expect_complete().returning(move |_msgs, _config| {
        Ok(CompletionResponse::new(response.clone(), Usage::new(10, 20)))
    });
    mock
}

/// Create a mock client that always fails with `error`.
#[must_use]
pub fn mock_client_error(error: CollaboratorError) -> MockGenerativeClient {
    let mut mock = MockGenerativeClient::new();
    mock.expect_complete()
        .returning(move |_msgs, _config| Err(error.clone()));
    mock
}

/// Create a mock client that fails the test if it is ever called.
#[must_use]
pub fn mock_client_unused() -> MockGenerativeClient {
    let mut mock = MockGenerativeClient::new();
    mock.expect_complete().never();
    mock
}

/// Two options, two criteria, A ahead by one point.
///
/// A scores 26 and B 25 on the 1–5 scale: Cost favours A by 10, Speed favours
/// B by 9.
#[must_use]
pub fn close_race_input() -> ScoringInput {
    ScoringInput::new(["A", "B"], ["Cost", "Speed"])
        .with_scale(RatingScale::FivePoint)
        .with_weight("Cost", 5)
        .with_weight("Speed", 3)
        .with_rating("A", "Cost", 4.0)
        .with_rating("A", "Speed", 2.0)
        .with_rating("B", "Cost", 2.0)
        .with_rating("B", "Speed", 5.0)
}

/// Three cities, three criteria; `Commute` is lower-is-better.
#[must_use]
pub fn city_decision() -> Decision {
    let mut decision =
        Decision::from_names(["Berlin", "Lisbon", "Vienna"], ["Cost", "Weather", "Commute"]);
    decision.set_weight("Cost", 8).unwrap();
    decision.set_weight("Weather", 4).unwrap();
    decision
        .set_polarity("Commute", Polarity::Negative)
        .unwrap();
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rank;
    use crate::traits::{CompletionConfig, GenerativeClient, Message};

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = mock_client_success("hello");
        let response = mock
            .complete(vec![Message::user("hi")], CompletionConfig::new())
            .await
            .unwrap();
        assert_eq!(response.content, "hello");
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = mock_client_error(CollaboratorError::Timeout { elapsed_ms: 5 });
        let result = mock
            .complete(vec![Message::user("hi")], CompletionConfig::new())
            .await;
        assert_eq!(result.unwrap_err(), CollaboratorError::Timeout { elapsed_ms: 5 });
    }

    #[test]
    fn test_close_race_fixture() {
        let outcome = rank(&close_race_input()).unwrap();
        assert_eq!(outcome.winner().unwrap().option, "A");
    }

    #[test]
    fn test_city_fixture() {
        let decision = city_decision();
        assert_eq!(decision.options().len(), 3);
        assert_eq!(decision.weights()["Commute"], 5);
    }
}
