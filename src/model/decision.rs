//! The editable decision: options under comparison and the criteria that
//! matter, up to the point where weights are locked.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{
    display_name, normalize_name, Criterion, Polarity, RatingScale, RatingTable, MAX_WEIGHT,
    MIN_WEIGHT,
};
use crate::error::DecisionError;
use crate::scoring::ScoringInput;

/// Options and criteria of one decision session.
///
/// Identity of both options and criteria is the [`normalize_name`] key; there
/// are no separate ids, so renaming is a remove followed by an add. Removed
/// options are kept aside and can be restored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    options: Vec<String>,
    removed_options: Vec<String>,
    criteria: Vec<Criterion>,
    weights_locked: bool,
}

impl Decision {
    /// Create an empty decision.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a decision from extracted names, skipping duplicates and blanks.
    #[must_use]
    pub fn from_names<O, C>(options: O, criteria: C) -> Self
    where
        O: IntoIterator,
        O::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let mut decision = Self::new();
        for option in options {
            if let Err(e) = decision.add_option(option.as_ref()) {
                debug!(option = option.as_ref(), error = %e, "Skipping option");
            }
        }
        for criterion in criteria {
            if let Err(e) = decision.add_criterion(criterion.as_ref()) {
                debug!(criterion = criterion.as_ref(), error = %e, "Skipping criterion");
            }
        }
        decision
    }

    /// Active options in insertion order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Options removed by the user that can still be restored.
    #[must_use]
    pub fn removed_options(&self) -> &[String] {
        &self.removed_options
    }

    /// Criteria in insertion order.
    #[must_use]
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Criterion display names in insertion order.
    #[must_use]
    pub fn criterion_names(&self) -> Vec<String> {
        self.criteria.iter().map(|c| c.name.clone()).collect()
    }

    /// Weight per criterion name.
    #[must_use]
    pub fn weights(&self) -> HashMap<String, u32> {
        self.criteria
            .iter()
            .map(|c| (c.name.clone(), c.weight))
            .collect()
    }

    /// Polarity per criterion name.
    #[must_use]
    pub fn polarities(&self) -> HashMap<String, Polarity> {
        self.criteria
            .iter()
            .map(|c| (c.name.clone(), c.polarity))
            .collect()
    }

    /// Whether weights (and with them the option/criterion sets) are frozen.
    #[must_use]
    pub const fn weights_locked(&self) -> bool {
        self.weights_locked
    }

    /// Look up an option by any spelling of its name.
    #[must_use]
    pub fn find_option(&self, name: &str) -> Option<&str> {
        let key = normalize_name(name);
        self.options
            .iter()
            .find(|o| normalize_name(o) == key)
            .map(String::as_str)
    }

    /// Look up a criterion by any spelling of its name.
    #[must_use]
    pub fn find_criterion(&self, name: &str) -> Option<&Criterion> {
        let key = normalize_name(name);
        self.criteria.iter().find(|c| c.key() == key)
    }

    /// Add an option.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::EmptyName`], [`DecisionError::DuplicateOption`]
    /// or [`DecisionError::WeightsLocked`].
    pub fn add_option(&mut self, name: &str) -> Result<(), DecisionError> {
        self.ensure_editable()?;
        let name = display_name(name);
        if name.is_empty() {
            return Err(DecisionError::EmptyName);
        }
        if self.find_option(&name).is_some() {
            return Err(DecisionError::DuplicateOption { name });
        }
        self.options.push(name);
        Ok(())
    }

    /// Remove an option, keeping it restorable.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::UnknownOption`] or [`DecisionError::WeightsLocked`].
    pub fn remove_option(&mut self, name: &str) -> Result<String, DecisionError> {
        self.ensure_editable()?;
        let key = normalize_name(name);
        let index = self
            .options
            .iter()
            .position(|o| normalize_name(o) == key)
            .ok_or_else(|| DecisionError::UnknownOption {
                name: name.to_string(),
            })?;
        let removed = self.options.remove(index);
        self.removed_options.retain(|o| normalize_name(o) != key);
        self.removed_options.push(removed.clone());
        Ok(removed)
    }

    /// Bring back a previously removed option.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::UnknownOption`] if it was never removed,
    /// [`DecisionError::DuplicateOption`] if an option with the same name was
    /// added since, or [`DecisionError::WeightsLocked`].
    pub fn restore_option(&mut self, name: &str) -> Result<(), DecisionError> {
        self.ensure_editable()?;
        let key = normalize_name(name);
        let index = self
            .removed_options
            .iter()
            .position(|o| normalize_name(o) == key)
            .ok_or_else(|| DecisionError::UnknownOption {
                name: name.to_string(),
            })?;
        if self.find_option(name).is_some() {
            return Err(DecisionError::DuplicateOption {
                name: name.to_string(),
            });
        }
        let restored = self.removed_options.remove(index);
        self.options.push(restored);
        Ok(())
    }

    /// Rename an option: remove the old name, add the new one.
    ///
    /// The decision is left unchanged if the new name is rejected.
    ///
    /// # Errors
    ///
    /// Any error of [`Decision::remove_option`] or [`Decision::add_option`].
    pub fn rename_option(&mut self, from: &str, to: &str) -> Result<(), DecisionError> {
        let snapshot = self.clone();
        self.remove_option(from)?;
        if let Err(e) = self.add_option(to) {
            *self = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Add a criterion with the default weight.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::EmptyName`], [`DecisionError::DuplicateCriterion`]
    /// or [`DecisionError::WeightsLocked`].
    pub fn add_criterion(&mut self, name: &str) -> Result<(), DecisionError> {
        self.ensure_editable()?;
        let name = display_name(name);
        if name.is_empty() {
            return Err(DecisionError::EmptyName);
        }
        if self.find_criterion(&name).is_some() {
            return Err(DecisionError::DuplicateCriterion { name });
        }
        self.criteria.push(Criterion::new(name));
        Ok(())
    }

    /// Remove a criterion together with its weight.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::UnknownCriterion`] or [`DecisionError::WeightsLocked`].
    pub fn remove_criterion(&mut self, name: &str) -> Result<Criterion, DecisionError> {
        self.ensure_editable()?;
        let key = normalize_name(name);
        let index = self
            .criteria
            .iter()
            .position(|c| c.key() == key)
            .ok_or_else(|| DecisionError::UnknownCriterion {
                name: name.to_string(),
            })?;
        Ok(self.criteria.remove(index))
    }

    /// Set a criterion's weight.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::WeightOutOfRange`] outside 1..=10,
    /// [`DecisionError::UnknownCriterion`] or [`DecisionError::WeightsLocked`].
    pub fn set_weight(&mut self, name: &str, weight: u32) -> Result<(), DecisionError> {
        self.ensure_editable()?;
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
            return Err(DecisionError::WeightOutOfRange {
                criterion: name.to_string(),
                weight,
            });
        }
        self.criterion_mut(name)?.weight = weight;
        Ok(())
    }

    /// Mark a criterion as "higher is better" or "lower is better".
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::UnknownCriterion`] or [`DecisionError::WeightsLocked`].
    pub fn set_polarity(&mut self, name: &str, polarity: Polarity) -> Result<(), DecisionError> {
        self.ensure_editable()?;
        self.criterion_mut(name)?.polarity = polarity;
        Ok(())
    }

    /// Freeze the decision. Ratings are elicited against the locked shape.
    pub fn lock_weights(&mut self) {
        self.weights_locked = true;
    }

    /// Assemble a scoring request from this decision and a rating table.
    #[must_use]
    pub fn scoring_input(&self, ratings: RatingTable, scale: RatingScale) -> ScoringInput {
        ScoringInput {
            options: self.options.clone(),
            criteria: self.criterion_names(),
            weights: self.weights(),
            ratings,
            scale,
            polarity: self.polarities(),
        }
    }

    fn criterion_mut(&mut self, name: &str) -> Result<&mut Criterion, DecisionError> {
        let key = normalize_name(name);
        self.criteria
            .iter_mut()
            .find(|c| c.key() == key)
            .ok_or_else(|| DecisionError::UnknownCriterion {
                name: name.to_string(),
            })
    }

    fn ensure_editable(&self) -> Result<(), DecisionError> {
        if self.weights_locked {
            return Err(DecisionError::WeightsLocked);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_WEIGHT;
    use pretty_assertions::assert_eq;

    fn sample() -> Decision {
        Decision::from_names(["Laptop A", "Laptop B"], ["Price", "Battery"])
    }

    #[test]
    fn test_from_names_skips_duplicates_and_blanks() {
        let decision = Decision::from_names(["A", "a", " ", "B"], ["Cost", "COST"]);
        assert_eq!(decision.options(), &["A".to_string(), "B".to_string()]);
        assert_eq!(decision.criterion_names(), vec!["Cost".to_string()]);
    }

    #[test]
    fn test_add_option_duplicate_is_case_insensitive() {
        let mut decision = sample();
        let err = decision.add_option("laptop a").unwrap_err();
        assert!(matches!(err, DecisionError::DuplicateOption { .. }));
    }

    #[test]
    fn test_remove_and_restore_option() {
        let mut decision = sample();
        let removed = decision.remove_option("LAPTOP A").unwrap();
        assert_eq!(removed, "Laptop A");
        assert_eq!(decision.options(), &["Laptop B".to_string()]);
        assert_eq!(decision.removed_options(), &["Laptop A".to_string()]);

        decision.restore_option("laptop a").unwrap();
        assert_eq!(decision.options().len(), 2);
        assert!(decision.removed_options().is_empty());
    }

    #[test]
    fn test_restore_unknown_option_fails() {
        let mut decision = sample();
        let err = decision.restore_option("Laptop C").unwrap_err();
        assert!(matches!(err, DecisionError::UnknownOption { .. }));
    }

    #[test]
    fn test_restore_conflicting_option_fails() {
        let mut decision = sample();
        decision.remove_option("Laptop A").unwrap();
        decision.add_option("laptop a").unwrap();
        let err = decision.restore_option("Laptop A").unwrap_err();
        assert!(matches!(err, DecisionError::DuplicateOption { .. }));
    }

    #[test]
    fn test_removing_readded_option_keeps_one_entry() {
        let mut decision = sample();
        decision.remove_option("Laptop A").unwrap();
        decision.add_option("laptop a").unwrap();
        decision.remove_option("Laptop A").unwrap();
        assert_eq!(decision.removed_options(), &["laptop a".to_string()]);

        decision.restore_option("LAPTOP A").unwrap();
        assert!(decision.removed_options().is_empty());
        assert_eq!(
            decision.options(),
            &["Laptop B".to_string(), "laptop a".to_string()]
        );
    }

    #[test]
    fn test_rename_option_is_remove_plus_add() {
        let mut decision = sample();
        decision.rename_option("Laptop A", "Laptop C").unwrap();
        assert_eq!(
            decision.options(),
            &["Laptop B".to_string(), "Laptop C".to_string()]
        );
        assert_eq!(decision.removed_options(), &["Laptop A".to_string()]);
    }

    #[test]
    fn test_rename_option_rolls_back_on_conflict() {
        let mut decision = sample();
        let before = decision.clone();
        let err = decision.rename_option("Laptop A", "laptop b").unwrap_err();
        assert!(matches!(err, DecisionError::DuplicateOption { .. }));
        assert_eq!(decision, before);
    }

    #[test]
    fn test_criterion_defaults_and_weights() {
        let mut decision = sample();
        assert_eq!(decision.weights()["Price"], DEFAULT_WEIGHT);

        decision.set_weight("price", 9).unwrap();
        assert_eq!(decision.weights()["Price"], 9);
    }

    #[test]
    fn test_set_weight_out_of_range() {
        let mut decision = sample();
        for weight in [0, 11] {
            let err = decision.set_weight("Price", weight).unwrap_err();
            assert!(matches!(err, DecisionError::WeightOutOfRange { .. }));
        }
    }

    #[test]
    fn test_remove_criterion_drops_weight() {
        let mut decision = sample();
        decision.remove_criterion("Battery").unwrap();
        assert!(!decision.weights().contains_key("Battery"));
    }

    #[test]
    fn test_lock_weights_freezes_edits() {
        let mut decision = sample();
        decision.lock_weights();
        assert!(decision.weights_locked());
        assert_eq!(
            decision.set_weight("Price", 3),
            Err(DecisionError::WeightsLocked)
        );
        assert_eq!(decision.add_option("C"), Err(DecisionError::WeightsLocked));
        assert_eq!(
            decision.set_polarity("Price", Polarity::Negative),
            Err(DecisionError::WeightsLocked)
        );
    }

    #[test]
    fn test_scoring_input_carries_polarity() {
        let mut decision = sample();
        decision.set_polarity("Price", Polarity::Negative).unwrap();
        let input = decision.scoring_input(RatingTable::new(), RatingScale::FivePoint);
        assert_eq!(input.polarity["Price"], Polarity::Negative);
        assert_eq!(input.options.len(), 2);
        assert_eq!(input.scale, RatingScale::FivePoint);
    }
}
