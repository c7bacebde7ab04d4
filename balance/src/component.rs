//! Chemical components and the coefficient mutator.

use serde::{Deserialize, Serialize};

use crate::composition::{validate_composition, ElementCounts};
use crate::error::ModelError;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Smallest coefficient a player can set.
pub const MIN_COEFFICIENT: u32 = 1;
/// Largest coefficient a player can set.
pub const MAX_COEFFICIENT: u32 = 9;

/// One chemical species on one side of a reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Component {
    /// Stable identifier within the level
    pub id: String,
    /// Display formula, e.g. "H₂O"
    pub formula: String,
    /// Atoms in one unit of this species
    pub composition: ElementCounts,
    /// Multiplier adjusted by the player, always in 1..=9
    pub coefficient: u32,
}

impl Component {
    /// Create a component with coefficient 1.
    pub fn new(
        id: impl Into<String>,
        formula: impl Into<String>,
        composition: ElementCounts,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        let formula = formula.into();
        if formula.trim().is_empty() {
            return Err(ModelError::EmptyFormula(id));
        }
        validate_composition(&formula, &composition)?;
        Ok(Self {
            id,
            formula,
            composition,
            coefficient: MIN_COEFFICIENT,
        })
    }

    /// Copy of this component with `delta` applied to the coefficient.
    ///
    /// The result is clamped to `MIN_COEFFICIENT..=MAX_COEFFICIENT` for any delta.
    pub fn adjusted(&self, delta: i32) -> Self {
        let mut next = self.clone();
        next.adjust(delta);
        next
    }

    /// Apply `delta` in place, clamped.
    pub fn adjust(&mut self, delta: i32) {
        let target = i64::from(self.coefficient) + i64::from(delta);
        self.coefficient =
            target.clamp(i64::from(MIN_COEFFICIENT), i64::from(MAX_COEFFICIENT)) as u32;
    }

    /// Atoms of `symbol` contributed at the current coefficient.
    pub fn contribution(&self, symbol: &str) -> u32 {
        self.composition.get(symbol).saturating_mul(self.coefficient)
    }

    /// Formula with its coefficient prefix, omitted when it is 1.
    pub fn term(&self) -> String {
        if self.coefficient == 1 {
            self.formula.clone()
        } else {
            format!("{} {}", self.coefficient, self.formula)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oxygen() -> Component {
        Component::new("r2", "O₂", ElementCounts::from_pairs([("O", 2)])).unwrap()
    }

    #[test]
    fn test_new_starts_at_one() {
        let o2 = oxygen();
        assert_eq!(o2.coefficient, 1);
        assert_eq!(o2.contribution("O"), 2);
        assert_eq!(o2.contribution("H"), 0);
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(Component::new("x", "", ElementCounts::from_pairs([("O", 2)])).is_err());
        assert!(Component::new("x", "Nothing", ElementCounts::new()).is_err());
    }

    #[test]
    fn test_adjust_clamps() {
        let mut o2 = oxygen();
        o2.adjust(-1);
        assert_eq!(o2.coefficient, 1);
        o2.adjust(4);
        assert_eq!(o2.coefficient, 5);
        o2.adjust(100);
        assert_eq!(o2.coefficient, MAX_COEFFICIENT);
        o2.adjust(1);
        assert_eq!(o2.coefficient, MAX_COEFFICIENT);
    }

    #[test]
    fn test_adjust_extreme_deltas() {
        let o2 = oxygen();
        assert_eq!(o2.adjusted(i32::MAX).coefficient, MAX_COEFFICIENT);
        assert_eq!(o2.adjusted(i32::MIN).coefficient, MIN_COEFFICIENT);
        for delta in -20..=20 {
            let c = o2.adjusted(delta).coefficient;
            assert!((MIN_COEFFICIENT..=MAX_COEFFICIENT).contains(&c));
        }
    }

    #[test]
    fn test_adjusted_leaves_original() {
        let o2 = oxygen();
        let more = o2.adjusted(2);
        assert_eq!(o2.coefficient, 1);
        assert_eq!(more.coefficient, 3);
        assert_eq!(more.contribution("O"), 6);
    }

    #[test]
    fn test_term() {
        let mut o2 = oxygen();
        assert_eq!(o2.term(), "O₂");
        o2.adjust(2);
        assert_eq!(o2.term(), "3 O₂");
    }
}
