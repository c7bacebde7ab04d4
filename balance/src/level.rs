//! Reactions (levels) and their metadata.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::{Component, MAX_COEFFICIENT, MIN_COEFFICIENT};
use crate::error::ModelError;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Difficulty tag shown on the level card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum Difficulty {
    #[serde(alias = "Facile", alias = "easy")]
    Easy,
    #[serde(alias = "Moyen", alias = "medium")]
    Medium,
    #[serde(alias = "Difficile", alias = "hard")]
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the reaction arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Reactants,
    Products,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Reactants => "reactants",
            Side::Products => "products",
        }
    }
}

/// One puzzle: reactants, products and the card shown above them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Level {
    pub id: String,
    pub name: String,
    /// Fun fact or context about the reaction
    pub description: String,
    pub difficulty: Difficulty,
    /// Display order only
    pub reactants: Vec<Component>,
    /// Display order only
    pub products: Vec<Component>,
}

impl Level {
    /// Check the structural invariants of a level.
    ///
    /// Component compositions and coefficients are checked again here
    /// because levels can arrive through deserialization rather than
    /// [`Component::new`].
    pub fn validate(&self) -> Result<(), ModelError> {
        for side in [Side::Reactants, Side::Products] {
            if self.side(side).is_empty() {
                return Err(ModelError::EmptySide {
                    level: self.name.clone(),
                    side: side.label(),
                });
            }
        }

        let mut seen = HashSet::new();
        for component in self.reactants.iter().chain(&self.products) {
            if !seen.insert(component.id.as_str()) {
                return Err(ModelError::DuplicateComponent {
                    level: self.name.clone(),
                    id: component.id.clone(),
                });
            }
            if component.formula.trim().is_empty() {
                return Err(ModelError::EmptyFormula(component.id.clone()));
            }
            if !(MIN_COEFFICIENT..=MAX_COEFFICIENT).contains(&component.coefficient) {
                return Err(ModelError::CoefficientOutOfRange {
                    id: component.id.clone(),
                    coefficient: component.coefficient,
                });
            }
            crate::composition::validate_composition(&component.formula, &component.composition)?;
        }
        Ok(())
    }

    /// Fresh copy for play, every coefficient back to 1.
    pub fn working_copy(&self) -> Level {
        let mut copy = self.clone();
        for component in copy.reactants.iter_mut().chain(copy.products.iter_mut()) {
            component.coefficient = MIN_COEFFICIENT;
        }
        copy
    }

    pub fn side(&self, side: Side) -> &[Component] {
        match side {
            Side::Reactants => &self.reactants,
            Side::Products => &self.products,
        }
    }

    pub fn component_mut(&mut self, side: Side, index: usize) -> Option<&mut Component> {
        match side {
            Side::Reactants => self.reactants.get_mut(index),
            Side::Products => self.products.get_mut(index),
        }
    }

    /// Current coefficients, reactants first.
    pub fn coefficients(&self) -> Vec<u32> {
        self.reactants
            .iter()
            .chain(&self.products)
            .map(|c| c.coefficient)
            .collect()
    }

    /// The equation as text, e.g. `2 H₂ + O₂ → 2 H₂O`.
    pub fn equation(&self) -> String {
        let join = |components: &[Component]| {
            components
                .iter()
                .map(Component::term)
                .collect::<Vec<_>>()
                .join(" + ")
        };
        format!("{} → {}", join(&self.reactants), join(&self.products))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_levels;
    use crate::composition::ElementCounts;

    #[test]
    fn test_seed_levels_validate() {
        for level in seed_levels() {
            level.validate().unwrap();
        }
    }

    #[test]
    fn test_working_copy_resets_without_touching_template() {
        let mut template = seed_levels().remove(0);
        template.reactants[0].coefficient = 4;

        let copy = template.working_copy();
        assert_eq!(copy.coefficients(), vec![1, 1, 1]);
        assert_eq!(template.reactants[0].coefficient, 4);
    }

    #[test]
    fn test_equation() {
        let mut water = seed_levels().remove(0);
        assert_eq!(water.equation(), "H₂ + O₂ → H₂O");
        water.component_mut(Side::Reactants, 0).unwrap().adjust(1);
        water.component_mut(Side::Products, 0).unwrap().adjust(1);
        assert_eq!(water.equation(), "2 H₂ + O₂ → 2 H₂O");
    }

    #[test]
    fn test_validate_rejects_duplicates_and_empty_sides() {
        let mut water = seed_levels().remove(0);
        water.products[0].id = "r1".to_string();
        assert!(matches!(
            water.validate(),
            Err(ModelError::DuplicateComponent { .. })
        ));

        let mut empty = seed_levels().remove(0);
        empty.products.clear();
        assert!(matches!(
            empty.validate(),
            Err(ModelError::EmptySide { side: "products", .. })
        ));
    }

    #[test]
    fn test_validate_catches_deserialized_zero_count() {
        let mut water = seed_levels().remove(0);
        let mut bad = ElementCounts::new();
        bad.insert_raw("H", 0);
        water.reactants[0].composition = bad;
        assert!(matches!(water.validate(), Err(ModelError::ZeroCount { .. })));
    }

    #[test]
    fn test_validate_rejects_coefficients_out_of_range() {
        for coefficient in [0, MAX_COEFFICIENT + 1, 42] {
            let mut water = seed_levels().remove(0);
            water.products[0].coefficient = coefficient;
            assert_eq!(
                water.validate(),
                Err(ModelError::CoefficientOutOfRange {
                    id: "p1".to_string(),
                    coefficient,
                })
            );
        }

        let mut water = seed_levels().remove(0);
        water.reactants[0].coefficient = MAX_COEFFICIENT;
        assert!(water.validate().is_ok());
    }

    #[test]
    fn test_deserialized_level_is_validated() {
        let text = r#"{
            "id": "wire", "name": "Wire", "description": "", "difficulty": "Easy",
            "reactants": [{ "id": "r1", "formula": "H₂", "composition": { "H": 2 }, "coefficient": 0 }],
            "products": [{ "id": "p1", "formula": "H", "composition": { "H": 1 }, "coefficient": 2 }]
        }"#;
        let level: Level = serde_json::from_str(text).unwrap();
        assert!(matches!(
            level.validate(),
            Err(ModelError::CoefficientOutOfRange { coefficient: 0, .. })
        ));
    }

    #[test]
    fn test_difficulty_aliases() {
        let d: Difficulty = serde_json::from_str("\"Difficile\"").unwrap();
        assert_eq!(d, Difficulty::Hard);
        let d: Difficulty = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(d, Difficulty::Medium);
        assert_eq!(Difficulty::Easy.to_string(), "Easy");
    }
}
