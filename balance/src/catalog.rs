//! Seed reactions and the growing list of playable levels.

use tracing::debug;

use crate::component::Component;
use crate::composition::ElementCounts;
use crate::level::{Difficulty, Level};

/// Component from trusted seed data.
fn seed(id: &str, formula: &str, pairs: &[(&str, u32)]) -> Component {
    Component {
        id: id.to_string(),
        formula: formula.to_string(),
        composition: pairs.iter().copied().collect::<ElementCounts>(),
        coefficient: 1,
    }
}

/// The built-in levels, in play order.
pub fn seed_levels() -> Vec<Level> {
    vec![
        Level {
            id: "l1".to_string(),
            name: "Water Formation".to_string(),
            description: "Hydrogen reacts with oxygen to form water. It is the basis of life!"
                .to_string(),
            difficulty: Difficulty::Easy,
            reactants: vec![seed("r1", "H₂", &[("H", 2)]), seed("r2", "O₂", &[("O", 2)])],
            products: vec![seed("p1", "H₂O", &[("H", 2), ("O", 1)])],
        },
        Level {
            id: "l2".to_string(),
            name: "Methane Combustion".to_string(),
            description: "Methane (natural gas) burns in oxygen to give carbon dioxide and water."
                .to_string(),
            difficulty: Difficulty::Medium,
            reactants: vec![
                seed("r1", "CH₄", &[("C", 1), ("H", 4)]),
                seed("r2", "O₂", &[("O", 2)]),
            ],
            products: vec![
                seed("p1", "CO₂", &[("C", 1), ("O", 2)]),
                seed("p2", "H₂O", &[("H", 2), ("O", 1)]),
            ],
        },
        Level {
            id: "l3".to_string(),
            name: "Ammonia Synthesis".to_string(),
            description: "The Haber-Bosch process makes ammonia for fertilisers.".to_string(),
            difficulty: Difficulty::Medium,
            reactants: vec![seed("r1", "N₂", &[("N", 2)]), seed("r2", "H₂", &[("H", 2)])],
            products: vec![seed("p1", "NH₃", &[("N", 1), ("H", 3)])],
        },
        Level {
            id: "l4".to_string(),
            name: "Rust Formation".to_string(),
            description:
                "Iron rusts in the presence of oxygen and water, forming iron hydroxide."
                    .to_string(),
            difficulty: Difficulty::Hard,
            reactants: vec![
                seed("r1", "Fe", &[("Fe", 1)]),
                seed("r2", "O₂", &[("O", 2)]),
                seed("r3", "H₂O", &[("H", 2), ("O", 1)]),
            ],
            products: vec![seed("p1", "Fe(OH)₃", &[("Fe", 1), ("O", 3), ("H", 3)])],
        },
    ]
}

/// Level templates: the seed set followed by generated levels.
///
/// Templates are never mutated once stored; play happens on working copies.
#[derive(Debug, Clone)]
pub struct Catalog {
    levels: Vec<Level>,
    seed_len: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Catalog holding the built-in seed levels.
    pub fn new() -> Self {
        Self::with_levels(seed_levels())
    }

    /// Catalog with a custom seed set.
    pub fn with_levels(levels: Vec<Level>) -> Self {
        let seed_len = levels.len();
        Self { levels, seed_len }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Names of every level, used to ask the generator for something new.
    pub fn names(&self) -> Vec<String> {
        self.levels.iter().map(|l| l.name.clone()).collect()
    }

    pub fn seed_len(&self) -> usize {
        self.seed_len
    }

    pub fn has_generated(&self) -> bool {
        self.levels.len() > self.seed_len
    }

    /// Index of the first generated level, if any.
    pub fn first_generated(&self) -> Option<usize> {
        self.has_generated().then_some(self.seed_len)
    }

    /// Append a generated level and return its index.
    pub fn push_generated(&mut self, level: Level) -> usize {
        debug!(level = %level.name, "Appending generated level");
        self.levels.push(level);
        self.levels.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog() {
        let catalog = Catalog::new();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.seed_len(), 4);
        assert!(!catalog.has_generated());
        assert_eq!(catalog.first_generated(), None);
        assert_eq!(catalog.names()[0], "Water Formation");
        assert!(catalog.levels().iter().all(|l| l.coefficients().iter().all(|&c| c == 1)));
    }

    #[test]
    fn test_push_generated() {
        let mut catalog = Catalog::new();
        let mut extra = seed_levels().remove(2);
        extra.id = "gen_1".to_string();
        extra.name = "Ammonia Again".to_string();

        assert_eq!(catalog.push_generated(extra), 4);
        assert!(catalog.has_generated());
        assert_eq!(catalog.first_generated(), Some(4));
        assert_eq!(catalog.seed_len(), 4);
        assert_eq!(catalog.get(4).map(|l| l.name.as_str()), Some("Ammonia Again"));
    }
}
