//! Atom balance evaluator.
//!
//! Pure functions over the components of a level. The game calls
//! [`evaluate`] after every coefficient change.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::composition::ElementCounts;
use crate::level::Level;

/// Weighted element totals for one side.
///
/// Elements whose contribution is zero do not appear in the result. Counts
/// saturate at `u32::MAX`; [`evaluate`] decides balance on exact totals.
pub fn totals(side: &[Component]) -> ElementCounts {
    let mut out = ElementCounts::new();
    for component in side {
        for (symbol, n) in component.composition.iter() {
            out.add(symbol, n.saturating_mul(component.coefficient));
        }
    }
    out
}

/// True when every element has the same total on both sides.
pub fn is_balanced(reactants: &ElementCounts, products: &ElementCounts) -> bool {
    reactants
        .elements()
        .chain(products.elements())
        .all(|symbol| reactants.get(symbol) == products.get(symbol))
}

/// Totals for both sides of a level and the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub reactants: ElementCounts,
    pub products: ElementCounts,
    pub balanced: bool,
}

/// One line of the atom balance panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRow {
    pub symbol: String,
    pub reactant: u32,
    pub product: u32,
}

impl ElementRow {
    pub fn is_balanced(&self) -> bool {
        self.reactant == self.product
    }
}

/// Totals in `u128`: a `u32` count times a `u32` coefficient always fits,
/// and so does any realistic number of such terms.
fn exact_totals(side: &[Component]) -> BTreeMap<&str, u128> {
    let mut out = BTreeMap::new();
    for component in side {
        for (symbol, n) in component.composition.iter() {
            let contribution = u128::from(n) * u128::from(component.coefficient);
            if contribution > 0 {
                *out.entry(symbol).or_insert(0) += contribution;
            }
        }
    }
    out
}

/// Evaluate a level at its current coefficients.
pub fn evaluate(level: &Level) -> Evaluation {
    let reactants = totals(&level.reactants);
    let products = totals(&level.products);
    let balanced = exact_totals(&level.reactants) == exact_totals(&level.products);
    Evaluation {
        reactants,
        products,
        balanced,
    }
}

impl Evaluation {
    /// Union of elements from both sides, sorted by symbol.
    pub fn rows(&self) -> Vec<ElementRow> {
        let symbols: BTreeSet<&str> = self
            .reactants
            .elements()
            .chain(self.products.elements())
            .collect();
        symbols
            .into_iter()
            .map(|symbol| ElementRow {
                symbol: symbol.to_string(),
                reactant: self.reactants.get(symbol),
                product: self.products.get(symbol),
            })
            .collect()
    }

    /// Both sides mention exactly the same elements.
    ///
    /// Without this no choice of coefficients can balance the reaction.
    pub fn conserved_elements(&self) -> bool {
        self.reactants.elements().eq(self.products.elements())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::ElementCounts;

    fn component(id: &str, formula: &str, pairs: &[(&str, u32)], coefficient: u32) -> Component {
        let mut c = Component::new(id, formula, pairs.iter().copied().collect()).unwrap();
        c.coefficient = coefficient;
        c
    }

    fn counts(pairs: &[(&str, u32)]) -> ElementCounts {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_water_balanced() {
        let r = [
            component("r1", "H₂", &[("H", 2)], 2),
            component("r2", "O₂", &[("O", 2)], 1),
        ];
        let p = [component("p1", "H₂O", &[("H", 2), ("O", 1)], 2)];

        assert_eq!(totals(&r), counts(&[("H", 4), ("O", 2)]));
        assert_eq!(totals(&p), counts(&[("H", 4), ("O", 2)]));
        assert!(is_balanced(&totals(&r), &totals(&p)));
    }

    #[test]
    fn test_water_unbalanced() {
        let r = [
            component("r1", "H₂", &[("H", 2)], 1),
            component("r2", "O₂", &[("O", 2)], 1),
        ];
        let p = [component("p1", "H₂O", &[("H", 2), ("O", 1)], 1)];

        assert_eq!(totals(&r), counts(&[("H", 2), ("O", 2)]));
        assert_eq!(totals(&p), counts(&[("H", 2), ("O", 1)]));
        assert!(!is_balanced(&totals(&r), &totals(&p)));
    }

    #[test]
    fn test_empty_composition_contributes_nothing() {
        // Bypass the constructor: compositions from the wire may be empty.
        let ghost = Component {
            id: "g".to_string(),
            formula: "?".to_string(),
            composition: ElementCounts::new(),
            coefficient: 7,
        };
        let side = [ghost, component("r1", "H₂", &[("H", 2)], 1)];
        assert_eq!(totals(&side), counts(&[("H", 2)]));
        assert!(totals(&side[..1]).is_empty());
    }

    #[test]
    fn test_totals_ignore_order() {
        let a = component("r1", "CH₄", &[("C", 1), ("H", 4)], 3);
        let b = component("r2", "O₂", &[("O", 2)], 2);
        let c = component("r3", "H₂O", &[("H", 2), ("O", 1)], 5);

        let forward = totals(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(forward, totals(&[c.clone(), a.clone(), b.clone()]));
        assert_eq!(forward, totals(&[b, c, a]));
    }

    #[test]
    fn test_element_on_one_side_only() {
        let r = counts(&[("H", 2)]);
        let p = counts(&[("H", 2), ("Cl", 1)]);
        assert!(!is_balanced(&r, &p));
        assert!(!is_balanced(&p, &r));
        assert!(is_balanced(&ElementCounts::new(), &ElementCounts::new()));
    }

    #[test]
    fn test_huge_counts_never_balance_by_saturation() {
        let raw = |id: &str, n: u32, coefficient: u32| Component {
            id: id.to_string(),
            formula: "H".to_string(),
            composition: counts(&[("H", n)]),
            coefficient,
        };
        let level = Level {
            id: "huge".to_string(),
            name: "Huge".to_string(),
            description: String::new(),
            difficulty: crate::level::Difficulty::Hard,
            reactants: vec![raw("r1", 1 << 31, 2)],
            products: vec![raw("p1", u32::MAX, 1)],
        };

        // Both sides saturate to the same display total...
        assert_eq!(totals(&level.reactants), totals(&level.products));
        // ...but the true totals differ by one.
        assert!(!evaluate(&level).balanced);

        let mut even = level.clone();
        even.products[0] = raw("p1", 1 << 31, 2);
        assert!(evaluate(&even).balanced);
    }

    #[test]
    fn test_rows_union() {
        let eval = Evaluation {
            reactants: counts(&[("H", 2), ("O", 2)]),
            products: counts(&[("H", 2), ("O", 1), ("N", 1)]),
            balanced: false,
        };
        let rows = eval.rows();
        let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["H", "N", "O"]);
        assert!(rows[0].is_balanced());
        assert_eq!((rows[1].reactant, rows[1].product), (0, 1));
        assert!(!rows[2].is_balanced());
        assert!(!eval.conserved_elements());
    }
}
