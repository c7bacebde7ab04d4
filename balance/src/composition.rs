//! Elemental composition maps and the supported element palette.
//!
//! An [`ElementCounts`] maps element symbols to atom counts. It is used both
//! for the fixed composition of one unit of a species and for the weighted
//! totals of a whole side of a reaction. Symbols are plain strings: the
//! arithmetic does not care whether an element is in [`PALETTE`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Elements the game knows how to draw.
pub const PALETTE: [&str; 12] = [
    "H", "C", "O", "N", "Cl", "Na", "Mg", "S", "Fe", "Cu", "Zn", "Al",
];

/// Elements offered to the level generator.
pub const GENERATION_ELEMENTS: [&str; 10] = ["H", "C", "O", "N", "Cl", "Na", "Mg", "S", "Fe", "Al"];

/// Most atoms of one element a single species may contain.
pub const MAX_ATOM_COUNT: u32 = 99;

/// Element symbol to atom count.
///
/// Absent keys count as zero. Iteration is ordered by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct ElementCounts(BTreeMap<String, u32>);

impl ElementCounts {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(symbol, count)` pairs, summing repeated symbols.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        let mut counts = Self::new();
        for (symbol, n) in pairs {
            counts.add(symbol, n);
        }
        counts
    }

    /// Count for `symbol`, zero when absent.
    pub fn get(&self, symbol: &str) -> u32 {
        self.0.get(symbol).copied().unwrap_or(0)
    }

    /// Add `n` atoms of `symbol`. Adding zero does not create an entry.
    pub fn add(&mut self, symbol: &str, n: u32) {
        if n == 0 {
            return;
        }
        let entry = self.0.entry(symbol.to_string()).or_default();
        *entry = entry.saturating_add(n);
    }

    /// Every count multiplied by `factor`.
    pub fn scaled(&self, factor: u32) -> Self {
        let mut out = Self::new();
        for (symbol, n) in self.iter() {
            out.add(symbol, n.saturating_mul(factor));
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw insert, keeping explicit zeros so validation can see them.
    #[cfg(test)]
    pub(crate) fn insert_raw(&mut self, symbol: impl Into<String>, n: u32) {
        self.0.insert(symbol.into(), n);
    }
}

impl<'a> FromIterator<(&'a str, u32)> for ElementCounts {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Whether `s` looks like an element symbol: `Fe`, `H`, `Uue`.
pub fn is_valid_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    let rest: Vec<char> = chars.collect();
    rest.len() <= 2 && rest.iter().all(|c| c.is_ascii_lowercase())
}

/// Whether the game has a dedicated style for `symbol`.
pub fn is_supported(symbol: &str) -> bool {
    PALETTE.contains(&symbol)
}

/// Check the composition invariants for one unit of `formula`.
pub fn validate_composition(formula: &str, counts: &ElementCounts) -> Result<(), ModelError> {
    if counts.is_empty() {
        return Err(ModelError::EmptyComposition(formula.to_string()));
    }
    for (symbol, n) in counts.iter() {
        if !is_valid_symbol(symbol) {
            return Err(ModelError::InvalidSymbol(symbol.to_string()));
        }
        if n == 0 {
            return Err(ModelError::ZeroCount {
                formula: formula.to_string(),
                symbol: symbol.to_string(),
            });
        }
        if n > MAX_ATOM_COUNT {
            return Err(ModelError::CountTooLarge {
                formula: formula.to_string(),
                symbol: symbol.to_string(),
                count: n,
            });
        }
    }
    Ok(())
}

/// Display style of an atom. Symbols outside the palette use [`AtomStyle::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomStyle {
    /// ANSI SGR sequence for the atom badge
    pub ansi: &'static str,
    /// Name of the colour, for logs and plain output
    pub name: &'static str,
}

impl AtomStyle {
    pub const DEFAULT: AtomStyle = AtomStyle { ansi: "\x1b[1;97;45m", name: "pink" };

    /// Style for `symbol`.
    pub fn for_symbol(symbol: &str) -> AtomStyle {
        let (ansi, name) = match symbol {
            "H" => ("\x1b[1;30;47m", "white"),
            "C" => ("\x1b[1;97;40m", "black"),
            "O" => ("\x1b[1;97;41m", "red"),
            "N" => ("\x1b[1;97;44m", "blue"),
            "Cl" => ("\x1b[1;97;42m", "green"),
            "Na" => ("\x1b[1;97;45m", "purple"),
            "Mg" => ("\x1b[1;30;43m", "orange"),
            "S" => ("\x1b[1;30;103m", "yellow"),
            "Fe" => ("\x1b[1;97;43m", "rust"),
            "Al" => ("\x1b[1;30;100m", "gray"),
            _ => return Self::DEFAULT,
        };
        AtomStyle { ansi, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_zero() {
        let water = ElementCounts::from_pairs([("H", 2), ("O", 1)]);
        assert_eq!(water.get("H"), 2);
        assert_eq!(water.get("Fe"), 0);
        assert_eq!(water.len(), 2);
    }

    #[test]
    fn test_add_zero_creates_nothing() {
        let mut counts = ElementCounts::new();
        counts.add("H", 0);
        assert!(counts.is_empty());
        counts.add("H", 2);
        counts.add("H", 3);
        assert_eq!(counts.get("H"), 5);
    }

    #[test]
    fn test_scaled() {
        let co2 = ElementCounts::from_pairs([("C", 1), ("O", 2)]);
        let doubled = co2.scaled(3);
        assert_eq!(doubled.get("C"), 3);
        assert_eq!(doubled.get("O"), 6);
    }

    #[test]
    fn test_symbol_shape() {
        assert!(is_valid_symbol("H"));
        assert!(is_valid_symbol("Fe"));
        assert!(is_valid_symbol("Uue"));
        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("fe"));
        assert!(!is_valid_symbol("FE"));
        assert!(!is_valid_symbol("Hexa"));
        assert!(!is_valid_symbol("H2"));
    }

    #[test]
    fn test_validate_composition() {
        let ok = ElementCounts::from_pairs([("Fe", 1), ("O", 3), ("H", 3)]);
        assert!(validate_composition("Fe(OH)₃", &ok).is_ok());

        assert_eq!(
            validate_composition("?", &ElementCounts::new()),
            Err(ModelError::EmptyComposition("?".to_string()))
        );

        let mut zero = ElementCounts::new();
        zero.insert_raw("O", 0);
        assert!(matches!(
            validate_composition("O", &zero),
            Err(ModelError::ZeroCount { .. })
        ));

        let huge = ElementCounts::from_pairs([("H", MAX_ATOM_COUNT + 1)]);
        assert_eq!(
            validate_composition("H₁₀₀", &huge),
            Err(ModelError::CountTooLarge {
                formula: "H₁₀₀".to_string(),
                symbol: "H".to_string(),
                count: MAX_ATOM_COUNT + 1,
            })
        );
        let most = ElementCounts::from_pairs([("H", MAX_ATOM_COUNT)]);
        assert!(validate_composition("H₉₉", &most).is_ok());
    }

    #[test]
    fn test_serde_is_plain_object() {
        let counts: ElementCounts = serde_json::from_str(r#"{"H": 2, "O": 1}"#).unwrap();
        assert_eq!(counts.get("H"), 2);
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"H":2,"O":1}"#);
    }

    #[test]
    fn test_unknown_element_style_falls_back() {
        assert_eq!(AtomStyle::for_symbol("Xe"), AtomStyle::DEFAULT);
        assert_eq!(AtomStyle::for_symbol("O").name, "red");
        assert!(is_supported("Cu"));
        assert!(!is_supported("Xe"));
    }
}
