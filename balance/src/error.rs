//! Errors raised while building or validating the data model.

/// Error types for model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A component has no atoms at all
    #[error("Composition of {0} is empty")]
    EmptyComposition(String),

    /// An element count of zero was supplied explicitly
    #[error("Element {symbol} in {formula} has a zero count")]
    ZeroCount { formula: String, symbol: String },

    /// Not shaped like an element symbol
    #[error("Invalid element symbol: {0:?}")]
    InvalidSymbol(String),

    /// More atoms of one element than a species may hold
    #[error("Element {symbol} in {formula} has {count} atoms, more than the allowed maximum")]
    CountTooLarge {
        formula: String,
        symbol: String,
        count: u32,
    },

    /// A coefficient outside `MIN_COEFFICIENT..=MAX_COEFFICIENT`
    #[error("Component {id} has coefficient {coefficient}, outside 1..=9")]
    CoefficientOutOfRange { id: String, coefficient: u32 },

    /// One side of the reaction has no components
    #[error("Level {level} has no {side}")]
    EmptySide { level: String, side: &'static str },

    /// Two components of the same level share an id
    #[error("Duplicate component id {id} in level {level}")]
    DuplicateComponent { level: String, id: String },

    /// Display formula is blank
    #[error("Component {0} has an empty formula")]
    EmptyFormula(String),

    /// A game needs at least one level
    #[error("Catalog has no levels")]
    EmptyCatalog,

    /// Requested start level does not exist
    #[error("Level {index} out of range, catalog has {len}")]
    LevelOutOfRange { index: usize, len: usize },
}
