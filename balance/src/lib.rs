//! Balance - chemical equation balancing core
//!
//! Everything the game needs that is not presentation or network:
//!
//! - **Composition model**: element symbol to atom count maps ([`ElementCounts`])
//! - **Components**: species with a fixed composition and a player-adjusted coefficient
//! - **Evaluator**: per-element totals for a side and the balance check
//! - **Catalog**: the seed reactions plus generated ones
//! - **Game**: reducer-style state machine driving one play session
//!
//! # Example
//!
//! ```
//! use balance::{evaluator, Catalog, Side};
//!
//! let mut water = Catalog::new().get(0).unwrap().working_copy();
//! assert!(!evaluator::evaluate(&water).balanced);
//!
//! water.component_mut(Side::Reactants, 0).unwrap().adjust(1);
//! water.component_mut(Side::Products, 0).unwrap().adjust(1);
//! assert!(evaluator::evaluate(&water).balanced);
//! ```

pub mod catalog;
pub mod component;
pub mod composition;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod level;

// Re-export main types
pub use catalog::{seed_levels, Catalog};
pub use component::{Component, MAX_COEFFICIENT, MIN_COEFFICIENT};
pub use composition::{AtomStyle, ElementCounts, GENERATION_ELEMENTS, MAX_ATOM_COUNT, PALETTE};
pub use error::ModelError;
pub use evaluator::{ElementRow, Evaluation};
pub use game::{Action, Command, Game, Notice, Phase, Ticket};
pub use level::{Difficulty, Level, Side};
