//! Shape of a generated level and its conversion into a playable [`Level`].
//!
//! Model output is untrusted. It is parsed into explicit serde types and
//! then checked against the model invariants; anything that does not fit is
//! rejected rather than patched up.

use std::collections::BTreeMap;

use balance::evaluator;
use balance::{
    Component, Difficulty, ElementCounts, Level, ModelError, GENERATION_ELEMENTS, MAX_ATOM_COUNT,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Error types for generated level validation.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Not JSON, or JSON of the wrong shape
    #[error("Malformed level JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A side of the reaction is missing
    #[error("Generated level has no {0}")]
    EmptySide(&'static str),

    /// A count is negative or too large
    #[error("Bad count {count} for {symbol} in {formula}")]
    BadCount {
        formula: String,
        symbol: String,
        count: i64,
    },

    /// The level breaks a model invariant
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Some element appears on one side only, so no coefficients can balance it
    #[error("Elements not conserved: reactants only {reactant_only:?}, products only {product_only:?}")]
    ElementsNotConserved {
        reactant_only: Vec<String>,
        product_only: Vec<String>,
    },
}

/// Level as returned by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub reactants: Vec<GeneratedComponent>,
    pub products: Vec<GeneratedComponent>,
}

/// Component as returned by the generator. Null counts mean "absent".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedComponent {
    pub formula: String,
    pub composition: BTreeMap<String, Option<i64>>,
}

impl GeneratedComponent {
    fn into_component(self, id: String) -> Result<Component, SchemaError> {
        let mut counts = ElementCounts::new();
        for (symbol, count) in &self.composition {
            let count = count.unwrap_or(0);
            let n = u32::try_from(count)
                .ok()
                .filter(|n| *n <= MAX_ATOM_COUNT)
                .ok_or_else(|| SchemaError::BadCount {
                    formula: self.formula.clone(),
                    symbol: symbol.clone(),
                    count,
                })?;
            if n > 0 && !balance::composition::is_supported(symbol) {
                debug!(%symbol, formula = %self.formula, "Element outside the palette");
            }
            counts.add(symbol, n);
        }
        Ok(Component::new(id, self.formula.trim(), counts)?)
    }
}

impl GeneratedLevel {
    /// Convert into a playable level with every coefficient at 1.
    ///
    /// Ids are derived from `stamp`: `gen_<stamp>`, `r_<i>_<stamp>`, `p_<i>_<stamp>`.
    pub fn into_level(self, stamp: i64) -> Result<Level, SchemaError> {
        if self.reactants.is_empty() {
            return Err(SchemaError::EmptySide("reactants"));
        }
        if self.products.is_empty() {
            return Err(SchemaError::EmptySide("products"));
        }

        let reactants = self
            .reactants
            .into_iter()
            .enumerate()
            .map(|(i, c)| c.into_component(format!("r_{i}_{stamp}")))
            .collect::<Result<Vec<_>, _>>()?;
        let products = self
            .products
            .into_iter()
            .enumerate()
            .map(|(i, c)| c.into_component(format!("p_{i}_{stamp}")))
            .collect::<Result<Vec<_>, _>>()?;

        let level = Level {
            id: format!("gen_{stamp}"),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            difficulty: self.difficulty,
            reactants,
            products,
        };
        level.validate()?;

        let evaluation = evaluator::evaluate(&level);
        if !evaluation.conserved_elements() {
            let only = |a: &ElementCounts, b: &ElementCounts| -> Vec<String> {
                a.elements()
                    .filter(|s| !b.contains(s))
                    .map(str::to_string)
                    .collect()
            };
            return Err(SchemaError::ElementsNotConserved {
                reactant_only: only(&evaluation.reactants, &evaluation.products),
                product_only: only(&evaluation.products, &evaluation.reactants),
            });
        }

        Ok(level)
    }
}

/// Parse model output into a level.
///
/// Tolerates a surrounding markdown code fence, which some models add even
/// in JSON mode.
pub fn parse_generated_level(text: &str, stamp: i64) -> Result<Level, SchemaError> {
    let generated: GeneratedLevel = serde_json::from_str(strip_code_fence(text))?;
    generated.into_level(stamp)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) up to the first newline.
    let inner = inner.split_once('\n').map_or("", |(_, rest)| rest);
    inner.trim_end().strip_suffix("```").unwrap_or(inner).trim()
}

/// Response schema sent to the generator.
///
/// Uses the OpenAPI subset understood by Gemini `responseSchema`.
pub fn level_response_schema() -> Value {
    let composition_properties: serde_json::Map<String, Value> = GENERATION_ELEMENTS
        .iter()
        .map(|symbol| {
            (
                symbol.to_string(),
                json!({ "type": "INTEGER", "nullable": true }),
            )
        })
        .collect();

    let component = json!({
        "type": "OBJECT",
        "properties": {
            "formula": {
                "type": "STRING",
                "description": "Chemical formula, unicode subscripts if possible (e.g. CO₂)"
            },
            "composition": {
                "type": "OBJECT",
                "description": "Map of element symbol to atom count (e.g. {\"C\": 1, \"O\": 2})",
                "properties": composition_properties
            }
        },
        "required": ["formula", "composition"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING", "description": "Creative name for the reaction" },
            "description": {
                "type": "STRING",
                "description": "Interesting fact about this reaction (max 2 sentences)"
            },
            "difficulty": { "type": "STRING", "enum": ["Easy", "Medium", "Hard"] },
            "reactants": { "type": "ARRAY", "items": component.clone() },
            "products": { "type": "ARRAY", "items": component }
        },
        "required": ["name", "description", "difficulty", "reactants", "products"]
    })
}
