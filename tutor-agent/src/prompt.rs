//! Prompts sent to the generative model.

use balance::{Level, GENERATION_ELEMENTS};

/// System instruction for level generation.
pub const GENERATION_SYSTEM_PROMPT: &str = "\
You are an expert chemistry teacher for middle school students (ages 12-15).
Your job is to create unbalanced chemical equations for an educational game.
Equations must be scientifically correct.
The JSON must be strictly formatted so the application can parse it.
Use a variety of molecules.
For \"Hard\" levels, feel free to use 3 reactants or 2 complex products.
The atomic composition must be exact (e.g. O2 -> {\"O\": 2}).
Never give the balanced coefficients; the player finds them.
Always initialise every coefficient to 1.";

/// User prompt asking for a level not in `exclude_names`.
pub fn generation_prompt(exclude_names: &[String]) -> String {
    let mut prompt = String::new();

    prompt.push_str("Generate a new balanceable chemical equation");
    if exclude_names.is_empty() {
        prompt.push_str(".\n");
    } else {
        prompt.push_str(&format!(
            ", different from these: {}.\n",
            exclude_names.join(", ")
        ));
    }
    prompt.push_str(
        "To vary the difficulty you may use up to 3 reactants (A + B + C -> D) or several products.\n",
    );
    prompt.push_str(
        "Complex examples are welcome: photosynthesis, redox reactions with iron or copper.\n",
    );
    prompt.push_str(&format!(
        "Only use these elements: {}.\n",
        GENERATION_ELEMENTS.join(", ")
    ));
    prompt.push_str(
        "Reply with a JSON object with fields name, description, difficulty \
         (Easy, Medium or Hard), reactants and products; each component has a \
         formula string and a composition object mapping element symbols to counts.\n",
    );

    prompt
}

/// User prompt asking for a hint on `level` at its current coefficients.
pub fn hint_prompt(level: &Level) -> String {
    format!(
        "Give a short, encouraging hint to help a student balance this equation: {}. \
         Do not give the answer directly. Explain which atom to look at first.",
        level.equation()
    )
}
