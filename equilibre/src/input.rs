//! Parsing of player commands typed at the prompt.

use balance::{Action, Side};

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Change a coefficient; `index` counts from 0
    Adjust { side: Side, index: usize, delta: i32 },
    Hint,
    Next,
    Restart,
    Dismiss,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Unknown command {0:?}, type 'help' for the list")]
    Unknown(String),

    #[error("Expected a component like r1 or p2, got {0:?}")]
    BadTarget(String),

    #[error("Expected a step count, got {0:?}")]
    BadAmount(String),
}

pub const HELP: &str = "\
Commands:
  + r1 [n]   raise the coefficient of reactant 1 (by n, default 1)
  - p2 [n]   lower the coefficient of product 2
  hint       ask the AI tutor for a hint
  next       go to the next level once balanced
  restart    reset the coefficients of this level
  ok         hide the current notice
  show       redraw the board
  help       this text
  quit       leave the game";

impl Input {
    /// The game action for this input, if it is one.
    pub fn action(&self) -> Option<Action> {
        match *self {
            Input::Adjust { side, index, delta } => Some(Action::Adjust { side, index, delta }),
            Input::Hint => Some(Action::RequestHint),
            Input::Next => Some(Action::Advance),
            Input::Restart => Some(Action::RestartLevel),
            Input::Dismiss => Some(Action::DismissNotice),
            Input::Show | Input::Help | Input::Quit => None,
        }
    }
}

/// Parse one line. Blank lines mean "show".
pub fn parse(line: &str) -> Result<Input, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Show);
    }

    if let Some(rest) = line.strip_prefix('+') {
        return parse_adjust(rest, 1);
    }
    if let Some(rest) = line.strip_prefix('-') {
        return parse_adjust(rest, -1);
    }

    match line.to_ascii_lowercase().as_str() {
        "h" | "hint" => Ok(Input::Hint),
        "n" | "next" => Ok(Input::Next),
        "r" | "restart" => Ok(Input::Restart),
        "ok" => Ok(Input::Dismiss),
        "s" | "show" => Ok(Input::Show),
        "?" | "help" => Ok(Input::Help),
        "q" | "quit" | "exit" => Ok(Input::Quit),
        _ => Err(InputError::Unknown(line.to_string())),
    }
}

fn parse_adjust(rest: &str, sign: i32) -> Result<Input, InputError> {
    let mut words = rest.split_whitespace();
    let target = words.next().unwrap_or_default();

    let (side, number) = match target.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('r') => (Side::Reactants, &target[1..]),
        Some('p') => (Side::Products, &target[1..]),
        _ => return Err(InputError::BadTarget(target.to_string())),
    };
    let index = match number.parse::<usize>() {
        Ok(n) if n >= 1 => n - 1,
        _ => return Err(InputError::BadTarget(target.to_string())),
    };

    let steps = match words.next() {
        Some(word) => word
            .parse::<i32>()
            .map_err(|_| InputError::BadAmount(word.to_string()))?,
        None => 1,
    };

    Ok(Input::Adjust {
        side,
        index,
        delta: sign.saturating_mul(steps),
    })
}
