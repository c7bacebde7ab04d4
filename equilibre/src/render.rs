//! Text rendering of the board.

use std::fmt::Write;

use balance::{AtomStyle, Component, ElementRow, Game, Phase};

const BAR_WIDTH: u32 = 12;
const RESET: &str = "\x1b[0m";

pub struct Renderer {
    pub color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// The whole board: card, equation, atom balance and status.
    pub fn board(&self, game: &Game) -> String {
        let mut out = String::new();
        let level = game.level();

        let _ = writeln!(
            out,
            "── Level {} ── [{}] ── score {} ──",
            game.level_index() + 1,
            level.difficulty,
            game.score()
        );
        let _ = writeln!(out, "{}", level.name);
        let _ = writeln!(out, "  {}", level.description);
        out.push('\n');

        let _ = writeln!(
            out,
            "  {}  →  {}",
            terms(&level.reactants, 'r'),
            terms(&level.products, 'p')
        );
        out.push('\n');

        out.push_str("  Atom balance\n");
        for row in game.evaluation().rows() {
            let _ = writeln!(out, "  {}", self.row(&row));
        }
        out.push('\n');

        match game.phase() {
            Phase::Balanced => out.push_str("  Balanced! Type 'next' for the next level.\n"),
            Phase::Loading => out.push_str("  Creating a new level...\n"),
            Phase::Editing => {
                if game.hint_pending() {
                    out.push_str("  Thinking...\n");
                } else if let Some(hint) = game.hint() {
                    let _ = writeln!(out, "  Tutor: {hint}");
                }
            }
        }
        if let Some(notice) = game.notice() {
            let _ = writeln!(out, "  ! {} (type 'ok' to dismiss)", notice.message());
        }
        out
    }

    /// One element: reactant bar, badge, product bar.
    pub fn row(&self, row: &ElementRow) -> String {
        let max = row.reactant.max(row.product).max(5);
        let left = bar(row.reactant, max);
        let right = bar(row.product, max);
        let mark = if row.is_balanced() { '✓' } else { '✗' };
        format!(
            "{:>3} {:>width$} {} {:<width$} {:<3} {}",
            row.reactant,
            left,
            self.badge(&row.symbol),
            right,
            row.product,
            mark,
            width = BAR_WIDTH as usize
        )
    }

    fn badge(&self, symbol: &str) -> String {
        if self.color {
            let style = AtomStyle::for_symbol(symbol);
            format!("{}{:^4}{}", style.ansi, symbol, RESET)
        } else {
            format!("[{:^2}]", symbol)
        }
    }
}

/// `count` out of `max` as a bar of at most `BAR_WIDTH` cells.
fn bar(count: u32, max: u32) -> String {
    let (count, max, width) = (u64::from(count), u64::from(max.max(1)), u64::from(BAR_WIDTH));
    let filled = (count * width + max / 2) / max;
    "█".repeat(filled.min(width) as usize)
}

/// `[r1] 2 H₂ + [r2] O₂`
fn terms(components: &[Component], prefix: char) -> String {
    components
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[{}{}] {}", prefix, i + 1, c.term()))
        .collect::<Vec<_>>()
        .join(" + ")
}
