//! Game session state machine.
//!
//! A [`Game`] owns the catalog, the working copy of the active level and the
//! session score. Every input is an [`Action`]; [`Game::dispatch`] applies it
//! and returns the [`Command`]s the driver must run. Results of those
//! commands come back as actions carrying the [`Ticket`] they were issued
//! with, so a late answer for a level the player already left is dropped.
//!
//! ```text
//!   Editing ──balanced──▶ Balanced ──Advance──▶ Editing(next)
//!      ▲                     │
//!      └──unbalanced─────────┤ (end of catalog)
//!                            ▼
//!                         Loading ──LevelGenerated──▶ Editing(new | fallback)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::ModelError;
use crate::evaluator::{self, Evaluation};
use crate::level::{Level, Side};

/// Points awarded for each balanced level.
pub const POINTS_PER_LEVEL: u32 = 100;

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Coefficients can be changed
    Editing,
    /// Solved, coefficients locked until the player advances
    Balanced,
    /// Waiting for a generated level
    Loading,
}

/// Stamp tying an asynchronous result to the level state that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Player input or the result of a [`Command`].
#[derive(Debug, Clone)]
pub enum Action {
    /// Change one coefficient by `delta`
    Adjust { side: Side, index: usize, delta: i32 },
    /// Go to the next level (only once balanced)
    Advance,
    /// Ask the tutor for a hint
    RequestHint,
    /// Reset the current level's coefficients (only while editing)
    RestartLevel,
    /// The level data of the current level changed outside the game
    SyncLevel { level: Level },
    /// Answer to [`Command::GenerateLevel`]
    LevelGenerated { ticket: Ticket, level: Option<Level> },
    /// Answer to [`Command::FetchHint`]
    HintReady { ticket: Ticket, text: String },
    /// Hide the current notice
    DismissNotice,
}

/// Work the driver must perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch a new level, different from the named ones
    GenerateLevel {
        ticket: Ticket,
        exclude_names: Vec<String>,
    },
    /// Fetch a hint for the level at its current coefficients
    FetchHint { ticket: Ticket, level: Level },
    /// The level was just balanced
    Celebrate { score: u32 },
}

/// Message the player must see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Generation failed with no generated levels to fall back on
    BackToStart,
    /// Generation failed, replaying an earlier generated level
    ReplayingGenerated { index: usize },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::BackToStart => {
                "Could not generate a new level (missing API key?). Back to the start!".to_string()
            }
            Notice::ReplayingGenerated { index } => format!(
                "Could not generate a new level. Replaying level {}.",
                index + 1
            ),
        }
    }
}

/// One play session.
#[derive(Debug, Clone)]
pub struct Game {
    catalog: Catalog,
    index: usize,
    working: Level,
    evaluation: Evaluation,
    phase: Phase,
    score: u32,
    epoch: u64,
    notice: Option<Notice>,
    hint: Option<String>,
    hint_pending: bool,
    /// Commands produced before the first dispatch
    pending: Vec<Command>,
}

impl Game {
    /// Start at the first level of `catalog`.
    pub fn new(catalog: Catalog) -> Result<Self, ModelError> {
        Self::starting_at(catalog, 0)
    }

    /// Start at `index` of `catalog`.
    pub fn starting_at(catalog: Catalog, index: usize) -> Result<Self, ModelError> {
        let template = match catalog.get(index) {
            Some(level) => level.working_copy(),
            None if catalog.is_empty() => return Err(ModelError::EmptyCatalog),
            None => {
                return Err(ModelError::LevelOutOfRange {
                    index,
                    len: catalog.len(),
                })
            }
        };

        let evaluation = evaluator::evaluate(&template);
        let mut game = Self {
            catalog,
            index,
            working: template,
            evaluation,
            phase: Phase::Editing,
            score: 0,
            epoch: 0,
            notice: None,
            hint: None,
            hint_pending: false,
            pending: Vec::new(),
        };
        // An already balanced level is scored right away.
        let celebrate = game.settle();
        game.pending.extend(celebrate);
        Ok(game)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Working copy of the active level.
    pub fn level(&self) -> &Level {
        &self.working
    }

    pub fn level_index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn hint_pending(&self) -> bool {
        self.hint_pending
    }

    /// Ticket for results that belong to the current level state.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.epoch)
    }

    /// Commands produced while the game was set up, such as the
    /// [`Command::Celebrate`] of a level balanced on entry.
    ///
    /// Drained here or by the next [`Game::dispatch`], whichever comes first.
    pub fn take_pending(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: Action) -> Vec<Command> {
        let mut commands = self.take_pending();
        commands.extend(self.apply(action));
        commands
    }

    fn apply(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Adjust { side, index, delta } => self.adjust(side, index, delta),
            Action::Advance => self.advance(),
            Action::RequestHint => self.request_hint(),
            Action::RestartLevel => {
                if self.phase != Phase::Editing {
                    debug!(phase = ?self.phase, "Restart ignored, coefficients locked");
                    return Vec::new();
                }
                self.enter(self.index)
            }
            Action::SyncLevel { level } => self.sync_level(level),
            Action::LevelGenerated { ticket, level } => self.level_generated(ticket, level),
            Action::HintReady { ticket, text } => {
                if ticket != self.ticket() {
                    debug!(?ticket, "Dropping stale hint");
                    return Vec::new();
                }
                self.hint = Some(text);
                self.hint_pending = false;
                Vec::new()
            }
            Action::DismissNotice => {
                self.notice = None;
                Vec::new()
            }
        }
    }

    fn adjust(&mut self, side: Side, index: usize, delta: i32) -> Vec<Command> {
        if self.phase != Phase::Editing {
            debug!(phase = ?self.phase, "Coefficients locked");
            return Vec::new();
        }
        match self.working.component_mut(side, index) {
            Some(component) => component.adjust(delta),
            None => {
                warn!(side = side.label(), index, "No such component");
                return Vec::new();
            }
        }
        self.settle().into_iter().collect()
    }

    fn advance(&mut self) -> Vec<Command> {
        if self.phase != Phase::Balanced {
            debug!(phase = ?self.phase, "Advance ignored, level not balanced");
            return Vec::new();
        }
        self.notice = None;

        let next = self.index + 1;
        if next < self.catalog.len() {
            return self.enter(next);
        }

        self.phase = Phase::Loading;
        self.epoch += 1;
        self.hint_pending = false;
        info!(levels = self.catalog.len(), "End of catalog, requesting a generated level");
        vec![Command::GenerateLevel {
            ticket: self.ticket(),
            exclude_names: self.catalog.names(),
        }]
    }

    fn request_hint(&mut self) -> Vec<Command> {
        if self.phase != Phase::Editing || self.hint_pending {
            return Vec::new();
        }
        self.hint_pending = true;
        vec![Command::FetchHint {
            ticket: self.ticket(),
            level: self.working.clone(),
        }]
    }

    fn sync_level(&mut self, level: Level) -> Vec<Command> {
        if self.phase == Phase::Loading || level.id != self.working.id {
            debug!(level = %level.id, "Ignoring level sync");
            return Vec::new();
        }
        if let Err(e) = level.validate() {
            warn!(error = %e, "Rejecting invalid level sync");
            return Vec::new();
        }
        self.working = level;
        self.settle().into_iter().collect()
    }

    fn level_generated(&mut self, ticket: Ticket, level: Option<Level>) -> Vec<Command> {
        if self.phase != Phase::Loading || ticket != self.ticket() {
            debug!(?ticket, "Dropping stale generated level");
            return Vec::new();
        }

        let level = level.filter(|l| match l.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Generated level failed validation");
                false
            }
        });

        match level {
            Some(level) => {
                info!(level = %level.name, "Generated level ready");
                let index = self.catalog.push_generated(level);
                self.enter(index)
            }
            None => {
                let (index, notice) = match self.catalog.first_generated() {
                    Some(index) => (index, Notice::ReplayingGenerated { index }),
                    None => (0, Notice::BackToStart),
                };
                warn!(index, "Level generation unavailable, falling back");
                let commands = self.enter(index);
                self.notice = Some(notice);
                commands
            }
        }
    }

    /// Make `index` the active level with fresh coefficients.
    fn enter(&mut self, index: usize) -> Vec<Command> {
        let Some(template) = self.catalog.get(index) else {
            warn!(index, "Level index out of range");
            return Vec::new();
        };
        self.index = index;
        self.working = template.working_copy();
        self.epoch += 1;
        self.hint = None;
        self.hint_pending = false;
        self.phase = Phase::Editing;
        debug!(index, level = %self.working.name, "Entered level");
        self.settle().into_iter().collect()
    }

    /// Re-run the evaluator and move between Editing and Balanced.
    fn settle(&mut self) -> Option<Command> {
        self.evaluation = evaluator::evaluate(&self.working);
        match (self.phase, self.evaluation.balanced) {
            (Phase::Editing, true) => {
                self.phase = Phase::Balanced;
                self.score += POINTS_PER_LEVEL;
                info!(level = %self.working.name, score = self.score, "Level balanced");
                Some(Command::Celebrate { score: self.score })
            }
            (Phase::Balanced, false) => {
                warn!(level = %self.working.name, "Balanced level no longer balances");
                self.phase = Phase::Editing;
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjust(side: Side, index: usize, delta: i32) -> Action {
        Action::Adjust { side, index, delta }
    }

    /// Solve the first seed level: 2 H₂ + O₂ → 2 H₂O.
    fn solve_water(game: &mut Game) -> Vec<Command> {
        game.dispatch(adjust(Side::Reactants, 0, 1));
        game.dispatch(adjust(Side::Products, 0, 1))
    }

    #[test]
    fn test_new_game() {
        let game = Game::new(Catalog::new()).unwrap();
        assert_eq!(game.phase(), Phase::Editing);
        assert_eq!(game.level_index(), 0);
        assert_eq!(game.score(), 0);
        assert!(!game.evaluation().balanced);
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(
            Game::new(Catalog::with_levels(Vec::new())).unwrap_err(),
            ModelError::EmptyCatalog
        );
        assert!(matches!(
            Game::starting_at(Catalog::new(), 9),
            Err(ModelError::LevelOutOfRange { index: 9, len: 4 })
        ));
    }

    #[test]
    fn test_balancing_scores_once_and_locks() {
        let mut game = Game::new(Catalog::new()).unwrap();
        let commands = solve_water(&mut game);

        assert_eq!(commands, vec![Command::Celebrate { score: 100 }]);
        assert_eq!(game.phase(), Phase::Balanced);

        for _ in 0..3 {
            assert!(game.dispatch(adjust(Side::Products, 0, 1)).is_empty());
        }
        assert_eq!(game.level().coefficients(), vec![2, 1, 2]);
        assert_eq!(game.score(), 100);
    }

    #[test]
    fn test_out_of_range_adjust_ignored() {
        let mut game = Game::new(Catalog::new()).unwrap();
        assert!(game.dispatch(adjust(Side::Products, 5, 1)).is_empty());
        assert_eq!(game.level().coefficients(), vec![1, 1, 1]);
    }

    #[test]
    fn test_advance_requires_balance() {
        let mut game = Game::new(Catalog::new()).unwrap();
        assert!(game.dispatch(Action::Advance).is_empty());
        assert_eq!(game.level_index(), 0);

        solve_water(&mut game);
        assert!(game.dispatch(Action::Advance).is_empty());
        assert_eq!(game.level_index(), 1);
        assert_eq!(game.phase(), Phase::Editing);
        assert_eq!(game.level().coefficients(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_hint_round_trip_and_stale_drop() {
        let mut game = Game::new(Catalog::new()).unwrap();
        game.dispatch(adjust(Side::Reactants, 0, 1));

        let commands = game.dispatch(Action::RequestHint);
        let (ticket, level) = match commands.as_slice() {
            [Command::FetchHint { ticket, level }] => (*ticket, level.clone()),
            other => panic!("unexpected commands: {other:?}"),
        };
        assert_eq!(level.coefficients(), vec![2, 1, 1]);
        assert!(game.hint_pending());
        assert!(game.dispatch(Action::RequestHint).is_empty());

        game.dispatch(Action::HintReady { ticket, text: "Count the O atoms".to_string() });
        assert_eq!(game.hint(), Some("Count the O atoms"));

        // A hint for the level before a restart is dropped.
        let commands = game.dispatch(Action::RequestHint);
        let Command::FetchHint { ticket: old, .. } = commands[0].clone() else {
            panic!("expected a hint request");
        };
        game.dispatch(Action::RestartLevel);
        assert_eq!(game.hint(), None);
        game.dispatch(Action::HintReady { ticket: old, text: "late".to_string() });
        assert_eq!(game.hint(), None);
    }

    #[test]
    fn test_sync_level_reopens_balanced_level() {
        let mut game = Game::new(Catalog::new()).unwrap();
        solve_water(&mut game);
        assert_eq!(game.phase(), Phase::Balanced);

        let mut changed = game.level().clone();
        changed.products[0].coefficient = 3;
        game.dispatch(Action::SyncLevel { level: changed });

        assert_eq!(game.phase(), Phase::Editing);
        assert_eq!(game.score(), 100);
    }

    #[test]
    fn test_already_balanced_level_scores_on_entry() {
        let mut salt = crate::catalog::seed_levels().remove(0);
        salt.products[0].composition = salt
            .reactants
            .iter()
            .fold(crate::ElementCounts::new(), |mut acc, c| {
                for (s, n) in c.composition.iter() {
                    acc.add(s, n);
                }
                acc
            });
        let mut game = Game::new(Catalog::with_levels(vec![salt])).unwrap();
        assert_eq!(game.phase(), Phase::Balanced);
        assert_eq!(game.score(), POINTS_PER_LEVEL);

        // The celebration is handed out exactly once.
        assert_eq!(
            game.take_pending(),
            vec![Command::Celebrate { score: POINTS_PER_LEVEL }]
        );
        assert!(game.take_pending().is_empty());
        assert!(game.dispatch(Action::DismissNotice).is_empty());
    }

    #[test]
    fn test_celebration_on_entry_rides_first_dispatch() {
        let mut level = crate::catalog::seed_levels().remove(0);
        level.products[0].composition = crate::ElementCounts::from_pairs([("H", 2), ("O", 2)]);
        let mut game = Game::new(Catalog::with_levels(vec![level])).unwrap();

        assert_eq!(
            game.dispatch(Action::DismissNotice),
            vec![Command::Celebrate { score: POINTS_PER_LEVEL }]
        );
        assert!(game.dispatch(Action::DismissNotice).is_empty());
    }

    #[test]
    fn test_restart_locked_once_balanced() {
        let mut game = Game::new(Catalog::new()).unwrap();
        solve_water(&mut game);

        for _ in 0..3 {
            assert!(game.dispatch(Action::RestartLevel).is_empty());
            assert!(solve_water(&mut game).is_empty());
        }
        assert_eq!(game.phase(), Phase::Balanced);
        assert_eq!(game.level().coefficients(), vec![2, 1, 2]);
        assert_eq!(game.score(), POINTS_PER_LEVEL);
    }

    #[test]
    fn test_notice_messages() {
        assert!(Notice::BackToStart.message().contains("Back to the start"));
        assert!(Notice::ReplayingGenerated { index: 4 }
            .message()
            .contains("level 5"));
    }
}
