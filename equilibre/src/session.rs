//! Drives a [`Game`] from player input, running the commands it emits.

use std::collections::VecDeque;

use balance::{Action, Command, Game};
use tracing::debug;
use tutor_agent::TutorService;

use crate::input::{self, Input, HELP};
use crate::render::Renderer;

/// What the front end should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Print this and read the next line
    Continue(String),
    Quit,
}

pub struct Session {
    game: Game,
    tutor: TutorService,
    renderer: Renderer,
}

impl Session {
    pub fn new(game: Game, tutor: TutorService, renderer: Renderer) -> Self {
        Self {
            game,
            tutor,
            renderer,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Text shown before the first prompt. Runs any command the game
    /// produced while starting up.
    pub async fn start(&mut self) -> String {
        let mut out = String::from("Balance the equation: make every atom count match on both sides.\n");
        if !self.tutor.is_enabled() {
            out.push_str("AI tutor unavailable (no API key): hints and new levels are disabled.\n");
        }
        out.push_str("Type 'help' for commands.\n\n");
        let startup = self.game.take_pending();
        out.push_str(&self.run(startup).await);
        out.push_str(&self.renderer.board(&self.game));
        out
    }

    /// Handle one line of input.
    pub async fn handle_line(&mut self, line: &str) -> Step {
        match input::parse(line) {
            Ok(Input::Quit) => Step::Quit,
            Ok(Input::Help) => Step::Continue(HELP.to_string()),
            Ok(parsed) => {
                let mut out = String::new();
                if let Some(action) = parsed.action() {
                    out.push_str(&self.apply(action).await);
                }
                out.push_str(&self.renderer.board(&self.game));
                Step::Continue(out)
            }
            Err(e) => Step::Continue(format!("{e}\n")),
        }
    }

    /// Dispatch `action` and run every command that follows from it.
    ///
    /// Returns messages produced along the way.
    pub async fn apply(&mut self, action: Action) -> String {
        let commands = self.game.dispatch(action);
        self.run(commands).await
    }

    async fn run(&mut self, commands: Vec<Command>) -> String {
        let mut messages = String::new();
        let mut queue: VecDeque<Command> = commands.into();

        while let Some(command) = queue.pop_front() {
            debug!(?command, "Running command");
            let follow_up = match command {
                Command::Celebrate { score } => {
                    messages.push_str(&format!("*** Well done! Score: {score} ***\n\n"));
                    continue;
                }
                Command::GenerateLevel {
                    ticket,
                    exclude_names,
                } => {
                    let level = self.tutor.generate_level(&exclude_names).await;
                    Action::LevelGenerated { ticket, level }
                }
                Command::FetchHint { ticket, level } => {
                    let text = self.tutor.get_hint(&level).await;
                    Action::HintReady { ticket, text }
                }
            };
            queue.extend(self.game.dispatch(follow_up));
        }
        messages
    }
}
