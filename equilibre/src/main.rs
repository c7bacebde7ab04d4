//! equilibre: a terminal game for balancing chemical equations
//!
//! The player adjusts stoichiometric coefficients until every element has the
//! same atom count on both sides. Four built-in levels ship with the game;
//! past them, an LLM tutor invents new ones and answers hint requests.
//!
//! Without an API key the game stays fully playable offline.

mod config;
mod input;
mod render;
mod session;

use std::io::Write;

use anyhow::Context;
use balance::{Catalog, Game};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use config::{Config, Provider};
use render::Renderer;
use session::{Session, Step};

#[derive(Parser)]
#[command(name = "equilibre")]
#[command(about = "Balance chemical equations, with an AI tutor")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "equilibre.toml")]
    config: String,

    /// API key for the generative model
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model provider (overrides config file)
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// Model name (overrides config file)
    #[arg(long)]
    model: Option<String>,

    /// API endpoint (overrides config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Play without the AI tutor
    #[arg(long)]
    offline: bool,

    /// Level to start on, counted from 1 (overrides config file)
    #[arg(short, long)]
    level: Option<usize>,

    /// Disable coloured atoms
    #[arg(long)]
    no_color: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with the board
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("equilibre=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;

    // Apply CLI overrides
    if let Some(provider) = cli.provider {
        config.ai.provider = provider;
    }
    if let Some(model) = cli.model {
        config.ai.model = Some(model);
    }
    if let Some(base_url) = cli.base_url {
        config.ai.base_url = Some(base_url);
    }
    if let Some(level) = cli.level {
        config.game.start_level = level;
    }

    let tutor = if cli.offline {
        info!("Offline mode, AI features disabled");
        tutor_agent::TutorService::disabled()
    } else {
        let api_key = cli
            .api_key
            .or_else(|| std::env::var("GEMINI_API_KEY").ok());
        config.tutor(api_key)
    };

    let start = config.game.start_level.max(1) - 1;
    let game = Game::starting_at(Catalog::new(), start)
        .with_context(|| format!("Cannot start at level {}", config.game.start_level))?;

    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
    let mut session = Session::new(game, tutor, Renderer::new(color));

    let mut stdout = std::io::stdout();
    let intro = session.start().await;
    write!(stdout, "{intro}\n> ")?;
    stdout.flush()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match session.handle_line(&line).await {
            Step::Continue(text) => write!(stdout, "{text}\n> ")?,
            Step::Quit => break,
        }
        stdout.flush()?;
    }

    writeln!(stdout, "\nFinal score: {}", session.game().score())?;
    Ok(())
}
