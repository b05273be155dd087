#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays tactics in the terminal.
//!
//! Key names arrive either through `--keys` or one per line on standard
//! input; each one is translated, applied and followed by a text frame.

mod config;
mod scene;
mod session;
mod text_backend;

use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tactics_core::Settings;
use tactics_rendering::RenderingBackend;
use tactics_system_input::Input;
use tactics_world::{query, Game};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::CliConfig,
    session::{Session, DEFAULT_CPU_LIMIT},
    text_backend::TextBackend,
};

/// Command-line arguments for the tactics terminal client.
#[derive(Debug, Parser)]
#[command(name = "tactics", about = "Turn-based tactics played from the terminal")]
struct CliArgs {
    /// TOML file holding settings and extra key bindings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Comma separated key names to play instead of reading standard input.
    #[arg(long, value_name = "KEYS", value_delimiter = ',')]
    keys: Option<Vec<String>>,

    /// End turns automatically once every unit has moved.
    #[arg(long)]
    auto_end: bool,

    /// Disable movement and combat effects.
    #[arg(long)]
    no_animations: bool,

    /// Skip drawing frames.
    #[arg(long)]
    no_frames: bool,

    /// Print the final game state as JSON before exiting.
    #[arg(long)]
    dump_state: bool,

    /// Maximum number of computer actions played after a single key.
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_CPU_LIMIT)]
    cpu_limit: usize,
}

impl CliArgs {
    fn settings(&self, configured: Settings) -> Settings {
        let mut settings = configured;
        settings.auto_end |= self.auto_end;
        if self.no_animations {
            settings.movement_animations = false;
            settings.combat_animations = false;
        }
        settings
    }
}

/// Entry point for the tactics command-line interface.
fn main() -> Result<()> {
    setup_logging();
    run(CliArgs::parse())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let settings = args.settings(config.settings);
    info!(?settings, "starting tactics");

    let mut session = Session::new(Input::new(config.keys), args.cpu_limit);
    let game = session.bootstrap().initial_game(settings);
    let mut backend = (!args.no_frames).then(|| TextBackend::new(io::stdout()));

    let keys: Box<dyn Iterator<Item = Result<String>>> = match args.keys {
        Some(keys) => Box::new(keys.into_iter().map(Ok)),
        None => Box::new(
            io::stdin()
                .lock()
                .lines()
                .map(|line| line.context("failed to read key from standard input")),
        ),
    };
    let game = play(&mut session, game, keys, backend.as_mut())?;
    drop(backend);

    if args.dump_state {
        let state = serde_json::to_string_pretty(&game).context("failed to serialize game state")?;
        println!("{state}");
    }
    info!(quit = query::should_terminate(&game), "tactics finished");
    Ok(())
}

/// Feeds keys to the session until input ends or the game asks to quit.
///
/// No key is read once the game is terminating.
fn play<I, B>(
    session: &mut Session,
    mut game: Game,
    keys: I,
    mut backend: Option<&mut B>,
) -> Result<Game>
where
    I: IntoIterator<Item = Result<String>>,
    B: RenderingBackend,
{
    present(backend.as_deref_mut(), &game)?;
    if query::should_terminate(&game) {
        return Ok(game);
    }

    for key in keys {
        let key = key?;
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let (next, events) = session.press(game, key);
        game = next;
        if events.is_some() {
            present(backend.as_deref_mut(), &game)?;
        }
        if query::should_terminate(&game) {
            break;
        }
    }
    Ok(game)
}

fn present<B>(backend: Option<&mut B>, game: &Game) -> Result<()>
where
    B: RenderingBackend,
{
    let Some(backend) = backend else {
        return Ok(());
    };
    let presentation = scene::presentation(game).context("failed to describe frame")?;
    backend.present(&presentation)
}
