use std::fs::OpenOptions;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Target;
use log::info;

use fifteen::config::Config;
use fifteen::terminal::{self, format_elapsed, RawSession, TerminalFrontend};
use fifteen::{Controller, NewGame, ScoreStore};

#[derive(Parser, Debug)]
#[command(name = "fifteen", version, about = "The 15-puzzle in your terminal")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seed for reproducible shuffles
    #[arg(long)]
    seed: Option<u64>,
    /// Start by replaying the stored game at this place (1 is the best)
    #[arg(long, value_name = "PLACE")]
    replay: Option<NonZeroUsize>,
    /// Print the best times and exit
    #[arg(long)]
    scores: bool,
    /// Do not read or write the score file
    #[arg(long)]
    no_scores: bool,
    /// Log filter, e.g. "info" or "fifteen=debug". RUST_LOG wins if set.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_toml(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_scores {
        config.scores.enabled = false;
    }

    let interactive = !args.scores;
    let target = log_target(&config, interactive)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .target(target)
        .init();

    let store = config
        .scores
        .enabled
        .then(|| ScoreStore::new(&config.scores.path, config.scores.capacity));

    if args.scores {
        return print_scores(store.as_ref());
    }

    let source = start_source(args.replay, &config)?;
    let replay = config.scores.enabled && config.replay.enabled;

    let mut frontend = TerminalFrontend::new(io::stdout());
    if !replay {
        frontend = frontend.without_replay();
    }
    let mut ctl = Controller::new(frontend);
    if let Some(seed) = config.seed {
        ctl = ctl.with_seed(seed);
    }
    if let Some(store) = store {
        info!("keeping scores in {}", store.path().display());
        ctl = ctl.with_scores(store, config.replay.enabled);
    }

    let session = RawSession::enter().context("switching the terminal to raw mode")?;
    ctl.request_new_game(true, source);
    let outcome = terminal::run(&mut ctl, Duration::from_millis(config.ui.tick_millis));
    drop(session);

    outcome.context("terminal event loop")
}

/// The terminal UI owns stderr's screen, so interactive runs log to a file.
fn log_target(config: &Config, interactive: bool) -> Result<Target> {
    if !interactive {
        return Ok(Target::Stderr);
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;
    Ok(Target::Pipe(Box::new(file)))
}

fn start_source(replay: Option<NonZeroUsize>, config: &Config) -> Result<NewGame> {
    match replay {
        Some(_) if !config.scores.enabled => bail!("--replay needs score keeping enabled"),
        Some(_) if !config.replay.enabled => bail!("--replay needs [replay] enabled"),
        Some(place) => Ok(NewGame::Replay(place.get() - 1)),
        None => Ok(NewGame::Shuffle),
    }
}

fn print_scores(store: Option<&ScoreStore>) -> Result<()> {
    let Some(store) = store else {
        println!("Score keeping is disabled.");
        return Ok(());
    };

    let board = store
        .load()
        .with_context(|| format!("reading scores from {}", store.path().display()))?;
    if board.is_empty() {
        println!("No scores yet.");
        return Ok(());
    }

    for (place, record) in board.records().iter().enumerate() {
        let replay = if record.initial.is_some() { "  [replayable]" } else { "" };
        println!(
            "{:>2}. {}  {:>4} moves{}",
            place + 1,
            format_elapsed(record.elapsed_secs),
            record.moves,
            replay
        );
    }
    Ok(())
}
