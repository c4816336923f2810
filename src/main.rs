use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use blockfall::{
    config::{DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_TICK_MS},
    piece::{PieceProvider, RandomPieceProvider},
    session, Command, Game, GridConfig, SessionConfig,
};

mod tui;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct CommandArgs {
    /// Write engine logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Apply a script of commands and print the resulting state as JSON
    Replay(#[clap(flatten)] ReplayArg),
}

#[derive(Default, Debug, Clone, clap::Args)]
struct GridArg {
    /// Grid width in cells, clamped to 4..=30
    #[arg(long)]
    width: Option<usize>,
    /// Grid height in cells, clamped to 4..=40
    #[arg(long)]
    height: Option<usize>,
    /// Seed for piece selection
    #[arg(long)]
    seed: Option<u64>,
}

impl GridArg {
    fn grid_config(&self) -> GridConfig {
        GridConfig::clamped(
            self.width.unwrap_or(DEFAULT_GRID_WIDTH),
            self.height.unwrap_or(DEFAULT_GRID_HEIGHT),
        )
    }

    fn piece_provider(&self) -> Box<dyn PieceProvider> {
        match self.seed {
            Some(seed) => Box::new(RandomPieceProvider::seeded(seed)),
            None => Box::new(RandomPieceProvider::new()),
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
struct PlayArg {
    #[clap(flatten)]
    grid: GridArg,
    /// Gravity period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

#[derive(Debug, Clone, clap::Args)]
struct ReplayArg {
    #[clap(flatten)]
    grid: GridArg,
    /// Script with one command per line; reads stdin when omitted
    script: Option<PathBuf>,
    /// Print a snapshot after every command instead of only the last one
    #[arg(long)]
    every: bool,
}

fn main() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.log_file.as_deref())?;

    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => run_play(&arg)?,
        Mode::Replay(arg) => run_replay(&arg)?,
    }
    Ok(())
}

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn run_play(arg: &PlayArg) -> anyhow::Result<()> {
    let mut game = Game::with_config(arg.grid.grid_config(), arg.grid.piece_provider());
    let config = SessionConfig {
        tick_interval: Duration::from_millis(arg.tick_ms.unwrap_or(DEFAULT_TICK_MS)),
    };

    let mut renderer = tui::TerminalRenderer::enter()?;
    let result = session::run(&mut game, &mut tui::KeyboardInput, &mut renderer, &config);
    renderer.leave()?;
    result?;

    Ok(())
}

fn run_replay(arg: &ReplayArg) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = match &arg.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut game = Game::with_config(arg.grid.grid_config(), arg.grid.piece_provider());
    let mut out = io::stdout().lock();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: Command = line
            .parse()
            .with_context(|| format!("line {}: `{line}`", index + 1))?;
        game.apply(command);

        if arg.every {
            serde_json::to_writer(&mut out, &game.snapshot())?;
            writeln!(out)?;
        }
    }

    if !arg.every {
        serde_json::to_writer_pretty(&mut out, &game.snapshot())?;
        writeln!(out)?;
    }
    Ok(())
}
