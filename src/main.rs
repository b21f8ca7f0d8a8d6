use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use multisnake::game::{GameConfig, MatchKind};
use multisnake::input::InputHandler;
use multisnake::modes::PlayMode;
use rand::{SeedableRng, rngs::StdRng};
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "multisnake")]
#[command(version, about = "Multiplayer snake for the terminal")]
struct Cli {
    /// JSON configuration file
    #[arg(default_value = "config.json")]
    config: PathBuf,

    /// Match kind; `auto` picks from the number of configured players
    #[arg(long, default_value = "auto")]
    mode: Mode,

    /// Milliseconds between game ticks
    #[arg(long, default_value = "100")]
    tick_ms: u64,

    /// Seed for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,

    /// Log destination; the terminal is owned by the game
    #[arg(long, default_value = "multisnake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Auto,
    /// Exactly one player
    Solo,
    /// Two or more players
    Versus,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    // Everything that can be rejected is checked before the terminal is taken over
    let config = GameConfig::load(&cli.config)?;
    config.validate().context("Invalid configuration")?;
    match cli.mode {
        Mode::Auto => {}
        Mode::Solo => config.expect_match_kind(MatchKind::Solo)?,
        Mode::Versus => config.expect_match_kind(MatchKind::Versus)?,
    }
    let input_handler = InputHandler::new(&config.players).context("Invalid key bindings")?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "starting {:?} match with {} player(s) on {}x{}",
        config.match_kind(),
        config.players.len(),
        config.width,
        config.height
    );

    let mut play_mode = PlayMode::new(
        config,
        input_handler,
        rng,
        Duration::from_millis(cli.tick_ms.max(1)),
    );
    play_mode.run().await?;

    Ok(())
}
