use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use wraptile_core::{
    Coord2, GameClock, GameConfig, Level, PlayEngine, PlayOutcome, Point, ToPoint, iter_coords,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML file with game settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Level to start at, overrides the config file
    #[arg(short, long)]
    level: Option<Level>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of plays before stopping
    #[arg(short, long, default_value_t = 30)]
    plays: u32,

    /// Name put on the score record
    #[arg(short, long, default_value = "wraptile")]
    name: String,
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Could not parse config {}", path.display()))
}

/// Picks the next play: first playable hand tile, at its first legal cell.
///
/// A cell already carrying the tile's color wins over the first legal one.
fn choose_play(engine: &PlayEngine) -> Option<(Coord2, Point)> {
    let board = engine.board();
    engine.hand().cells().find_map(|(coords, cell)| {
        let tile = cell.tile().filter(|_| cell.is_playable())?;
        let mut legal = iter_coords(board.size())
            .map(ToPoint::to_point)
            .filter(|&point| tile.can_play(board, point))
            .peekable();
        let first = *legal.peek()?;
        let point = legal
            .find(|&point| board.color_at(point) == tile.color())
            .unwrap_or(first);
        Some((coords, point))
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(level) = args.level {
        config.start_level = level;
    }
    let config = config.validate().context("Invalid game settings")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {}, config: {:?}", seed, config);

    let clock = GameClock::start();
    let mut engine = PlayEngine::new(config, seed);
    log::info!("Starting board:\n{}", engine.board());

    let mut plays = 0;
    while plays < args.plays {
        let Some((hand, point)) = choose_play(&engine) else {
            log::info!("Nothing left to play");
            break;
        };
        match engine.play_from_hand(hand, point, clock.now()) {
            PlayOutcome::Played(report) => {
                plays += 1;
                log::debug!("Play {}: {:?}", plays, report);
            }
            outcome => anyhow::bail!("Play of hand {hand:?} at {point:?} failed: {outcome:?}"),
        }
    }

    log::info!(
        "Finished after {} plays at level {}:\n{}",
        plays,
        engine.level(),
        engine.board()
    );
    let record = engine.finish(args.name);
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}
