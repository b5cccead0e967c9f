use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use rampart_app::logging::init_logging;
use rampart_app::session::{run_headless, run_realtime, TowerOrder};
use rampart_app::state::AppState;
use rampart_sim::engine::SimConfig;

#[derive(Parser)]
#[command(
    name = "rampart",
    version = env!("CARGO_PKG_VERSION"),
    about = "Run a tower-defense session and print the final snapshot as JSON",
    long_about = None,
)]
struct Args {
    /// JSON file with a SimConfig; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Path layout, 1 to 3.
    #[arg(long)]
    level: Option<u32>,

    /// Simulated seconds to run.
    #[arg(long, default_value_t = 30.0)]
    seconds: f64,

    /// Tower to build at start, as KIND@X,Y. Repeatable.
    #[arg(long = "tower")]
    towers: Vec<TowerOrder>,

    /// Pace the session on the game loop thread instead of running flat out.
    #[arg(long)]
    realtime: bool,

    #[arg(long)]
    pretty: bool,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(level) = args.level {
        config.level = level;
    }
    info!(
        "Seed {}, level {}, {} tower(s), {}s",
        config.seed,
        config.level,
        args.towers.len(),
        args.seconds
    );

    let snapshot = if args.realtime {
        run_realtime(&AppState::new(), config, &args.towers, args.seconds)?
    } else {
        run_headless(config, &args.towers, args.seconds)
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{json}");
    Ok(())
}
