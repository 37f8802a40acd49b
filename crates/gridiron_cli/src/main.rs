//! Gridiron CLI
//!
//! 경기, 일정, 시즌 시뮬레이션을 실행하고 JSON으로 출력한다.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use gridiron_core::game::derive_log_view;
use gridiron_core::{
    generate_league_schedule, run_golden_seasons, simulate_game, GameSimParams, SimMode,
    SimSystemsConfig,
};

#[derive(Parser)]
#[command(name = "gridiron")]
#[command(about = "Deterministic football game, schedule and season simulation", long_about = None)]
struct Cli {
    /// Optional JSON config file (defaults to the `GRIDIRON_PROFILE` preset)
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one game play by play
    Game {
        #[arg(long)]
        home: String,

        #[arg(long)]
        away: String,

        #[arg(long, default_value = "1")]
        seed: u32,

        /// Include the categorized drive log
        #[arg(long, default_value = "false")]
        log: bool,
    },

    /// Print the regular-season schedule
    Schedule {
        /// Comma-separated team ids
        #[arg(long, value_delimiter = ',')]
        teams: Vec<String>,

        #[arg(long, default_value = "1")]
        seed: u32,
    },

    /// Run full seasons and print golden digests
    Season {
        /// Comma-separated team ids
        #[arg(long, value_delimiter = ',')]
        teams: Vec<String>,

        #[arg(long, default_value = "1")]
        seed: u32,

        #[arg(long, default_value = "1")]
        seasons: u16,

        /// Use the aggregate score model for every game
        #[arg(long, default_value = "false")]
        aggregate: bool,
    },
}

fn load_config(path: Option<&std::path::Path>) -> Result<SimSystemsConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(SimSystemsConfig::from_env_or_default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Game { home, away, seed, log } => {
            info!("simulating {away} at {home}, seed {seed}");
            let mut summary = simulate_game(GameSimParams::new(home, away, seed), &cfg);
            let view = log.then(|| derive_log_view(&summary.log));
            if !log {
                summary.log.clear();
            }
            let out = serde_json::json!({ "summary": summary, "log_view": view });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        Commands::Schedule { teams, seed } => {
            if teams.len() < 2 {
                bail!("a schedule needs at least two teams (got {})", teams.len());
            }
            let schedule = generate_league_schedule(&teams, seed);
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }

        Commands::Season { teams, seed, seasons, aggregate } => {
            let cfg = if aggregate { cfg.with_sim_mode(SimMode::Aggregate) } else { cfg };
            let reports = run_golden_seasons(&teams, seed, seasons.max(1), &cfg)
                .context("season simulation failed")?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    Ok(())
}
