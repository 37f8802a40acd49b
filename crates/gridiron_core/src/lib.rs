//! # gridiron_core - Deterministic Football Simulation Engine
//!
//! Play-by-play, league and playoff simulation for American football.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same result)
//! - Context-keyed RNG streams, so independent games can run in parallel
//! - Rating-driven physics resolvers with clamped probabilities
//! - Season pipeline: schedule → weekly sim → playoffs → champion
//! - Golden-season harness with SHA-256 regression digests

// Allow unused code for features under development
#![allow(dead_code)]
// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
#![allow(clippy::empty_line_after_doc_comments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Resolver inputs often require many parameters
#![allow(clippy::too_many_arguments)]
// Complex types are sometimes necessary for generic APIs
#![allow(clippy::type_complexity)]
// Large enum variants - boxing would require API changes
#![allow(clippy::large_enum_variant)]
// Loop style - can fix incrementally
#![allow(clippy::needless_range_loop)]
// Method naming conventions - would require API changes
#![allow(clippy::wrong_self_convention)]
#![allow(clippy::should_implement_trait)]

pub mod config;
pub mod error;
pub mod game;
pub mod harness;
pub mod league;
pub mod physics;
pub mod playoffs;
pub mod ratings;
pub mod rng;

pub use config::{SimMode, SimSystemsConfig};
pub use error::{Result, SimError};

// Re-export the game engine
pub use game::{
    init_game_sim, recommend_fourth_down, simulate_game, step_play, GameSimParams, GameSimState,
    GameSummary, PlayCall, StepOutcome,
};

// Re-export the season pipeline
pub use harness::{run_golden_season, run_golden_seasons, run_season, GoldenSeasonReport, SeasonRun};
pub use league::{
    generate_league_schedule, init_league_state, simulate_league_week, simulate_regular_season,
    simulate_week, LeagueState, Schedule, WeekSimArgs, WeekSimOutcome,
};
pub use playoffs::{
    advance_playoff_round, build_playoff_bracket, get_playoff_round_games,
    simulate_cpu_playoff_games_for_round, simulate_playoffs, PlayoffBracket, PlayoffOutcome,
    PostseasonRecord,
};
pub use rng::{hash_seed, mulberry32, rng, DetRng};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn sha256_hex(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut out = String::with_capacity(digest.len() * 2);
        for b in digest {
            out.push_str(&format!("{:02x}", b));
        }
        out
    }

    #[test]
    fn test_game_summary_json_determinism_sha256() {
        let cfg = SimSystemsConfig::default();
        let params = GameSimParams::new("HOME", "AWAY", 123456);

        let first = serde_json::to_string(&simulate_game(params.clone(), &cfg)).unwrap();
        let second = serde_json::to_string(&simulate_game(params, &cfg)).unwrap();

        assert_eq!(sha256_hex(first.as_bytes()), sha256_hex(second.as_bytes()));
    }

    #[test]
    fn test_game_terminates_under_play_cap() {
        let cfg = SimSystemsConfig::default();
        for seed in [1u32, 42, 9_999, 424_242] {
            let summary = simulate_game(GameSimParams::new("A", "B", seed), &cfg);
            assert!(summary.plays < game::MAX_PLAYS_PER_GAME, "seed {seed}: {} plays", summary.plays);
        }
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(SCHEMA_VERSION, 1);
    }
}
