//! # Playoffs
//!
//! 정규시즌 순위로 시드를 정하고, 라운드 단위로 진행해 챔피언을 가린다.
//!
//! - [`bracket`]: seeding rule, rounds, bracket data
//! - [`engine`]: build, play and advance rounds
//! - [`result`]: per-team postseason record

pub mod bracket;
pub mod engine;
pub mod result;

pub use bracket::{
    seeds_per_conference, CompletedGame, ConferenceBracket, PlayoffBracket, PlayoffGame,
    PlayoffGameResult, PlayoffRound, SeededTeam, SeedingRule,
};
pub use engine::{
    advance_playoff_round, build_playoff_bracket, get_playoff_round_games, playoff_game_seed,
    simulate_cpu_playoff_games_for_round, simulate_playoffs, PlayoffOutcome,
};
pub use result::{postseason_record, PostseasonRecord, TeamPostseasonResult};
