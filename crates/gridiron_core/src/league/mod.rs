//! # League
//!
//! Season pipeline from schedule to final standings:
//!
//! - [`phase`]: preseason → regular season → playoffs → offseason
//! - [`schedule`]: seeded circle-method schedule
//! - [`state`]: standings, results, conferences
//! - [`week`]: weekly simulation (play-by-play or aggregate)
//! - [`rankings`]: power rankings and the MVP race

pub mod phase;
pub mod rankings;
pub mod schedule;
pub mod state;
pub mod week;

pub use phase::{advance_phase, advance_phase_key, LeagueEvent, LeaguePhase};
pub use rankings::{
    compute_power_rankings, tally_week_awards, AwardsTally, PlayerOfTheWeek, PowerRankingEntry,
    WeeklyAwards,
};
pub use schedule::{
    generate_league_schedule, generate_schedule_with_weeks, Matchup, Schedule, ScheduleWeek,
};
pub use state::{
    init_league_state, Conference, GameResult, GameType, LeagueState, StandingsRecord,
};
pub use week::{
    game_seed, simulate_league_week, simulate_matchup, simulate_regular_season, simulate_week,
    MatchupScore, UserGame, UserScore, WeekSimArgs, WeekSimOutcome,
};
