//! # Game Simulation
//!
//! One game as a value-in/value-out state machine.
//!
//! ```text
//! init_game_sim ──▶ Kickoff ──▶ Scrimmage ⇄ Kickoff
//!                                   │
//!                       Q4 0:00 ────┼──▶ Final
//!                 (tied, overtime)  ▼
//!                                Q5 ──▶ KickDuel ──▶ Final
//! ```
//!
//! - [`engine`]: `init_game_sim`, `step_play`, `simulate_game`
//! - [`clock`]: tempo runoff and the two-minute warning
//! - [`play_call`]: concepts, personnel, gameplans, call validation
//! - [`fourth_down`]: expected-points decision support
//! - [`log_view`]: text-derived log categories for UI adapters

pub mod clock;
pub mod engine;
pub mod fourth_down;
pub mod log_view;
pub mod play_call;
pub mod state;

pub use clock::{ClockTick, Tempo};
pub use engine::{init_game_sim, simulate_game, step_play, MAX_PLAYS_PER_GAME};
pub use fourth_down::{
    go_success_rate, recommend_fourth_down, FourthDownDecision, FourthDownOption,
    FourthDownRecommendation,
};
pub use log_view::{classify_entry, derive_log_view, parse_yards, LogCategory, LogViewEntry};
pub use play_call::{
    is_valid_call, CallSource, DefensiveFocus, Gameplan, OffensiveFocus, Personnel, PlayCall,
    PlayConcept, MAX_FIELD_GOAL_DISTANCE,
};
pub use state::{
    conditions_for_seed, DriveLogEntry, GameClock, GamePhase, GameSimParams, GameSimState,
    GameSummary, KickDuelState, OutcomeTag, OvertimeRule, PlayExplanation, PlayResult, PlayType,
    Sides, StepOutcome, TeamBox, TeamSide,
};
