//! Game simulation state
//!
//! `GameSimState` is a plain value. `step_play` consumes one and returns the
//! next; two successive states never share anything.

use serde::{Deserialize, Serialize};

use super::play_call::{Gameplan, PlayConcept, Personnel};
use crate::physics::{Conditions, Surface};
use crate::ratings::TeamRatings;
use crate::rng::{rng, DetRng};

// ============================================================================
// Sides
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn other(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// One value per team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sides<T> {
    pub home: T,
    pub away: T,
}

impl<T> Sides<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }

    pub fn get(&self, side: TeamSide) -> &T {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, side: TeamSide) -> &mut T {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }
}

// ============================================================================
// Phase / clock
// ============================================================================

/// Game phase. `Final` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// `possession` is the kicking team
    Kickoff,
    Scrimmage,
    /// Alternating field goals after a tied overtime
    KickDuel,
    Final,
}

/// What happens when regulation ends tied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeRule {
    /// Game ends at Q4 0:00; ties stand
    #[default]
    None,
    /// One sudden-death period, then a kick duel
    SuddenDeath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    /// 1–4, 5 = overtime
    pub quarter: u8,
    pub seconds_remaining: u16,
    pub running: bool,
    pub two_minute_warning_q2: bool,
    pub two_minute_warning_q4: bool,
}

impl GameClock {
    pub fn new(quarter_seconds: u16) -> Self {
        Self {
            quarter: 1,
            seconds_remaining: quarter_seconds,
            running: false,
            two_minute_warning_q2: false,
            two_minute_warning_q4: false,
        }
    }

    pub fn is_overtime(&self) -> bool {
        self.quarter > 4
    }

    /// Final stretch of a half (or any time in overtime).
    pub fn end_of_half(&self, threshold: u16) -> bool {
        self.is_overtime() || (matches!(self.quarter, 2 | 4) && self.seconds_remaining <= threshold)
    }

    /// "Q2 01:58" / "OT 07:10"
    pub fn display(&self) -> String {
        let label = if self.is_overtime() { "OT".to_string() } else { format!("Q{}", self.quarter) };
        format!("{label} {:02}:{:02}", self.seconds_remaining / 60, self.seconds_remaining % 60)
    }
}

/// Kick duel bookkeeping; each round both teams kick once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickDuelState {
    pub round: u8,
    pub first_kicker: TeamSide,
    /// Result of the first kick of the current round
    pub first_made: Option<bool>,
}

// ============================================================================
// Box score
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBox {
    pub plays: u32,
    pub pass_yards: i32,
    pub rush_yards: i32,
    pub touchdowns: u16,
    pub field_goals: u16,
    pub turnovers: u16,
    pub sacks_taken: u16,
    pub first_downs: u16,
    pub penalties: u16,
}

impl TeamBox {
    pub fn total_yards(&self) -> i32 {
        self.pass_yards + self.rush_yards
    }
}

// ============================================================================
// Drive log
// ============================================================================

/// Play type tag of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Run,
    Pass,
    Punt,
    FieldGoal,
    Kickoff,
    Kneel,
}

impl PlayType {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayType::Run => "run",
            PlayType::Pass => "pass",
            PlayType::Punt => "punt",
            PlayType::FieldGoal => "field_goal",
            PlayType::Kickoff => "kickoff",
            PlayType::Kneel => "kneel",
        }
    }
}

/// Structured outcome markers emitted alongside the log text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    Touchdown,
    ExtraPoint,
    FieldGoal,
    Safety,
    Interception,
    Fumble,
    FumbleLost,
    Sack,
    Incomplete,
    FirstDown,
    TurnoverOnDowns,
    Penalty,
    Timeout,
    TwoMinuteWarning,
    Punt,
    Touchback,
    Kneel,
    EndOfHalf,
}

/// One resolved play. Never rewritten once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveLogEntry {
    pub play_id: u32,
    pub drive: u16,
    pub quarter: u8,
    /// Seconds left in the quarter at the snap
    pub clock_seconds: u16,
    pub offense: String,
    pub play_type: PlayType,
    pub personnel: Personnel,
    pub down: u8,
    pub distance: u8,
    pub yards: i32,
    pub result: String,
    pub tags: Vec<OutcomeTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayExplanation {
    pub primary: String,
    pub secondary: String,
    pub coaching_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayResult {
    pub play_id: u32,
    pub play_type: PlayType,
    /// `None` for kickoffs and kick-duel attempts
    pub concept: Option<PlayConcept>,
    pub personnel: Personnel,
    pub yards: i32,
    pub text: String,
    pub tags: Vec<OutcomeTag>,
    pub explanation: PlayExplanation,
}

// ============================================================================
// Params / state
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSimParams {
    pub home_id: String,
    pub away_id: String,
    pub seed: u32,
    #[serde(default)]
    pub home_plan: Gameplan,
    #[serde(default)]
    pub away_plan: Gameplan,
    /// Derived from the team id when absent
    pub home_ratings: Option<TeamRatings>,
    pub away_ratings: Option<TeamRatings>,
    /// Derived from the seed when absent
    pub conditions: Option<Conditions>,
    #[serde(default)]
    pub overtime: OvertimeRule,
}

impl GameSimParams {
    pub fn new(home_id: impl Into<String>, away_id: impl Into<String>, seed: u32) -> Self {
        Self { home_id: home_id.into(), away_id: away_id.into(), seed, ..Default::default() }
    }

    pub fn with_overtime(mut self, rule: OvertimeRule) -> Self {
        self.overtime = rule;
        self
    }
}

/// Game-day weather for a seed: mostly dry, sometimes wet, rarely snow.
pub fn conditions_for_seed(seed: u32) -> Conditions {
    let mut r: DetRng = rng(seed as i64, Some("weather"));
    let surface_roll = r.next_f64();
    let wind_roll = r.next_f64();
    let temperature_roll = r.next_f64();
    let surface = if surface_roll < 0.55 {
        Surface::Dry
    } else if surface_roll < 0.80 {
        Surface::Turf
    } else if surface_roll < 0.94 {
        Surface::Wet
    } else {
        Surface::Snow
    };
    let wind = if surface == Surface::Turf { 0.0 } else { (wind_roll * wind_roll * 28.0).round() };
    let temperature = match surface {
        Surface::Snow => 10.0 + temperature_roll * 22.0,
        Surface::Turf => 55.0 + temperature_roll * 20.0,
        Surface::Dry | Surface::Wet => 20.0 + temperature_roll * 65.0,
    };
    Conditions::new(surface, wind).with_temperature(temperature.round())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSimState {
    pub seed: u32,
    pub team_ids: Sides<String>,
    pub ratings: Sides<TeamRatings>,
    pub plans: Sides<Gameplan>,
    pub conditions: Conditions,
    pub overtime: OvertimeRule,

    pub phase: GamePhase,
    pub clock: GameClock,
    pub score: Sides<u16>,
    pub timeouts: Sides<u8>,

    /// Offense in `Scrimmage`, kicking team in `Kickoff`, next kicker in `KickDuel`
    pub possession: TeamSide,
    pub down: u8,
    pub distance: u8,
    /// Yards from the offense's own goal line (1–99)
    pub ball_on: u8,
    /// Safety free kicks come from the 20
    pub free_kick: bool,

    /// Receiving team of the opening kickoff; kicks off the second half
    pub opening_receiver: TeamSide,
    pub drive: u16,
    pub play_in_drive: u16,
    /// Drives started per team (first drive = 1)
    pub drives_started: Sides<u16>,
    pub plays: u32,
    pub kick_duel: Option<KickDuelState>,

    pub box_score: Sides<TeamBox>,
    pub log: Vec<DriveLogEntry>,
}

impl GameSimState {
    pub fn is_final(&self) -> bool {
        self.phase == GamePhase::Final
    }

    pub fn offense(&self) -> TeamSide {
        self.possession
    }

    pub fn defense(&self) -> TeamSide {
        self.possession.other()
    }

    pub fn team_id(&self, side: TeamSide) -> &str {
        self.team_ids.get(side)
    }

    /// Score margin from `side`'s point of view.
    pub fn margin(&self, side: TeamSide) -> i32 {
        *self.score.get(side) as i32 - *self.score.get(side.other()) as i32
    }

    pub fn yards_to_goal(&self) -> u8 {
        100 - self.ball_on.clamp(1, 99)
    }

    /// Leading team, `None` while tied.
    pub fn leader(&self) -> Option<TeamSide> {
        match self.score.home.cmp(&self.score.away) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Offense fatigue from the length of the current drive `[0, 1]`.
    pub fn drive_fatigue(&self) -> f64 {
        (self.play_in_drive as f64 * 0.04).min(1.0)
    }
}

/// Final result of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub home_id: String,
    pub away_id: String,
    pub home_score: u16,
    pub away_score: u16,
    /// `None` on a tie
    pub winner: Option<String>,
    pub plays: u32,
    pub overtime: bool,
    pub kick_duel: bool,
    pub conditions: Conditions,
    pub box_score: Sides<TeamBox>,
    pub log: Vec<DriveLogEntry>,
}

impl GameSummary {
    pub fn from_state(state: GameSimState) -> Self {
        let winner = state.leader().map(|side| state.team_id(side).to_string());
        Self {
            home_id: state.team_ids.home,
            away_id: state.team_ids.away,
            home_score: state.score.home,
            away_score: state.score.away,
            winner,
            plays: state.plays,
            overtime: state.clock.is_overtime(),
            kick_duel: state.kick_duel.is_some(),
            conditions: state.conditions,
            box_score: state.box_score,
            log: state.log,
        }
    }
}

/// Result of one `step_play` call.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub state: GameSimState,
    /// `None` when the game was already final
    pub result: Option<PlayResult>,
}
