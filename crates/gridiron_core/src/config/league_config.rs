//! League, Playoff and Aggregate-Model Configuration

use serde::{Deserialize, Serialize};

/// Regular-season length in weeks.
pub const REGULAR_SEASON_WEEKS: u16 = 17;

/// Largest conference bracket supported (three conference rounds).
pub const MAX_PLAYOFF_SEEDS: usize = 8;

/// How non-user games are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimMode {
    /// Full play engine, drive log included
    #[default]
    PlayByPlay,
    /// Ratings-driven score model, no drive log
    Aggregate,
}

/// 리그 운영 파라미터
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub regular_season_weeks: u16,
    /// Teams are split into these conferences by list order
    pub conference_names: Vec<String>,
    pub playoff_seeds_per_conference: usize,
    pub sim_mode: SimMode,
    pub aggregate: AggregateConfig,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            regular_season_weeks: REGULAR_SEASON_WEEKS,
            conference_names: vec!["AFC".to_string(), "NFC".to_string()],
            playoff_seeds_per_conference: 7,
            sim_mode: SimMode::PlayByPlay,
            aggregate: AggregateConfig::default(),
        }
    }
}

/// Fast score model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateConfig {
    pub base_points: f64,
    /// Points per z of (offense - opposing defense)
    pub points_per_z: f64,
    pub home_edge: f64,
    pub score_sd: f64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            base_points: 21.5,
            points_per_z: 5.0,
            home_edge: 1.5,
            score_sd: 9.5,
        }
    }
}

/// Fourth-down decision model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FourthDownConfig {
    /// Expected points of a first down at the offense's own goal line
    pub ep_intercept: f64,
    /// Expected points gained per yard of field position
    pub ep_per_yard: f64,
    pub touchdown_value: f64,
    pub punt_net_yards: f64,
    /// Conversion rate on 4th-and-1
    pub go_base_rate: f64,
    pub go_rate_per_yard: f64,
    pub go_rate_min: f64,
    pub go_rate_max: f64,
    /// Points added to "go" when trailing late
    pub urgency_bonus: f64,
    /// Points added to the kicking options when protecting a lead late
    pub protect_lead_bonus: f64,
}

impl Default for FourthDownConfig {
    fn default() -> Self {
        Self {
            ep_intercept: -1.2,
            ep_per_yard: 0.072,
            touchdown_value: 6.95,
            punt_net_yards: 40.0,
            go_base_rate: 0.70,
            go_rate_per_yard: 0.055,
            go_rate_min: 0.08,
            go_rate_max: 0.85,
            urgency_bonus: 2.5,
            protect_lead_bonus: 0.8,
        }
    }
}
