//! Game Clock Configuration

use serde::{Deserialize, Serialize};

/// 경기 시계 파라미터 (초 단위)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    pub quarter_seconds: u16,
    pub overtime_seconds: u16,
    /// Two-minute warning threshold
    pub two_minute_threshold: u16,
    pub timeouts_per_half: u8,

    // === Pre-snap runoff (clock running) ===
    pub huddle_normal: u16,
    pub huddle_hurry_up: u16,
    pub huddle_milk: u16,

    // === Snap-to-whistle durations ===
    pub run_duration: u16,
    pub pass_complete_duration: u16,
    pub pass_incomplete_duration: u16,
    pub sack_duration: u16,
    pub punt_duration: u16,
    pub field_goal_duration: u16,
    pub kickoff_duration: u16,
    pub kneel_duration: u16,

    /// Hard stop for an overtime kick duel
    pub max_kick_duel_rounds: u8,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            quarter_seconds: 900,
            overtime_seconds: 600,
            two_minute_threshold: 120,
            timeouts_per_half: 3,

            huddle_normal: 32,
            huddle_hurry_up: 14,
            huddle_milk: 38,

            run_duration: 5,
            pass_complete_duration: 6,
            pass_incomplete_duration: 5,
            sack_duration: 6,
            punt_duration: 9,
            field_goal_duration: 5,
            kickoff_duration: 6,
            kneel_duration: 2,

            max_kick_duel_rounds: 10,
        }
    }
}
