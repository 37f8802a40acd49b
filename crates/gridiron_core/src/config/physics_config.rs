//! Physics Resolver Configuration
//!
//! Every probability a resolver produces is clamped into one of the bands
//! below, so no combination of ratings forces a certain outcome.

use serde::{Deserialize, Serialize};

use crate::ratings::ProbBand;

/// 모든 resolver 튜닝 파라미터
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub fumble: FumbleConfig,
    pub pass_rush: PassRushConfig,
    pub contact: ContactConfig,
    pub pile: PileConfig,
    pub kick: KickConfig,
    pub ballistics: BallisticsConfig,
    pub penalty: PenaltyConfig,
}

/// Ball-security parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FumbleConfig {
    /// 기본 펌블 확률 (기본: 0.012)
    pub base_rate: f64,
    /// Per z of carrier ball security (subtracted)
    pub security_weight: f64,
    /// Per z of the hitter's power
    pub hitter_weight: f64,
    pub wet_bonus: f64,
    pub snow_bonus: f64,
    /// Scaled by [`crate::physics::Conditions::cold`]
    #[serde(default = "default_cold_fumble_bonus")]
    pub cold_bonus: f64,
    /// Scaled by fatigue in `[0, 1]`
    pub fatigue_weight: f64,
    /// Strip sacks, blind-side hits
    pub blind_side_bonus: f64,
    pub gang_tackle_bonus: f64,
    pub band: ProbBand,
    /// Share of bounces travelling backward
    pub backward_share: f64,
    pub max_backward_bounce: f64,
    pub max_forward_bounce: f64,
    pub weird_base: f64,
    pub weird_wet_bonus: f64,
    pub weird_snow_bonus: f64,
    pub weird_band: ProbBand,
    /// Extra yards a weird bounce travels
    pub weird_extra_yards: f64,
    pub defense_recovery_base: f64,
    /// Backward bounces favor the defense by this much
    pub backward_recovery_shift: f64,
    pub recovery_band: ProbBand,
}

fn default_cold_fumble_bonus() -> f64 {
    0.006
}

impl Default for FumbleConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.012,
            security_weight: 0.006,
            hitter_weight: 0.004,
            wet_bonus: 0.009,
            snow_bonus: 0.012,
            cold_bonus: default_cold_fumble_bonus(),
            fatigue_weight: 0.006,
            blind_side_bonus: 0.030,
            gang_tackle_bonus: 0.004,
            band: ProbBand::new(0.002, 0.12),
            backward_share: 0.55,
            max_backward_bounce: 8.0,
            max_forward_bounce: 5.0,
            weird_base: 0.08,
            weird_wet_bonus: 0.10,
            weird_snow_bonus: 0.14,
            weird_band: ProbBand::new(0.02, 0.50),
            weird_extra_yards: 6.0,
            defense_recovery_base: 0.50,
            backward_recovery_shift: 0.06,
            recovery_band: ProbBand::new(0.25, 0.75),
        }
    }
}

/// Pocket pressure parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassRushConfig {
    /// 기본 압박 확률 (기본: 0.28)
    pub base_pressure: f64,
    pub bend_weight: f64,
    pub power_weight: f64,
    pub pass_pro_weight: f64,
    pub quick_drop_mod: f64,
    pub deep_drop_mod: f64,
    pub blitz_mod: f64,
    pub play_action_mod: f64,
    /// Applied per unit of rusher fatigue (negative: tired rushers pressure less)
    pub fatigue_weight: f64,
    pub pressure_band: ProbBand,
    /// Share of pressures that become sacks
    pub sack_share_base: f64,
    pub poise_weight: f64,
    pub sack_share_band: ProbBand,
    pub base_time_to_pressure: f64,
    pub min_sack_yards: f64,
    pub max_sack_yards: f64,
}

impl Default for PassRushConfig {
    fn default() -> Self {
        Self {
            base_pressure: 0.28,
            bend_weight: 0.07,
            power_weight: 0.04,
            pass_pro_weight: 0.09,
            quick_drop_mod: -0.12,
            deep_drop_mod: 0.10,
            blitz_mod: 0.08,
            play_action_mod: 0.03,
            fatigue_weight: -0.05,
            pressure_band: ProbBand::new(0.05, 0.75),
            sack_share_base: 0.28,
            poise_weight: 0.06,
            sack_share_band: ProbBand::new(0.08, 0.60),
            base_time_to_pressure: 2.9,
            min_sack_yards: 3.0,
            max_sack_yards: 10.0,
        }
    }
}

/// Ball-carrier vs tackler parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    pub stuff_base: f64,
    pub stuff_block_weight: f64,
    pub stuff_defense_weight: f64,
    /// Open-field (YAC, returns) stuffs are rarer
    pub open_field_stuff_scale: f64,
    pub stuff_band: ProbBand,
    pub max_stuff_loss: i32,
    pub break_base: f64,
    pub break_elusive_weight: f64,
    pub break_power_weight: f64,
    pub break_tackle_weight: f64,
    pub break_band: ProbBand,
    /// Extra yards after a broken tackle
    pub broken_tackle_yards: f64,
    /// Yards per z of (blocking - defenders) advantage
    pub leverage_yards: f64,
    pub gain_sd: f64,
    pub breakaway_base: f64,
    pub breakaway_elusive_weight: f64,
    pub breakaway_band: ProbBand,
    pub breakaway_min: f64,
    pub breakaway_max: f64,
    pub wet_gain_penalty: f64,
    pub snow_gain_penalty: f64,
    pub fatigue_gain_penalty: f64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            stuff_base: 0.22,
            stuff_block_weight: 0.13,
            stuff_defense_weight: 0.13,
            open_field_stuff_scale: 0.6,
            stuff_band: ProbBand::new(0.14, 0.86),
            max_stuff_loss: 4,
            break_base: 0.16,
            break_elusive_weight: 0.05,
            break_power_weight: 0.03,
            break_tackle_weight: 0.06,
            break_band: ProbBand::new(0.03, 0.55),
            broken_tackle_yards: 5.0,
            leverage_yards: 1.1,
            gain_sd: 2.6,
            breakaway_base: 0.10,
            breakaway_elusive_weight: 0.03,
            breakaway_band: ProbBand::new(0.01, 0.30),
            breakaway_min: 12.0,
            breakaway_max: 60.0,
            wet_gain_penalty: 0.6,
            snow_gain_penalty: 1.1,
            fatigue_gain_penalty: 1.0,
        }
    }
}

/// Short-yardage scrum parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PileConfig {
    pub base_push: f64,
    pub push_weight: f64,
    pub carrier_weight: f64,
    pub anchor_weight: f64,
    pub fill_weight: f64,
    /// Per yard to go beyond the first
    pub distance_penalty: f64,
    pub snow_penalty: f64,
    pub push_band: ProbBand,
    /// Maximum yards past the line to gain (see `PILE_BONUS_YARDS`)
    pub bonus_yards: i32,
    pub max_loss: i32,
}

impl Default for PileConfig {
    fn default() -> Self {
        Self {
            base_push: 0.66,
            push_weight: 0.08,
            carrier_weight: 0.04,
            anchor_weight: 0.08,
            fill_weight: 0.04,
            distance_penalty: 0.10,
            snow_penalty: 0.04,
            push_band: ProbBand::new(0.15, 0.85),
            bonus_yards: 2,
            max_loss: 2,
        }
    }
}

/// Field goal, punt and kickoff parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickConfig {
    // === Field goal ===
    pub fg_base_logit: f64,
    /// Logit lost per yard beyond 20
    pub fg_distance_slope: f64,
    pub fg_accuracy_weight: f64,
    pub fg_range_base: f64,
    pub fg_range_power_weight: f64,
    /// Logit lost per yard beyond the kicker's range
    pub fg_beyond_range_penalty: f64,
    pub fg_wind_weight: f64,
    pub fg_wet_penalty: f64,
    pub fg_snow_penalty: f64,
    /// Logit lost at full cold (0°F and below)
    #[serde(default = "default_fg_cold_penalty")]
    pub fg_cold_penalty: f64,
    pub fg_pressure_penalty: f64,
    pub fg_band: ProbBand,
    pub block_base: f64,
    pub block_band: ProbBand,

    // === Punt ===
    pub punt_gross_base: f64,
    pub punt_power_weight: f64,
    pub punt_gross_sd: f64,
    pub punt_wind_weight: f64,
    pub punt_wet_penalty: f64,
    pub punt_snow_penalty: f64,
    pub punt_min_gross: f64,
    pub punt_max_gross: f64,
    pub hang_base: f64,
    pub hang_per_z: f64,
    pub fair_catch_base: f64,
    pub fair_catch_per_hang: f64,
    pub fair_catch_band: ProbBand,
    pub punt_return_base: f64,
    pub return_weight: f64,
    pub coverage_weight: f64,
    pub punt_return_max: f64,

    // === Kickoff ===
    /// Kickoffs are taken from the kicking team's 35
    pub kickoff_spot: f64,
    pub kickoff_distance_base: f64,
    pub kickoff_power_weight: f64,
    pub kickoff_sd: f64,
    pub kickoff_return_base: f64,
    pub kickoff_big_return_base: f64,
    pub kickoff_big_return_band: ProbBand,
    pub touchback_spot: u8,
}

fn default_fg_cold_penalty() -> f64 {
    0.35
}

impl Default for KickConfig {
    fn default() -> Self {
        Self {
            fg_base_logit: 4.6,
            fg_distance_slope: 0.105,
            fg_accuracy_weight: 0.55,
            fg_range_base: 53.0,
            fg_range_power_weight: 4.0,
            fg_beyond_range_penalty: 0.45,
            fg_wind_weight: 0.035,
            fg_wet_penalty: 0.25,
            fg_snow_penalty: 0.40,
            fg_cold_penalty: default_fg_cold_penalty(),
            fg_pressure_penalty: 0.15,
            fg_band: ProbBand::new(0.02, 0.99),
            block_base: 0.015,
            block_band: ProbBand::new(0.005, 0.05),

            punt_gross_base: 45.0,
            punt_power_weight: 4.0,
            punt_gross_sd: 5.0,
            punt_wind_weight: 0.12,
            punt_wet_penalty: 2.0,
            punt_snow_penalty: 4.0,
            punt_min_gross: 20.0,
            punt_max_gross: 75.0,
            hang_base: 4.3,
            hang_per_z: 0.25,
            fair_catch_base: 0.30,
            fair_catch_per_hang: 0.12,
            fair_catch_band: ProbBand::new(0.05, 0.80),
            punt_return_base: 8.0,
            return_weight: 3.0,
            coverage_weight: 2.0,
            punt_return_max: 40.0,

            kickoff_spot: 35.0,
            kickoff_distance_base: 62.0,
            kickoff_power_weight: 4.0,
            kickoff_sd: 5.0,
            kickoff_return_base: 22.0,
            kickoff_big_return_base: 0.03,
            kickoff_big_return_band: ProbBand::new(0.005, 0.10),
            touchback_spot: 25,
        }
    }
}

/// Throw placement parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallisticsConfig {
    /// Placement sd (yards) at the line of scrimmage
    pub base_error: f64,
    /// Added sd per air yard
    pub depth_error: f64,
    /// Added sd per mph per air yard
    pub wind_error: f64,
    /// Fraction of wind drift a perfect spiral cancels
    pub spin_damping: f64,
    pub accuracy_weight: f64,
    pub min_error_scale: f64,
    pub pressure_scale: f64,
    pub wet_scale: f64,
    /// Air yards reachable by an average arm
    pub arm_range_base: f64,
    pub arm_range_per_z: f64,
    /// sd added per yard past the arm's range
    pub overthrow_error: f64,
    pub catch_base: f64,
    pub catch_error_weight: f64,
    pub catch_separation_weight: f64,
    pub catch_band: ProbBand,
    /// Interception chance, conditional on an incompletion
    pub int_base: f64,
    pub int_error_weight: f64,
    pub int_separation_weight: f64,
    pub int_pressure_bonus: f64,
    pub int_depth_weight: f64,
    pub int_band: ProbBand,
    pub catch_radius: f64,
}

impl Default for BallisticsConfig {
    fn default() -> Self {
        Self {
            base_error: 0.6,
            depth_error: 0.045,
            wind_error: 0.0015,
            spin_damping: 0.8,
            accuracy_weight: 0.12,
            min_error_scale: 0.3,
            pressure_scale: 1.35,
            wet_scale: 1.10,
            arm_range_base: 45.0,
            arm_range_per_z: 8.0,
            overthrow_error: 0.08,
            catch_base: 0.95,
            catch_error_weight: 0.20,
            catch_separation_weight: 0.06,
            catch_band: ProbBand::new(0.05, 0.95),
            int_base: 0.055,
            int_error_weight: 0.015,
            int_separation_weight: 0.025,
            int_pressure_bonus: 0.03,
            int_depth_weight: 0.0012,
            int_band: ProbBand::new(0.005, 0.25),
            catch_radius: 1.5,
        }
    }
}

/// Flag parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyConfig {
    pub base_rate: f64,
    /// Per z of discipline (subtracted)
    pub discipline_weight: f64,
    pub band: ProbBand,
    /// Share of offensive flags that are pre-snap (5 yards, no play)
    pub pre_snap_share: f64,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.05,
            discipline_weight: 0.015,
            band: ProbBand::new(0.01, 0.15),
            pre_snap_share: 0.6,
        }
    }
}
