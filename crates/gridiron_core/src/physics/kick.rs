//! Kicking resolvers: field goals (and extra points), punts, kickoffs
//!
//! Roll orders:
//! - field goal: make roll, block roll, miss-direction roll (3 draws)
//! - punt: distance jitter (Box–Muller pair), hang jitter, return roll,
//!   return jitter (5 draws)
//! - kickoff: distance jitter (Box–Muller pair), return roll, return jitter
//!   (4 draws)

use serde::{Deserialize, Serialize};

use super::{Conditions, ResolverDebug, Surface};
use crate::config::KickConfig;
use crate::ratings::{logistic, rating_z};
use crate::rng::DetRng;

// ============================================================================
// Field goal
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGoalInput {
    pub accuracy: f64,
    pub power: f64,
    /// Kick distance (line of scrimmage to goal + 17)
    pub distance_yards: f64,
    pub conditions: Conditions,
    /// Late, close-game kick
    pub pressure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissDirection {
    Left,
    Right,
    Short,
}

impl MissDirection {
    pub fn describe(self) -> &'static str {
        match self {
            MissDirection::Left => "wide left",
            MissDirection::Right => "wide right",
            MissDirection::Short => "short",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGoalOutcome {
    pub made: bool,
    pub blocked: bool,
    pub miss: Option<MissDirection>,
    #[serde(skip)]
    pub debug: ResolverDebug,
}

/// Effective range of the kicker (yards).
pub fn kicker_range(power: f64, cfg: &KickConfig) -> f64 {
    cfg.fg_range_base + cfg.fg_range_power_weight * rating_z(power)
}

/// Make probability before the roll (already clamped). Shared with the
/// fourth-down model.
pub fn field_goal_make_probability(input: &FieldGoalInput, cfg: &KickConfig) -> f64 {
    let distance = if input.distance_yards.is_finite() { input.distance_yards.max(18.0) } else { 18.0 };
    let range = kicker_range(input.power, cfg);
    let beyond = (distance - range).max(0.0);
    let surface = match input.conditions.surface {
        Surface::Wet => cfg.fg_wet_penalty,
        Surface::Snow => cfg.fg_snow_penalty,
        Surface::Dry | Surface::Turf => 0.0,
    };
    let logit = cfg.fg_base_logit - cfg.fg_distance_slope * (distance - 20.0)
        + cfg.fg_accuracy_weight * rating_z(input.accuracy)
        - cfg.fg_wind_weight * input.conditions.wind()
        - surface
        - cfg.fg_cold_penalty * input.conditions.cold()
        - if input.pressure { cfg.fg_pressure_penalty } else { 0.0 }
        - cfg.fg_beyond_range_penalty * beyond;
    cfg.fg_band.clamp(logistic(logit))
}

/// 필드골 판정
pub fn resolve_field_goal(
    input: &FieldGoalInput,
    cfg: &KickConfig,
    rng: &mut DetRng,
) -> FieldGoalOutcome {
    let make_roll = rng.next_f64();
    let block_roll = rng.next_f64();
    let direction_roll = rng.next_f64();

    let p_make = field_goal_make_probability(input, cfg);
    let p_block = cfg.block_band.clamp(cfg.block_base + 0.0004 * (input.distance_yards - 30.0).max(0.0));

    let blocked = block_roll < p_block;
    let made = !blocked && make_roll < p_make;
    let miss = if made || blocked {
        None
    } else if input.distance_yards > kicker_range(input.power, cfg) && direction_roll < 0.5 {
        Some(MissDirection::Short)
    } else if direction_roll < 0.5 {
        Some(MissDirection::Left)
    } else {
        Some(MissDirection::Right)
    };

    let mut debug = ResolverDebug::new();
    debug.insert("p_make", p_make);
    debug.insert("p_block", p_block);
    debug.insert("roll_make", make_roll);
    debug.insert("roll_block", block_roll);
    debug.insert("roll_direction", direction_roll);

    FieldGoalOutcome { made, blocked, miss, debug }
}

// ============================================================================
// Punt
// ============================================================================

/// Punts into the end zone come out to the receiving 20.
pub const PUNT_TOUCHBACK_SPOT: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuntInput {
    pub power: f64,
    pub returner: f64,
    /// Punting team's coverage tackling
    pub coverage: f64,
    pub conditions: Conditions,
    /// Line of scrimmage to the receiving team's goal line
    pub yards_to_goal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuntOutcome {
    pub gross_yards: i32,
    pub return_yards: i32,
    /// gross − return, or yards to the 20 on a touchback
    pub net_yards: i32,
    pub hang_time: f64,
    pub touchback: bool,
    pub fair_catch: bool,
    #[serde(skip)]
    pub debug: ResolverDebug,
}

/// 펀트 판정
pub fn resolve_punt(input: &PuntInput, cfg: &KickConfig, rng: &mut DetRng) -> PuntOutcome {
    let distance_jitter = rng.normal(0.0, 1.0);
    let hang_roll = rng.next_f64();
    let return_roll = rng.next_f64();
    let return_jitter = rng.next_f64();

    let z_power = rating_z(input.power);
    let surface = match input.conditions.surface {
        Surface::Wet => cfg.punt_wet_penalty,
        Surface::Snow => cfg.punt_snow_penalty,
        Surface::Dry | Surface::Turf => 0.0,
    };
    let gross = (cfg.punt_gross_base + cfg.punt_power_weight * z_power
        + cfg.punt_gross_sd * distance_jitter
        - cfg.punt_wind_weight * input.conditions.wind()
        - surface)
        .clamp(cfg.punt_min_gross, cfg.punt_max_gross);
    let hang = (cfg.hang_base + cfg.hang_per_z * z_power + (hang_roll - 0.5) * 0.6).max(3.0);

    let to_goal = input.yards_to_goal.clamp(1.0, 99.0);
    let touchback = gross >= to_goal;
    let p_fair = cfg
        .fair_catch_band
        .clamp(cfg.fair_catch_base + cfg.fair_catch_per_hang * (hang - cfg.hang_base) * 4.0);
    let fair_catch = !touchback && return_roll < p_fair;

    let gross_yards = if touchback { to_goal.round() as i32 } else { gross.round() as i32 };
    let return_yards = if touchback || fair_catch {
        0
    } else {
        let ret = cfg.punt_return_base + cfg.return_weight * rating_z(input.returner)
            - cfg.coverage_weight * rating_z(input.coverage)
            + (return_jitter - 0.5) * 12.0;
        ret.clamp(0.0, cfg.punt_return_max).round() as i32
    };
    let net_yards = if touchback {
        (to_goal - PUNT_TOUCHBACK_SPOT as f64).max(0.0).round() as i32
    } else {
        gross_yards - return_yards
    };

    let mut debug = ResolverDebug::new();
    debug.insert("gross_raw", gross);
    debug.insert("p_fair_catch", p_fair);
    debug.insert("jitter_distance", distance_jitter);
    debug.insert("roll_hang", hang_roll);
    debug.insert("roll_return", return_roll);
    debug.insert("jitter_return", return_jitter);

    PuntOutcome {
        gross_yards,
        return_yards,
        net_yards,
        hang_time: hang,
        touchback,
        fair_catch,
        debug,
    }
}

// ============================================================================
// Kickoff
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickoffInput {
    /// Kicking team's yard line (35 on kickoffs, 20 on safety free kicks)
    pub from_yard_line: f64,
    pub power: f64,
    pub returner: f64,
    pub coverage: f64,
    pub conditions: Conditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickoffOutcome {
    pub touchback: bool,
    pub return_yards: i32,
    /// Receiving team's yard line after the return (100 = touchdown)
    pub receiving_spot: i32,
    #[serde(skip)]
    pub debug: ResolverDebug,
}

/// 킥오프 판정
pub fn resolve_kickoff(input: &KickoffInput, cfg: &KickConfig, rng: &mut DetRng) -> KickoffOutcome {
    let distance_jitter = rng.normal(0.0, 1.0);
    let return_roll = rng.next_f64();
    let return_jitter = rng.next_f64();

    let distance = cfg.kickoff_distance_base + cfg.kickoff_power_weight * rating_z(input.power)
        + cfg.kickoff_sd * distance_jitter
        - 0.1 * input.conditions.wind();
    // Landing spot measured from the receiving team's goal line (negative = end zone).
    let landing = 100.0 - (input.from_yard_line + distance);
    let touchback = landing <= 0.0;

    let p_big = cfg
        .kickoff_big_return_band
        .clamp(cfg.kickoff_big_return_base + 0.01 * rating_z(input.returner));
    let (return_yards, receiving_spot) = if touchback {
        (0, cfg.touchback_spot as i32)
    } else {
        let catch_spot = landing.max(1.0);
        let mut ret = cfg.kickoff_return_base + 4.0 * rating_z(input.returner)
            - 3.0 * rating_z(input.coverage)
            + (return_jitter - 0.5) * 14.0;
        if return_roll < p_big {
            ret += 25.0 + 75.0 * (return_roll / p_big);
        }
        let ret = ret.max(0.0);
        let spot = (catch_spot + ret).min(100.0);
        ((spot - catch_spot).round() as i32, spot.round() as i32)
    };

    let mut debug = ResolverDebug::new();
    debug.insert("distance", distance);
    debug.insert("p_big_return", p_big);
    debug.insert("jitter_distance", distance_jitter);
    debug.insert("roll_return", return_roll);
    debug.insert("jitter_return", return_jitter);

    KickoffOutcome { touchback, return_yards, receiving_spot: receiving_spot.max(1), debug }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::test_support::{mean, rate, trial_rng};
    use crate::rng::rng;

    fn fg(accuracy: f64, distance: f64) -> FieldGoalInput {
        FieldGoalInput {
            accuracy,
            power: 60.0,
            distance_yards: distance,
            conditions: Conditions::default(),
            pressure: false,
        }
    }

    fn make_rate(input: &FieldGoalInput, trials: usize) -> f64 {
        let cfg = KickConfig::default();
        let made = (0..trials)
            .filter(|&i| resolve_field_goal(input, &cfg, &mut trial_rng("fg", i)).made)
            .count();
        rate(made, trials)
    }

    #[test]
    fn test_accuracy_raises_make_rate() {
        let high = make_rate(&fg(85.0, 48.0), 1_000);
        let low = make_rate(&fg(40.0, 48.0), 1_000);
        assert!(high > low, "high {high} low {low}");
    }

    #[test]
    fn test_distance_lowers_make_probability() {
        let cfg = KickConfig::default();
        let short = field_goal_make_probability(&fg(60.0, 25.0), &cfg);
        let long = field_goal_make_probability(&fg(60.0, 58.0), &cfg);
        assert!(short > 0.9 && long < 0.6 && short > long);
    }

    #[test]
    fn test_cold_lowers_make_probability() {
        let cfg = KickConfig::default();
        let mild = fg(60.0, 45.0);
        let mut frozen = mild;
        frozen.conditions = Conditions::default().with_temperature(-10.0);
        assert!(field_goal_make_probability(&frozen, &cfg) < field_goal_make_probability(&mild, &cfg));
    }

    #[test]
    fn test_make_probability_never_certain() {
        let cfg = KickConfig::default();
        assert_eq!(field_goal_make_probability(&fg(100.0, 18.0), &cfg), cfg.fg_band.hi);
        assert_eq!(field_goal_make_probability(&fg(0.0, 75.0), &cfg), cfg.fg_band.lo);
    }

    #[test]
    fn test_field_goal_outcome_consistency() {
        let cfg = KickConfig::default();
        let mut r = rng(2, Some("fg"));
        for _ in 0..500 {
            let out = resolve_field_goal(&fg(60.0, 52.0), &cfg, &mut r);
            assert!(!(out.made && out.blocked));
            assert_eq!(out.miss.is_some(), !out.made && !out.blocked);
        }
    }

    fn punt(power: f64) -> PuntInput {
        PuntInput {
            power,
            returner: 60.0,
            coverage: 60.0,
            conditions: Conditions::default(),
            yards_to_goal: 80.0,
        }
    }

    #[test]
    fn test_power_raises_gross_distance() {
        let cfg = KickConfig::default();
        let gross = |inp: &PuntInput| {
            let v: Vec<f64> = (0..1_000)
                .map(|i| resolve_punt(inp, &cfg, &mut trial_rng("punt", i)).gross_yards as f64)
                .collect();
            mean(&v)
        };
        assert!(gross(&punt(85.0)) > gross(&punt(45.0)));
    }

    #[test]
    fn test_punt_touchback_near_goal() {
        let cfg = KickConfig::default();
        let mut inp = punt(70.0);
        inp.yards_to_goal = 35.0;
        let mut touchbacks = 0;
        for i in 0..500 {
            let out = resolve_punt(&inp, &cfg, &mut trial_rng("tb", i));
            if out.touchback {
                touchbacks += 1;
                assert_eq!(out.net_yards, 35 - PUNT_TOUCHBACK_SPOT);
                assert_eq!(out.return_yards, 0);
            }
        }
        assert!(touchbacks > 0);
    }

    #[test]
    fn test_kick_draw_counts() {
        let cfg = KickConfig::default();
        let mut r = rng(1, None);
        resolve_field_goal(&fg(60.0, 40.0), &cfg, &mut r);
        assert_eq!(r.draws(), 3);

        let mut r = rng(1, None);
        resolve_punt(&punt(60.0), &cfg, &mut r);
        assert_eq!(r.draws(), 5);

        let mut r = rng(1, None);
        let ko = KickoffInput {
            from_yard_line: cfg.kickoff_spot,
            power: 60.0,
            returner: 60.0,
            coverage: 60.0,
            conditions: Conditions::default(),
        };
        resolve_kickoff(&ko, &cfg, &mut r);
        assert_eq!(r.draws(), 4);
    }

    #[test]
    fn test_kickoff_spots_in_bounds() {
        let cfg = KickConfig::default();
        let ko = KickoffInput {
            from_yard_line: cfg.kickoff_spot,
            power: 60.0,
            returner: 70.0,
            coverage: 55.0,
            conditions: Conditions::default(),
        };
        for i in 0..1_000 {
            let out = resolve_kickoff(&ko, &cfg, &mut trial_rng("ko", i));
            assert!((1..=100).contains(&out.receiving_spot));
            if out.touchback {
                assert_eq!(out.receiving_spot, cfg.touchback_spot as i32);
            }
        }
    }
}
