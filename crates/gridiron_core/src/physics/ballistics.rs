//! QB ballistics: throw placement, catch and interception
//!
//! Placement error is a 2-D normal around the aim point. Its spread grows
//! with air yards and wind; a tight spiral cancels part of the wind drift.
//!
//! Roll order (always six draws): lateral error (Box–Muller pair), depth
//! error (Box–Muller pair), catch roll, interception roll.

use serde::{Deserialize, Serialize};

use super::{Conditions, ResolverDebug};
use crate::config::BallisticsConfig;
use crate::ratings::rating_z;
use crate::rng::DetRng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallisticsInput {
    pub arm: f64,
    pub accuracy: f64,
    pub spin: f64,
    pub poise: f64,
    /// Target depth past the line of scrimmage
    pub air_yards: f64,
    /// Receiver route skill minus coverage, in z units (positive = open)
    pub separation: f64,
    /// Thrown under pressure
    pub pressure: bool,
    pub conditions: Conditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallisticsOutcome {
    pub completed: bool,
    pub intercepted: bool,
    /// Ball arrived inside the catch radius
    pub catchable: bool,
    /// Distance from the aim point (yards)
    pub placement_error: f64,
    /// Signed sideline-direction component of the error
    pub lateral_error: f64,
    pub air_yards: f64,
    #[serde(skip)]
    pub debug: ResolverDebug,
}

/// Spread (sd, yards) of one placement axis.
pub fn placement_sd(input: &BallisticsInput, cfg: &BallisticsConfig) -> f64 {
    let air = input.air_yards.clamp(-5.0, 70.0).max(0.0);
    // 0 for the loosest spiral, 1 for the tightest
    let spin_quality = (rating_z(input.spin) + 2.5) / 5.0;
    let wind = input.conditions.wind() * air * cfg.wind_error * (1.0 - cfg.spin_damping * spin_quality);

    let arm_range = cfg.arm_range_base + cfg.arm_range_per_z * rating_z(input.arm);
    let overthrow = cfg.overthrow_error * (air - arm_range).max(0.0);

    let accuracy_scale = (1.0 - cfg.accuracy_weight * rating_z(input.accuracy)).max(cfg.min_error_scale);
    let pressure_scale = if input.pressure {
        (cfg.pressure_scale - 0.1 * rating_z(input.poise)).max(1.0)
    } else {
        1.0
    };
    let surface_scale = if input.conditions.surface.is_slick() { cfg.wet_scale } else { 1.0 };

    (cfg.base_error + cfg.depth_error * air + wind + overthrow)
        * accuracy_scale
        * pressure_scale
        * surface_scale
}

/// 패스 탄도 판정
pub fn resolve(input: &BallisticsInput, cfg: &BallisticsConfig, rng: &mut DetRng) -> BallisticsOutcome {
    let lateral_jitter = rng.normal(0.0, 1.0);
    let depth_jitter = rng.normal(0.0, 1.0);
    let catch_roll = rng.next_f64();
    let int_roll = rng.next_f64();

    let air = input.air_yards.clamp(-5.0, 70.0);
    let sd = placement_sd(input, cfg);
    let lateral_error = lateral_jitter * sd;
    let depth_error = depth_jitter * sd;
    let placement_error = lateral_error.hypot(depth_error);
    let catchable = placement_error <= cfg.catch_radius;

    let separation = if input.separation.is_finite() { input.separation.clamp(-5.0, 5.0) } else { 0.0 };
    let mut p_catch = cfg.catch_base - cfg.catch_error_weight * placement_error
        + cfg.catch_separation_weight * separation;
    if !catchable {
        p_catch *= 0.5;
    }
    let p_catch = cfg.catch_band.clamp(p_catch);
    let p_int = cfg.int_band.clamp(
        cfg.int_base + cfg.int_error_weight * placement_error
            - cfg.int_separation_weight * separation
            + if input.pressure { cfg.int_pressure_bonus } else { 0.0 }
            + cfg.int_depth_weight * air.max(0.0),
    );

    let completed = catch_roll < p_catch;
    let intercepted = !completed && int_roll < p_int;

    let mut debug = ResolverDebug::new();
    debug.insert("sd", sd);
    debug.insert("p_catch", p_catch);
    debug.insert("p_int", p_int);
    debug.insert("jitter_lateral", lateral_jitter);
    debug.insert("jitter_depth", depth_jitter);
    debug.insert("roll_catch", catch_roll);
    debug.insert("roll_int", int_roll);

    BallisticsOutcome {
        completed,
        intercepted,
        catchable,
        placement_error,
        lateral_error,
        air_yards: air,
        debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::test_support::{rate, trial_rng, variance};
    use crate::physics::Surface;
    use crate::rng::rng;

    fn deep(spin: f64, wind: f64) -> BallisticsInput {
        BallisticsInput {
            arm: 70.0,
            accuracy: 60.0,
            spin,
            poise: 60.0,
            air_yards: 45.0,
            separation: 0.0,
            pressure: false,
            conditions: Conditions::new(Surface::Dry, wind),
        }
    }

    fn lateral_variance(input: &BallisticsInput) -> f64 {
        let cfg = BallisticsConfig::default();
        let errs: Vec<f64> = (0..2_000)
            .map(|i| resolve(input, &cfg, &mut trial_rng("throw", i)).lateral_error)
            .collect();
        variance(&errs)
    }

    #[test]
    fn test_spin_reduces_deep_variance_in_wind() {
        let tight = lateral_variance(&deep(90.0, 25.0));
        let loose = lateral_variance(&deep(30.0, 25.0));
        assert!(tight < loose, "tight {tight} loose {loose}");
    }

    #[test]
    fn test_spin_irrelevant_without_wind() {
        let cfg = BallisticsConfig::default();
        assert_eq!(placement_sd(&deep(90.0, 0.0), &cfg), placement_sd(&deep(30.0, 0.0), &cfg));
    }

    #[test]
    fn test_short_throws_complete_more_often() {
        let cfg = BallisticsConfig::default();
        let mut short = deep(60.0, 5.0);
        short.air_yards = 6.0;
        let long = deep(60.0, 5.0);
        let completions = |inp: &BallisticsInput| {
            (0..1_000)
                .filter(|&i| resolve(inp, &cfg, &mut trial_rng("depth", i)).completed)
                .count()
        };
        assert!(completions(&short) > completions(&long));
    }

    #[test]
    fn test_interception_excludes_completion() {
        let cfg = BallisticsConfig::default();
        let mut inp = deep(50.0, 20.0);
        inp.pressure = true;
        inp.separation = -2.0;
        let mut picks = 0;
        for i in 0..2_000 {
            let out = resolve(&inp, &cfg, &mut trial_rng("int", i));
            assert!(!(out.completed && out.intercepted));
            picks += out.intercepted as usize;
        }
        let r = rate(picks, 2_000);
        assert!(r > 0.0 && r <= cfg.int_band.hi, "{r}");
    }

    #[test]
    fn test_deterministic_and_fixed_draws() {
        let cfg = BallisticsConfig::default();
        let mut r1 = rng(31, Some("ballistics"));
        let mut r2 = rng(31, Some("ballistics"));
        let a = resolve(&deep(60.0, 10.0), &cfg, &mut r1);
        let b = resolve(&deep(60.0, 10.0), &cfg, &mut r2);
        assert_eq!(a, b);
        assert_eq!(r1.draws(), 6);
    }
}
