//! Pass rush resolver
//!
//! Roll order (always three draws): pressure roll, sack roll,
//! time-to-pressure jitter (also sets sack depth).

use serde::{Deserialize, Serialize};

use super::{fatigue_level, ResolverDebug};
use crate::config::PassRushConfig;
use crate::ratings::rating_z;
use crate::rng::DetRng;

/// QB drop depth; deeper drops give rushers more time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropDepth {
    Quick,
    #[default]
    Standard,
    Deep,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassRushInput {
    pub rusher_bend: f64,
    pub rusher_power: f64,
    pub blocker_pass_pro: f64,
    pub qb_poise: f64,
    pub drop: DropDepth,
    pub blitz: bool,
    pub play_action: bool,
    /// Rusher fatigue `[0, 1]`
    pub fatigue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRushOutcome {
    pub pressure: bool,
    pub sack: bool,
    /// Yards lost on a sack (0 otherwise)
    pub sack_yards: i32,
    /// Seconds from snap until the rush arrives
    pub time_to_pressure: f64,
    #[serde(skip)]
    pub debug: ResolverDebug,
}

/// Rush advantage in z units: positive favors the defense.
fn rush_delta(input: &PassRushInput, cfg: &PassRushConfig) -> f64 {
    cfg.bend_weight * rating_z(input.rusher_bend) + cfg.power_weight * rating_z(input.rusher_power)
        - cfg.pass_pro_weight * rating_z(input.blocker_pass_pro)
}

/// Pressure probability before the roll (already clamped).
pub fn pressure_probability(input: &PassRushInput, cfg: &PassRushConfig) -> f64 {
    let drop = match input.drop {
        DropDepth::Quick => cfg.quick_drop_mod,
        DropDepth::Standard => 0.0,
        DropDepth::Deep => cfg.deep_drop_mod,
    };
    let p = cfg.base_pressure
        + rush_delta(input, cfg)
        + drop
        + if input.blitz { cfg.blitz_mod } else { 0.0 }
        + if input.play_action { cfg.play_action_mod } else { 0.0 }
        + cfg.fatigue_weight * fatigue_level(input.fatigue);
    cfg.pressure_band.clamp(p)
}

/// 패스 러시 판정
pub fn resolve(input: &PassRushInput, cfg: &PassRushConfig, rng: &mut DetRng) -> PassRushOutcome {
    let pressure_roll = rng.next_f64();
    let sack_roll = rng.next_f64();
    let jitter_roll = rng.next_f64();

    let delta = rush_delta(input, cfg);
    let p_pressure = pressure_probability(input, cfg);
    let p_sack = cfg
        .sack_share_band
        .clamp(cfg.sack_share_base - cfg.poise_weight * rating_z(input.qb_poise) + delta);

    let pressure = pressure_roll < p_pressure;
    let sack = pressure && sack_roll < p_sack;

    let time_to_pressure =
        (cfg.base_time_to_pressure - 3.5 * delta + (jitter_roll - 0.5) * 0.8).clamp(1.4, 5.0);
    let sack_yards = if sack {
        (cfg.min_sack_yards + jitter_roll * (cfg.max_sack_yards - cfg.min_sack_yards)).round()
            as i32
    } else {
        0
    };

    let mut debug = ResolverDebug::new();
    debug.insert("delta", delta);
    debug.insert("p_pressure", p_pressure);
    debug.insert("p_sack", p_sack);
    debug.insert("roll_pressure", pressure_roll);
    debug.insert("roll_sack", sack_roll);
    debug.insert("roll_jitter", jitter_roll);

    PassRushOutcome { pressure, sack, sack_yards, time_to_pressure, debug }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::test_support::{rate, trial_rng};
    use crate::rng::rng;

    fn input(bend: f64) -> PassRushInput {
        PassRushInput {
            rusher_bend: bend,
            rusher_power: 60.0,
            blocker_pass_pro: 60.0,
            qb_poise: 60.0,
            drop: DropDepth::Standard,
            blitz: false,
            play_action: false,
            fatigue: 0.0,
        }
    }

    fn pressure_rate(bend: f64, trials: usize) -> f64 {
        let cfg = PassRushConfig::default();
        let inp = input(bend);
        let hits = (0..trials)
            .filter(|&i| resolve(&inp, &cfg, &mut trial_rng("rush", i)).pressure)
            .count();
        rate(hits, trials)
    }

    #[test]
    fn test_bend_raises_pressure() {
        let low = pressure_rate(45.0, 2_000);
        let mid = pressure_rate(60.0, 2_000);
        let high = pressure_rate(85.0, 2_000);
        assert!(high > mid && mid > low, "low {low} mid {mid} high {high}");
    }

    #[test]
    fn test_quick_drop_reduces_pressure() {
        let cfg = PassRushConfig::default();
        let mut quick = input(60.0);
        quick.drop = DropDepth::Quick;
        let mut deep = input(60.0);
        deep.drop = DropDepth::Deep;
        assert!(pressure_probability(&quick, &cfg) < pressure_probability(&deep, &cfg));
    }

    #[test]
    fn test_deterministic_and_fixed_draws() {
        let cfg = PassRushConfig::default();
        let inp = input(70.0);
        let mut r1 = rng(17, Some("rush"));
        let mut r2 = rng(17, Some("rush"));
        assert_eq!(resolve(&inp, &cfg, &mut r1), resolve(&inp, &cfg, &mut r2));
        assert_eq!(r1.draws(), 3);
    }

    #[test]
    fn test_sack_implies_pressure_and_loss() {
        let cfg = PassRushConfig::default();
        let mut inp = input(90.0);
        inp.blitz = true;
        for i in 0..1_000 {
            let out = resolve(&inp, &cfg, &mut trial_rng("sack", i));
            if out.sack {
                assert!(out.pressure);
                assert!((3..=10).contains(&out.sack_yards));
            } else {
                assert_eq!(out.sack_yards, 0);
            }
            assert!((1.4..=5.0).contains(&out.time_to_pressure));
        }
    }

    #[test]
    fn test_pressure_never_certain() {
        let cfg = PassRushConfig::default();
        let mut inp = input(100.0);
        inp.rusher_power = 100.0;
        inp.blocker_pass_pro = 0.0;
        inp.blitz = true;
        inp.drop = DropDepth::Deep;
        assert_eq!(pressure_probability(&inp, &cfg), cfg.pressure_band.hi);
    }
}
