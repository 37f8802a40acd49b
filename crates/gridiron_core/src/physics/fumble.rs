//! Fumble resolver
//!
//! Roll order (always four draws):
//! 1. fumble-check roll
//! 2. bounce-direction roll (direction and distance)
//! 3. bounce-weirdness roll
//! 4. recovery roll

use serde::{Deserialize, Serialize};

use super::{fatigue_level, Conditions, ResolverDebug, Surface};
use crate::config::FumbleConfig;
use crate::ratings::rating_z;
use crate::rng::DetRng;

/// How the ball carrier was brought down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    #[default]
    Standard,
    GangTackle,
    /// Blind-side hit or strip sack
    BlindSide,
    /// Short-yardage scrum
    Pile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FumbleInput {
    pub carrier_security: f64,
    pub hitter_power: f64,
    pub contact: ContactKind,
    pub conditions: Conditions,
    /// Carrier fatigue `[0, 1]`
    pub fatigue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FumbleOutcome {
    pub fumbled: bool,
    /// Recovered by the defense
    pub lost: bool,
    /// Signed yards the loose ball travels from the spot (negative = backward)
    pub bounce_yards: i32,
    pub weird_bounce: bool,
    #[serde(skip)]
    pub debug: ResolverDebug,
}

/// Fumble probability before the roll (already clamped).
pub fn fumble_probability(input: &FumbleInput, cfg: &FumbleConfig) -> f64 {
    let z_sec = rating_z(input.carrier_security);
    let z_hit = rating_z(input.hitter_power);

    let surface = match input.conditions.surface {
        Surface::Wet => cfg.wet_bonus,
        Surface::Snow => cfg.snow_bonus,
        Surface::Dry | Surface::Turf => 0.0,
    };
    let contact = match input.contact {
        ContactKind::Standard | ContactKind::Pile => 0.0,
        ContactKind::GangTackle => cfg.gang_tackle_bonus,
        ContactKind::BlindSide => cfg.blind_side_bonus,
    };

    let p = cfg.base_rate - cfg.security_weight * z_sec
        + cfg.hitter_weight * z_hit
        + surface
        + contact
        + cfg.cold_bonus * input.conditions.cold()
        + cfg.fatigue_weight * fatigue_level(input.fatigue);
    cfg.band.clamp(p)
}

fn weird_probability(surface: Surface, cfg: &FumbleConfig) -> f64 {
    let p = cfg.weird_base
        + match surface {
            Surface::Wet => cfg.weird_wet_bonus,
            Surface::Snow => cfg.weird_snow_bonus,
            Surface::Dry | Surface::Turf => 0.0,
        };
    cfg.weird_band.clamp(p)
}

/// 펌블 판정
pub fn resolve(input: &FumbleInput, cfg: &FumbleConfig, rng: &mut DetRng) -> FumbleOutcome {
    let fumble_roll = rng.next_f64();
    let direction_roll = rng.next_f64();
    let weird_roll = rng.next_f64();
    let recovery_roll = rng.next_f64();

    let p_fumble = fumble_probability(input, cfg);
    let p_weird = weird_probability(input.conditions.surface, cfg);

    let fumbled = fumble_roll < p_fumble;
    let weird_bounce = fumbled && weird_roll < p_weird;

    let backward = direction_roll < cfg.backward_share;
    let mut bounce = if backward {
        -((cfg.backward_share - direction_roll) / cfg.backward_share) * cfg.max_backward_bounce
    } else {
        ((direction_roll - cfg.backward_share) / (1.0 - cfg.backward_share))
            * cfg.max_forward_bounce
    };
    if weird_bounce {
        bounce += bounce.signum() * cfg.weird_extra_yards;
    }

    // Weird bounces are coin flips; otherwise the direction favors one side.
    let p_defense = if weird_bounce {
        0.5
    } else if backward {
        cfg.defense_recovery_base + cfg.backward_recovery_shift
    } else {
        cfg.defense_recovery_base - cfg.backward_recovery_shift
    };
    let p_defense = cfg.recovery_band.clamp(p_defense);
    let lost = fumbled && recovery_roll < p_defense;

    let mut debug = ResolverDebug::new();
    debug.insert("p_fumble", p_fumble);
    debug.insert("p_weird", p_weird);
    debug.insert("p_defense_recovery", p_defense);
    debug.insert("roll_fumble", fumble_roll);
    debug.insert("roll_direction", direction_roll);
    debug.insert("roll_weird", weird_roll);
    debug.insert("roll_recovery", recovery_roll);

    FumbleOutcome {
        fumbled,
        lost,
        bounce_yards: if fumbled { bounce.round() as i32 } else { 0 },
        weird_bounce,
        debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::test_support::{rate, trial_rng};
    use crate::rng::rng;

    fn input(surface: Surface) -> FumbleInput {
        FumbleInput {
            carrier_security: 60.0,
            hitter_power: 60.0,
            contact: ContactKind::Standard,
            conditions: Conditions::new(surface, 0.0),
            fatigue: 0.2,
        }
    }

    fn sample(surface: Surface, trials: usize) -> (usize, usize) {
        let cfg = FumbleConfig::default();
        let inp = input(surface);
        let mut fumbles = 0;
        let mut weird = 0;
        for i in 0..trials {
            let out = resolve(&inp, &cfg, &mut trial_rng("fumble", i));
            fumbles += out.fumbled as usize;
            weird += out.weird_bounce as usize;
        }
        (fumbles, weird)
    }

    #[test]
    fn test_deterministic() {
        let cfg = FumbleConfig::default();
        let inp = input(Surface::Wet);
        let a = resolve(&inp, &cfg, &mut rng(9, Some("fumble")));
        let b = resolve(&inp, &cfg, &mut rng(9, Some("fumble")));
        assert_eq!(a, b);
        assert_eq!(a.debug, b.debug);
    }

    #[test]
    fn test_fixed_draw_count() {
        let cfg = FumbleConfig::default();
        let mut r = rng(1, None);
        resolve(&input(Surface::Dry), &cfg, &mut r);
        assert_eq!(r.draws(), 4);
    }

    #[test]
    fn test_wet_surface_raises_fumbles_and_weird_bounces() {
        let trials = 4_000;
        let (dry_f, dry_w) = sample(Surface::Dry, trials);
        let (wet_f, wet_w) = sample(Surface::Wet, trials);
        let (snow_f, snow_w) = sample(Surface::Snow, trials);
        assert!(rate(wet_f, trials) > rate(dry_f, trials), "wet {wet_f} dry {dry_f}");
        assert!(rate(wet_w, trials) > rate(dry_w, trials), "wet {wet_w} dry {dry_w}");
        assert!(snow_f > dry_f && snow_w > dry_w);
    }

    #[test]
    fn test_probability_band() {
        let mut cfg = FumbleConfig::default();
        let mut worst = input(Surface::Snow);
        worst.carrier_security = 0.0;
        worst.hitter_power = 100.0;
        worst.contact = ContactKind::BlindSide;
        worst.fatigue = 5.0;
        let p = fumble_probability(&worst, &cfg);
        assert!(p > 0.05 && p <= cfg.band.hi);

        let mut best = input(Surface::Dry);
        best.carrier_security = 100.0;
        best.hitter_power = 0.0;
        assert_eq!(fumble_probability(&best, &cfg), cfg.band.lo);

        cfg.base_rate = 0.9;
        assert_eq!(fumble_probability(&worst, &cfg), cfg.band.hi);
    }

    #[test]
    fn test_cold_raises_fumble_probability() {
        let cfg = FumbleConfig::default();
        let mild = input(Surface::Dry);
        let mut frozen = mild;
        frozen.conditions = frozen.conditions.with_temperature(5.0);
        let mut cool = mild;
        cool.conditions = cool.conditions.with_temperature(45.0);

        assert!(fumble_probability(&frozen, &cfg) > fumble_probability(&mild, &cfg));
        assert_eq!(fumble_probability(&cool, &cfg), fumble_probability(&mild, &cfg));
    }

    #[test]
    fn test_no_fumble_means_no_bounce() {
        let cfg = FumbleConfig::default();
        for i in 0..500 {
            let out = resolve(&input(Surface::Dry), &cfg, &mut trial_rng("bounce", i));
            if !out.fumbled {
                assert_eq!(out.bounce_yards, 0);
                assert!(!out.lost && !out.weird_bounce);
            }
        }
    }
}
