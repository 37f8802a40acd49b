//! Contact / tackle resolver
//!
//! Used for designed runs at the line and for open-field contact (yards after
//! catch, returns).
//!
//! Roll order (always five draws): stuff roll, break-tackle roll, gain jitter
//! (Box–Muller pair), breakaway roll.

use serde::{Deserialize, Serialize};

use super::{fatigue_level, Conditions, ResolverDebug, Surface};
use crate::config::ContactConfig;
use crate::ratings::rating_z;
use crate::rng::DetRng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactInput {
    pub carrier_power: f64,
    pub carrier_elusive: f64,
    pub tackler_tackling: f64,
    /// Blocking unit (run blocking at the line; a neutral 60 in space)
    pub blocking: f64,
    /// Defending unit (run stop at the line; coverage in space)
    pub defenders: f64,
    /// Scheme expectation before ratings (yards)
    pub base_gain: f64,
    pub open_field: bool,
    pub conditions: Conditions,
    /// Carrier fatigue `[0, 1]`
    pub fatigue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactOutcome {
    pub yards: i32,
    pub stuffed: bool,
    pub broken_tackle: bool,
    pub breakaway: bool,
    #[serde(skip)]
    pub debug: ResolverDebug,
}

/// Line advantage in z units: positive favors the offense.
pub fn leverage(input: &ContactInput, cfg: &ContactConfig) -> f64 {
    cfg.stuff_block_weight * rating_z(input.blocking)
        - cfg.stuff_defense_weight * rating_z(input.defenders)
}

/// Stuff probability before the roll (already clamped).
pub fn stuff_probability(input: &ContactInput, cfg: &ContactConfig) -> f64 {
    let base = cfg.stuff_base - leverage(input, cfg);
    let base = if input.open_field { base * cfg.open_field_stuff_scale } else { base };
    cfg.stuff_band.clamp(base)
}

/// 접촉/태클 판정
pub fn resolve(input: &ContactInput, cfg: &ContactConfig, rng: &mut DetRng) -> ContactOutcome {
    let stuff_roll = rng.next_f64();
    let break_roll = rng.next_f64();
    let jitter = rng.normal(0.0, 1.0);
    let breakaway_roll = rng.next_f64();

    let z_power = rating_z(input.carrier_power);
    let z_elusive = rating_z(input.carrier_elusive);
    let z_tackle = rating_z(input.tackler_tackling);
    let lev = leverage(input, cfg);

    let p_stuff = stuff_probability(input, cfg);
    let p_break = cfg.break_band.clamp(
        cfg.break_base + cfg.break_elusive_weight * z_elusive + cfg.break_power_weight * z_power
            - cfg.break_tackle_weight * z_tackle,
    );
    let p_breakaway = cfg
        .breakaway_band
        .clamp(cfg.breakaway_base + cfg.breakaway_elusive_weight * z_elusive);

    let surface_penalty = match input.conditions.surface {
        Surface::Wet => cfg.wet_gain_penalty,
        Surface::Snow => cfg.snow_gain_penalty,
        Surface::Dry | Surface::Turf => 0.0,
    };

    let stuffed = stuff_roll < p_stuff;
    let broken_tackle = !stuffed && break_roll < p_break;
    let breakaway = broken_tackle && breakaway_roll < p_breakaway;

    let yards = if stuffed {
        (jitter * 1.2 - 0.5).round().clamp(-(cfg.max_stuff_loss as f64), 1.0)
    } else {
        let mut gain = input.base_gain
            + cfg.leverage_yards * (rating_z(input.blocking) - rating_z(input.defenders))
            + 0.6 * z_power
            + jitter * cfg.gain_sd
            - surface_penalty
            - cfg.fatigue_gain_penalty * fatigue_level(input.fatigue);
        gain = gain.max(0.0);
        if broken_tackle {
            gain += cfg.broken_tackle_yards;
        }
        if breakaway {
            let t = breakaway_roll / p_breakaway;
            gain += cfg.breakaway_min + (cfg.breakaway_max - cfg.breakaway_min) * t;
        }
        gain.round()
    };

    let mut debug = ResolverDebug::new();
    debug.insert("leverage", lev);
    debug.insert("p_stuff", p_stuff);
    debug.insert("p_break", p_break);
    debug.insert("p_breakaway", p_breakaway);
    debug.insert("roll_stuff", stuff_roll);
    debug.insert("roll_break", break_roll);
    debug.insert("jitter", jitter);
    debug.insert("roll_breakaway", breakaway_roll);

    ContactOutcome { yards: yards as i32, stuffed, broken_tackle, breakaway, debug }
}
