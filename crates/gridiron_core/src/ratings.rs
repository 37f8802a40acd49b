//! Rating → z-score conversion and team rating profiles
//!
//! All resolver formulas operate on z-scores, never on raw 0–100 ratings,
//! so effect sizes stay comparable across talent tiers.

use serde::{Deserialize, Serialize};

use crate::rng::{hash_seed, mulberry32};
use crate::seed_parts;

/// Rating scale midpoint.
pub const RATING_MIDPOINT: f64 = 60.0;
/// One standard deviation on the rating scale.
pub const RATING_SPREAD: f64 = 15.0;
/// z-scores are clamped to ±this value.
pub const Z_LIMIT: f64 = 2.5;

/// Convert a rating to a clamped z-score in `[-2.5, 2.5]`.
/// Non-finite input maps to the midpoint.
#[inline]
pub fn rating_z(rating: f64) -> f64 {
    if !rating.is_finite() {
        return 0.0;
    }
    ((rating - RATING_MIDPOINT) / RATING_SPREAD).clamp(-Z_LIMIT, Z_LIMIT)
}

/// Safe operating band for a probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbBand {
    pub lo: f64,
    pub hi: f64,
}

impl ProbBand {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Clamp into the band; NaN collapses to the lower bound.
    #[inline]
    pub fn clamp(&self, p: f64) -> f64 {
        if p.is_nan() {
            return self.lo;
        }
        p.clamp(self.lo, self.hi)
    }
}

#[inline]
pub fn clamp_prob(p: f64, band: ProbBand) -> f64 {
    band.clamp(p)
}

/// Logistic curve used where a linear combination needs to saturate.
#[inline]
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// ============================================================================
// Team ratings
// ============================================================================

/// Unit ratings of one team (0–100 scale, midpoint 60).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRatings {
    pub qb_accuracy: f64,
    pub qb_arm: f64,
    /// Spiral tightness; reduces deep-ball drift in wind
    pub qb_spin: f64,
    pub qb_poise: f64,
    pub rb_power: f64,
    pub rb_elusive: f64,
    pub ball_security: f64,
    pub wr_route: f64,
    pub ol_run_block: f64,
    pub ol_pass_pro: f64,
    pub dl_run_stop: f64,
    /// Edge rusher bend around the tackle
    pub dl_bend: f64,
    pub dl_power: f64,
    pub lb_tackling: f64,
    pub db_coverage: f64,
    pub kicker_accuracy: f64,
    pub kicker_power: f64,
    pub punter_power: f64,
    pub returner: f64,
    /// Penalty avoidance
    pub discipline: f64,
}

impl Default for TeamRatings {
    fn default() -> Self {
        Self::uniform(RATING_MIDPOINT)
    }
}

impl TeamRatings {
    /// Every unit at the same rating.
    pub fn uniform(value: f64) -> Self {
        Self {
            qb_accuracy: value,
            qb_arm: value,
            qb_spin: value,
            qb_poise: value,
            rb_power: value,
            rb_elusive: value,
            ball_security: value,
            wr_route: value,
            ol_run_block: value,
            ol_pass_pro: value,
            dl_run_stop: value,
            dl_bend: value,
            dl_power: value,
            lb_tackling: value,
            db_coverage: value,
            kicker_accuracy: value,
            kicker_power: value,
            punter_power: value,
            returner: value,
            discipline: value,
        }
    }

    /// Reproducible profile derived from the team id alone.
    ///
    /// Roster data lives outside the core; this gives every id a stable,
    /// distinct profile so leagues can run from a plain id list.
    pub fn for_team(team_id: &str) -> Self {
        let mut r = mulberry32(hash_seed(&seed_parts![team_id, "ratings"]));
        let tier = r.range_f64(54.0, 72.0);
        let mut unit = || (tier + r.normal(0.0, 5.0)).clamp(40.0, 95.0).round();
        Self {
            qb_accuracy: unit(),
            qb_arm: unit(),
            qb_spin: unit(),
            qb_poise: unit(),
            rb_power: unit(),
            rb_elusive: unit(),
            ball_security: unit(),
            wr_route: unit(),
            ol_run_block: unit(),
            ol_pass_pro: unit(),
            dl_run_stop: unit(),
            dl_bend: unit(),
            dl_power: unit(),
            lb_tackling: unit(),
            db_coverage: unit(),
            kicker_accuracy: unit(),
            kicker_power: unit(),
            punter_power: unit(),
            returner: unit(),
            discipline: unit(),
        }
    }

    /// Offensive composite (rating scale).
    pub fn offense(&self) -> f64 {
        self.qb_accuracy * 0.22
            + self.qb_arm * 0.08
            + self.qb_poise * 0.10
            + self.rb_power * 0.08
            + self.rb_elusive * 0.08
            + self.wr_route * 0.16
            + self.ol_run_block * 0.12
            + self.ol_pass_pro * 0.16
    }

    /// Defensive composite (rating scale).
    pub fn defense(&self) -> f64 {
        self.dl_run_stop * 0.18
            + self.dl_bend * 0.18
            + self.dl_power * 0.12
            + self.lb_tackling * 0.22
            + self.db_coverage * 0.30
    }

    /// Overall composite used by rankings and the aggregate game model.
    pub fn overall(&self) -> f64 {
        self.offense() * 0.45 + self.defense() * 0.45 + self.kicker_accuracy * 0.05
            + self.discipline * 0.05
    }
}
