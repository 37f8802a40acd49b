//! Physics resolvers
//!
//! Each resolver is a pure function `resolve(input, config, rng) -> outcome`
//! for one micro-interaction. Common rules:
//!
//! 1. Ratings enter formulas only as clamped z-scores ([`crate::ratings::rating_z`]).
//! 2. Every probability is clamped into a configured band.
//! 3. Draws are taken in a fixed, documented order and always in the same
//!    count, whatever branch the outcome takes.
//! 4. Outcomes carry a `debug` map of intermediate scalars; it never feeds
//!    back into gameplay.
//!
//! | Resolver | Module |
//! |---|---|
//! | Fumble | [`fumble`] |
//! | Pass rush | [`pass_rush`] |
//! | Contact / tackle | [`contact`] |
//! | Pile (short yardage) | [`pile`] |
//! | Field goal, punt, kickoff | [`kick`] |
//! | QB ballistics | [`ballistics`] |

pub mod ballistics;
pub mod contact;
pub mod fumble;
pub mod kick;
pub mod pass_rush;
pub mod pile;

pub use ballistics::{BallisticsInput, BallisticsOutcome};
pub use contact::{ContactInput, ContactOutcome};
pub use fumble::{ContactKind, FumbleInput, FumbleOutcome};
pub use kick::{
    FieldGoalInput, FieldGoalOutcome, KickoffInput, KickoffOutcome, MissDirection, PuntInput,
    PuntOutcome, PUNT_TOUCHBACK_SPOT,
};
pub use pass_rush::{DropDepth, PassRushInput, PassRushOutcome};
pub use pile::{PileInput, PileOutcome, PILE_BONUS_YARDS};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Intermediate scalars of one resolver call (delta, probabilities, raw rolls).
pub type ResolverDebug = BTreeMap<&'static str, f64>;

/// Playing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Dry,
    Wet,
    Snow,
    Turf,
}

impl Surface {
    /// Slick surfaces: wet grass or snow
    pub fn is_slick(self) -> bool {
        matches!(self, Surface::Wet | Surface::Snow)
    }
}

/// Kickoff temperature when none is given
pub const MILD_TEMPERATURE_F: f64 = 60.0;

/// Below this the cold starts to affect ball handling and kicking
pub const COLD_ONSET_F: f64 = 40.0;

fn mild_temperature() -> f64 {
    MILD_TEMPERATURE_F
}

/// Situational context shared by resolvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub surface: Surface,
    /// Sustained wind speed; negative values are treated as calm
    pub wind_mph: f64,
    #[serde(default = "mild_temperature")]
    pub temperature_f: f64,
}

impl Default for Conditions {
    fn default() -> Self {
        Self::new(Surface::default(), 0.0)
    }
}

impl Conditions {
    pub fn new(surface: Surface, wind_mph: f64) -> Self {
        Self { surface, wind_mph, temperature_f: MILD_TEMPERATURE_F }
    }

    pub fn with_temperature(mut self, temperature_f: f64) -> Self {
        self.temperature_f = temperature_f;
        self
    }

    /// Cold severity in `[0, 1]`: 0 at [`COLD_ONSET_F`] and above, 1 at 0°F
    /// and below. Non-finite temperatures count as mild.
    #[inline]
    pub fn cold(&self) -> f64 {
        if !self.temperature_f.is_finite() {
            return 0.0;
        }
        ((COLD_ONSET_F - self.temperature_f) / COLD_ONSET_F).clamp(0.0, 1.0)
    }

    /// Wind clamped to a sane range
    #[inline]
    pub fn wind(&self) -> f64 {
        if self.wind_mph.is_finite() {
            self.wind_mph.clamp(0.0, 45.0)
        } else {
            0.0
        }
    }
}

/// Clamp a fatigue level into `[0, 1]`.
#[inline]
pub(crate) fn fatigue_level(f: f64) -> f64 {
    if f.is_finite() {
        f.clamp(0.0, 1.0)
    } else {
        0.0
    }
}


#[cfg(test)]
pub(crate) mod test_support {
    //! Sampling helpers shared by resolver tests.

    use crate::rng::{rng, DetRng};

    /// Independent stream for trial `i` of a named experiment.
    pub fn trial_rng(experiment: &str, i: usize) -> DetRng {
        rng(20_240_901, Some(format!("{experiment}:{i}").as_str()))
    }

    pub fn rate(hits: usize, trials: usize) -> f64 {
        hits as f64 / trials as f64
    }

    pub fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    pub fn variance(values: &[f64]) -> f64 {
        let m = mean(values);
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
    }
}
