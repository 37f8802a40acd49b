//! Game clock rules: tempo runoff, elapsed time, two-minute warning

use serde::{Deserialize, Serialize};

use super::state::GameClock;
use crate::config::ClockConfig;

/// Offensive tempo between snaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tempo {
    Normal,
    /// Trailing late
    HurryUp,
    /// Leading late, bleeding the clock
    Milk,
}

/// Tempo for the offense given its score margin.
pub fn choose_tempo(clock: &GameClock, offense_margin: i32) -> Tempo {
    let late = match clock.quarter {
        2 => clock.seconds_remaining <= 120,
        4 => clock.seconds_remaining <= 300,
        q => q > 4,
    };
    if !late {
        Tempo::Normal
    } else if offense_margin < 0 || (offense_margin == 0 && clock.quarter == 2) {
        Tempo::HurryUp
    } else if offense_margin > 0 && clock.quarter >= 4 {
        Tempo::Milk
    } else {
        Tempo::Normal
    }
}

/// Seconds that run off before the snap. A stopped clock loses nothing, and
/// the runoff never expires the quarter by itself.
pub fn pre_snap_runoff(clock: &GameClock, tempo: Tempo, cfg: &ClockConfig) -> u16 {
    if !clock.running {
        return 0;
    }
    let huddle = match tempo {
        Tempo::Normal => cfg.huddle_normal,
        Tempo::HurryUp => cfg.huddle_hurry_up,
        Tempo::Milk => cfg.huddle_milk,
    };
    huddle.min(clock.seconds_remaining.saturating_sub(1))
}

/// What a clock update triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockTick {
    pub two_minute_warning: bool,
    pub expired: bool,
}

/// Run `seconds` off a running clock between plays. A stopped clock
/// neither moves nor triggers the two-minute warning.
pub fn tick(clock: &mut GameClock, seconds: u16, cfg: &ClockConfig) -> ClockTick {
    if !clock.running {
        return ClockTick::default();
    }
    advance(clock, seconds, cfg)
}

/// Time of a live play. The clock runs from the snap to the whistle whether
/// or not it was stopped before, so this always advances. The running flag
/// left by the play is kept unless the warning stops it.
pub fn live_ball(clock: &mut GameClock, elapsed: u16, cfg: &ClockConfig) -> ClockTick {
    advance(clock, elapsed, cfg)
}

/// The two-minute warning fires when the remaining time of Q2 or Q4 goes
/// from at least the threshold to below it, at most once per half, and
/// stops the clock.
fn advance(clock: &mut GameClock, elapsed: u16, cfg: &ClockConfig) -> ClockTick {
    let before = clock.seconds_remaining;
    let after = before.saturating_sub(elapsed);
    clock.seconds_remaining = after;

    let crossed = before >= cfg.two_minute_threshold && after < cfg.two_minute_threshold;
    let flag = match clock.quarter {
        2 => Some(&mut clock.two_minute_warning_q2),
        4 => Some(&mut clock.two_minute_warning_q4),
        _ => None,
    };
    let two_minute_warning = match flag {
        Some(used) if crossed && !*used => {
            *used = true;
            true
        }
        _ => false,
    };
    if two_minute_warning {
        clock.running = false;
    }

    ClockTick { two_minute_warning, expired: after == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(quarter: u8, seconds: u16) -> GameClock {
        GameClock { quarter, seconds_remaining: seconds, running: true, ..GameClock::new(900) }
    }

    #[test]
    fn test_warning_fires_once_in_q2() {
        let cfg = ClockConfig::default();
        let mut c = clock(2, 130);
        assert!(!tick(&mut c, 5, &cfg).two_minute_warning);
        let t = tick(&mut c, 10, &cfg);
        assert!(t.two_minute_warning);
        assert!(c.two_minute_warning_q2 && !c.running);
        c.seconds_remaining = 125;
        c.running = true;
        assert!(!tick(&mut c, 10, &cfg).two_minute_warning);
    }

    #[test]
    fn test_stopped_clock_does_not_tick() {
        let cfg = ClockConfig::default();
        let mut c = clock(2, 125);
        c.running = false;
        assert_eq!(tick(&mut c, 10, &cfg), ClockTick::default());
        assert_eq!(c.seconds_remaining, 125);
        assert!(!c.two_minute_warning_q2);

        c.running = true;
        assert!(tick(&mut c, 10, &cfg).two_minute_warning);
        assert_eq!(c.seconds_remaining, 115);
    }

    #[test]
    fn test_live_ball_runs_from_the_snap() {
        let cfg = ClockConfig::default();
        let mut c = clock(4, 124);
        c.running = false;
        let t = live_ball(&mut c, 6, &cfg);
        assert!(t.two_minute_warning && !t.expired);
        assert_eq!(c.seconds_remaining, 118);
        assert!(c.two_minute_warning_q4 && !c.running);
    }

    #[test]
    fn test_no_warning_in_odd_quarters() {
        let cfg = ClockConfig::default();
        let mut c = clock(3, 125);
        assert!(!tick(&mut c, 10, &cfg).two_minute_warning);
        assert!(!c.two_minute_warning_q2 && !c.two_minute_warning_q4);
    }

    #[test]
    fn test_expiry_counts_as_crossing() {
        let cfg = ClockConfig::default();
        let mut c = clock(4, 121);
        let t = tick(&mut c, 200, &cfg);
        assert!(t.expired && t.two_minute_warning);
        assert_eq!(c.seconds_remaining, 0);
    }

    #[test]
    fn test_runoff_respects_stopped_clock_and_quarter_end() {
        let cfg = ClockConfig::default();
        let mut c = clock(1, 10);
        assert_eq!(pre_snap_runoff(&c, Tempo::Milk, &cfg), 9);
        c.running = false;
        assert_eq!(pre_snap_runoff(&c, Tempo::Normal, &cfg), 0);
    }

    #[test]
    fn test_tempo_choice() {
        assert_eq!(choose_tempo(&clock(1, 500), -14), Tempo::Normal);
        assert_eq!(choose_tempo(&clock(4, 200), -3), Tempo::HurryUp);
        assert_eq!(choose_tempo(&clock(4, 200), 7), Tempo::Milk);
        assert_eq!(choose_tempo(&clock(2, 90), 0), Tempo::HurryUp);
    }
}
