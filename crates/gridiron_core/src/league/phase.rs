//! League phase machine
//!
//! ```text
//! Preseason ─start_regular_season─▶ RegularSeason ─start_playoffs─▶ Playoffs
//!     ▲                                                               │
//!     └──────── start_new_season ── Offseason ◀── crown_champion ─────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaguePhase {
    #[default]
    Preseason,
    RegularSeason,
    Playoffs,
    Offseason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeagueEvent {
    StartRegularSeason,
    StartPlayoffs,
    CrownChampion,
    StartNewSeason,
}

impl LeaguePhase {
    pub const ALL: [LeaguePhase; 4] = [
        LeaguePhase::Preseason,
        LeaguePhase::RegularSeason,
        LeaguePhase::Playoffs,
        LeaguePhase::Offseason,
    ];

    pub fn as_key(self) -> &'static str {
        match self {
            LeaguePhase::Preseason => "preseason",
            LeaguePhase::RegularSeason => "regular_season",
            LeaguePhase::Playoffs => "playoffs",
            LeaguePhase::Offseason => "offseason",
        }
    }

    /// Parse a stored phase key. Unknown keys are a caller bug.
    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_key() == key)
            .ok_or_else(|| SimError::UnknownPhase(key.to_string()))
    }
}

impl LeagueEvent {
    pub fn as_key(self) -> &'static str {
        match self {
            LeagueEvent::StartRegularSeason => "start_regular_season",
            LeagueEvent::StartPlayoffs => "start_playoffs",
            LeagueEvent::CrownChampion => "crown_champion",
            LeagueEvent::StartNewSeason => "start_new_season",
        }
    }
}

/// 리그 단계 전이 테이블
pub fn advance_phase(phase: LeaguePhase, event: LeagueEvent) -> Result<LeaguePhase> {
    use LeagueEvent::*;
    use LeaguePhase::*;
    match (phase, event) {
        (Preseason, StartRegularSeason) => Ok(RegularSeason),
        (RegularSeason, StartPlayoffs) => Ok(Playoffs),
        (Playoffs, CrownChampion) => Ok(Offseason),
        (Offseason, StartNewSeason) => Ok(Preseason),
        (from, event) => Err(SimError::IllegalTransition {
            from: from.as_key().to_string(),
            event: event.as_key().to_string(),
        }),
    }
}

/// [`advance_phase`] on a stored key.
pub fn advance_phase_key(key: &str, event: LeagueEvent) -> Result<LeaguePhase> {
    advance_phase(LeaguePhase::from_key(key)?, event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut phase = LeaguePhase::Preseason;
        for event in [
            LeagueEvent::StartRegularSeason,
            LeagueEvent::StartPlayoffs,
            LeagueEvent::CrownChampion,
            LeagueEvent::StartNewSeason,
        ] {
            phase = advance_phase(phase, event).unwrap();
        }
        assert_eq!(phase, LeaguePhase::Preseason);
    }

    #[test]
    fn test_illegal_transition_errors() {
        let err = advance_phase(LeaguePhase::Offseason, LeagueEvent::StartPlayoffs).unwrap_err();
        assert!(matches!(err, SimError::IllegalTransition { .. }));
        assert_eq!(err.to_string(), "Illegal transition: start_playoffs from offseason");
    }

    #[test]
    fn test_keys_round_trip_and_unknown_key() {
        for phase in LeaguePhase::ALL {
            assert_eq!(LeaguePhase::from_key(phase.as_key()).unwrap(), phase);
        }
        assert!(matches!(LeaguePhase::from_key("halftime"), Err(SimError::UnknownPhase(_))));
        assert!(advance_phase_key("draft_day", LeagueEvent::StartNewSeason).is_err());
        assert_eq!(
            advance_phase_key("playoffs", LeagueEvent::CrownChampion).unwrap(),
            LeaguePhase::Offseason
        );
    }
}
