//! Play concepts, personnel packages, gameplans and play-call resolution

use serde::{Deserialize, Serialize};

use super::state::GameSimState;
use crate::physics::DropDepth;

/// Offensive play concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayConcept {
    // Runs
    InsideZone,
    OutsideZone,
    Power,
    QbSneak,
    Draw,
    // Passes
    Quick,
    Dropback,
    DeepShot,
    Screen,
    PlayAction,
    // Special teams / clock
    Punt,
    FieldGoal,
    Kneel,
}

impl PlayConcept {
    pub const RUNS: [PlayConcept; 5] = [
        PlayConcept::InsideZone,
        PlayConcept::OutsideZone,
        PlayConcept::Power,
        PlayConcept::QbSneak,
        PlayConcept::Draw,
    ];

    pub const PASSES: [PlayConcept; 5] = [
        PlayConcept::Quick,
        PlayConcept::Dropback,
        PlayConcept::DeepShot,
        PlayConcept::Screen,
        PlayConcept::PlayAction,
    ];

    pub fn is_run(self) -> bool {
        Self::RUNS.contains(&self)
    }

    pub fn is_pass(self) -> bool {
        Self::PASSES.contains(&self)
    }

    pub fn is_special(self) -> bool {
        matches!(self, PlayConcept::Punt | PlayConcept::FieldGoal)
    }

    /// Scheme expectation for designed runs and yards after catch.
    pub fn base_gain(self) -> f64 {
        match self {
            PlayConcept::InsideZone => 3.8,
            PlayConcept::OutsideZone => 4.2,
            PlayConcept::Power => 3.6,
            PlayConcept::QbSneak => 1.5,
            PlayConcept::Draw => 4.0,
            PlayConcept::Screen => 5.0,
            PlayConcept::Quick => 3.0,
            PlayConcept::Dropback => 3.5,
            PlayConcept::DeepShot => 3.0,
            PlayConcept::PlayAction => 4.0,
            PlayConcept::Punt | PlayConcept::FieldGoal | PlayConcept::Kneel => 0.0,
        }
    }

    /// Target air yards for pass concepts.
    pub fn target_depth(self) -> f64 {
        match self {
            PlayConcept::Screen => -1.0,
            PlayConcept::Quick => 5.0,
            PlayConcept::Dropback => 11.0,
            PlayConcept::PlayAction => 14.0,
            PlayConcept::DeepShot => 32.0,
            _ => 0.0,
        }
    }

    pub fn drop_depth(self) -> DropDepth {
        match self {
            PlayConcept::Quick | PlayConcept::Screen => DropDepth::Quick,
            PlayConcept::DeepShot => DropDepth::Deep,
            _ => DropDepth::Standard,
        }
    }

    /// Human readable name for logs
    pub fn label(self) -> &'static str {
        match self {
            PlayConcept::InsideZone => "inside zone",
            PlayConcept::OutsideZone => "outside zone",
            PlayConcept::Power => "power",
            PlayConcept::QbSneak => "QB sneak",
            PlayConcept::Draw => "draw",
            PlayConcept::Quick => "quick game",
            PlayConcept::Dropback => "dropback",
            PlayConcept::DeepShot => "deep shot",
            PlayConcept::Screen => "screen",
            PlayConcept::PlayAction => "play action",
            PlayConcept::Punt => "punt",
            PlayConcept::FieldGoal => "field goal",
            PlayConcept::Kneel => "kneel",
        }
    }
}

/// Offensive personnel package (RB/TE counts, e.g. `11` = 1 RB, 1 TE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Personnel {
    #[serde(rename = "11")]
    P11,
    #[serde(rename = "12")]
    P12,
    #[serde(rename = "21")]
    P21,
    #[serde(rename = "13")]
    P13,
    #[serde(rename = "10")]
    P10,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "heavy")]
    Heavy,
    #[serde(rename = "special_teams")]
    SpecialTeams,
}

impl Personnel {
    pub fn label(self) -> &'static str {
        match self {
            Personnel::P11 => "11",
            Personnel::P12 => "12",
            Personnel::P21 => "21",
            Personnel::P13 => "13",
            Personnel::P10 => "10",
            Personnel::Empty => "empty",
            Personnel::Heavy => "heavy",
            Personnel::SpecialTeams => "special_teams",
        }
    }

    /// Whether a concept can be run out of this package.
    pub fn supports(self, concept: PlayConcept) -> bool {
        use Personnel::*;
        use PlayConcept::*;
        match concept {
            Punt | FieldGoal => self == SpecialTeams,
            Kneel => self != SpecialTeams,
            QbSneak => !matches!(self, SpecialTeams),
            InsideZone | Power => matches!(self, P11 | P12 | P21 | P13 | Heavy),
            OutsideZone | Draw => matches!(self, P11 | P12 | P21 | P13 | P10),
            PlayAction => matches!(self, P11 | P12 | P21 | P13),
            Screen => matches!(self, P11 | P12 | P21 | P10),
            Quick | Dropback | DeepShot => matches!(self, P11 | P12 | P21 | P10 | Empty),
        }
    }

    /// Package chosen when a concept is called without one.
    pub fn default_for(concept: PlayConcept, short_yardage: bool) -> Self {
        use PlayConcept::*;
        match concept {
            Punt | FieldGoal => Personnel::SpecialTeams,
            QbSneak | Kneel => Personnel::Heavy,
            InsideZone | Power if short_yardage => Personnel::Heavy,
            InsideZone => Personnel::P12,
            Power => Personnel::P21,
            OutsideZone | Draw | Screen | Dropback => Personnel::P11,
            PlayAction => Personnel::P12,
            Quick | DeepShot => Personnel::P10,
        }
    }
}

// ============================================================================
// Gameplan
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffensiveFocus {
    #[default]
    Balanced,
    RunHeavy,
    PassHeavy,
    /// Shot plays downfield
    Vertical,
}

impl OffensiveFocus {
    /// Baseline run share before down/distance adjustments.
    pub fn run_share(self) -> f64 {
        match self {
            OffensiveFocus::Balanced => 0.45,
            OffensiveFocus::RunHeavy => 0.60,
            OffensiveFocus::PassHeavy => 0.30,
            OffensiveFocus::Vertical => 0.38,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefensiveFocus {
    #[default]
    Balanced,
    Blitz,
    Coverage,
    StopRun,
}

/// Weekly plan supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gameplan {
    #[serde(default)]
    pub offensive_focus: OffensiveFocus,
    #[serde(default)]
    pub defensive_focus: DefensiveFocus,
    /// Opening script, indexed by play-in-drive on the first drive
    #[serde(default)]
    pub scripted_plays: Vec<PlayConcept>,
}

// ============================================================================
// Calls
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlayCall {
    #[default]
    Auto,
    Called { concept: PlayConcept, personnel: Personnel },
}

/// How the snapped play was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallSource {
    Called,
    Scripted,
    Auto,
    /// Called play was illegal; script or auto-pick replaced it
    Fallback,
}

/// Longest field goal attempt the engine accepts.
pub const MAX_FIELD_GOAL_DISTANCE: u8 = 70;

/// Situational check on top of the personnel table.
pub fn is_valid_call(state: &GameSimState, concept: PlayConcept, personnel: Personnel) -> bool {
    if !personnel.supports(concept) {
        return false;
    }
    match concept {
        PlayConcept::QbSneak => state.distance <= 2,
        PlayConcept::FieldGoal => state.yards_to_goal() + 17 <= MAX_FIELD_GOAL_DISTANCE,
        _ => true,
    }
}

/// Scripted concept for the current snap, if the offense is still on its
/// opening drive and the script has an entry for this play.
pub fn scripted_call(state: &GameSimState) -> Option<(PlayConcept, Personnel)> {
    let offense = state.offense();
    if *state.drives_started.get(offense) != 1 || state.down == 4 {
        return None;
    }
    let concept = *state.plans.get(offense).scripted_plays.get(state.play_in_drive as usize)?;
    let personnel = Personnel::default_for(concept, state.distance <= 2);
    (is_valid_call(state, concept, personnel) && !concept.is_special()).then_some((concept, personnel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_teams_only_for_kicks() {
        for concept in PlayConcept::RUNS.iter().chain(PlayConcept::PASSES.iter()) {
            assert!(!Personnel::SpecialTeams.supports(*concept), "{concept:?}");
        }
        assert!(Personnel::SpecialTeams.supports(PlayConcept::Punt));
        assert!(!Personnel::P11.supports(PlayConcept::FieldGoal));
    }

    #[test]
    fn test_defaults_are_supported() {
        let all = PlayConcept::RUNS
            .iter()
            .chain(PlayConcept::PASSES.iter())
            .chain([PlayConcept::Punt, PlayConcept::FieldGoal, PlayConcept::Kneel].iter());
        for concept in all {
            for short in [false, true] {
                assert!(Personnel::default_for(*concept, short).supports(*concept), "{concept:?}");
            }
        }
    }

    #[test]
    fn test_empty_backfield_cannot_run_power() {
        assert!(!Personnel::Empty.supports(PlayConcept::Power));
        assert!(Personnel::Empty.supports(PlayConcept::DeepShot));
    }

    #[test]
    fn test_call_json_shape() {
        let call = PlayCall::Called { concept: PlayConcept::Screen, personnel: Personnel::P11 };
        let json = serde_json::to_string(&call).unwrap();
        assert_eq!(json, r#"{"kind":"called","concept":"screen","personnel":"11"}"#);
    }
}
