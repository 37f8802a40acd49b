use thiserror::Error;

/// Contract violations raised by the simulation core.
///
/// Data anomalies (out-of-range ratings, malformed gameplans, unknown play
/// calls) never surface here; they are clamped or replaced at the point of
/// use so long simulations always finish.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Illegal transition: {event} from {from}")]
    IllegalTransition { from: String, event: String },

    #[error("Unknown league phase: {0}")]
    UnknownPhase(String),

    #[error("Week {week} ({game_type}) was already simulated")]
    WeekAlreadySimulated { week: u16, game_type: String },

    #[error("Playoff round {round} still has {pending} unplayed game(s)")]
    RoundIncomplete { round: String, pending: usize },

    #[error("Playoff bracket already has a champion")]
    BracketComplete,

    #[error("League has no teams")]
    EmptyLeague,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Contract violations point at a caller bug; only serialization failures
    /// depend on the environment.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, SimError::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::IllegalTransition {
            from: "offseason".into(),
            event: "start_playoffs".into(),
        };
        assert_eq!(err.to_string(), "Illegal transition: start_playoffs from offseason");

        let err = SimError::RoundIncomplete { round: "wild_card".into(), pending: 2 };
        assert!(err.to_string().contains("2 unplayed"));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: SimError = parse.unwrap_err().into();
        assert!(!err.is_contract_violation());
    }
}
