//! Drive log view for UI consumers
//!
//! Categories are inferred from the free-text result. The structured
//! `tags` on each entry carry the same information; this view exists for
//! consumers that only read text.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::state::DriveLogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Scoring,
    Turnover,
    Penalty,
    Timeout,
    Run,
    Pass,
    Special,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogViewEntry {
    pub play_id: u32,
    pub quarter: u8,
    /// "12:34"
    pub clock: String,
    pub offense: String,
    pub category: LogCategory,
    /// First "N yds" in the text
    pub yards: Option<i32>,
    pub text: String,
}

const SCORING: [&str; 4] = ["touchdown", "field goal is good", "safety", "wins the kick duel"];
const TURNOVER: [&str; 3] = ["intercept", "fumble", "turnover on downs"];
const SPECIAL: [&str; 4] = ["punt", "kickoff", "free kick", "field goal"];
const PASS: [&str; 3] = ["complete", "sacked", "pass"];
const RUN: [&str; 6] = ["inside zone", "outside zone", "power", "sneak", "draw", "kneels"];

fn yards_pattern() -> Option<&'static Regex> {
    static YARDS: OnceLock<Option<Regex>> = OnceLock::new();
    YARDS.get_or_init(|| Regex::new(r"(-?\d+) yds?\b").ok()).as_ref()
}

/// 결과 텍스트 → 카테고리
pub fn classify_entry(text: &str) -> LogCategory {
    let lower = text.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&SCORING) {
        LogCategory::Scoring
    } else if has(&TURNOVER) {
        LogCategory::Turnover
    } else if lower.contains("penalty") {
        LogCategory::Penalty
    } else if lower.contains("timeout") {
        LogCategory::Timeout
    } else if has(&SPECIAL) {
        LogCategory::Special
    } else if has(&PASS) {
        LogCategory::Pass
    } else if has(&RUN) {
        LogCategory::Run
    } else {
        LogCategory::Other
    }
}

/// Yardage of the first "N yds" in the text.
pub fn parse_yards(text: &str) -> Option<i32> {
    let caps = yards_pattern()?.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Read-only projection of a drive log.
pub fn derive_log_view(log: &[DriveLogEntry]) -> Vec<LogViewEntry> {
    log.iter()
        .map(|entry| LogViewEntry {
            play_id: entry.play_id,
            quarter: entry.quarter,
            clock: format!("{:02}:{:02}", entry.clock_seconds / 60, entry.clock_seconds % 60),
            offense: entry.offense.clone(),
            category: classify_entry(&entry.result),
            yards: parse_yards(&entry.result),
            text: entry.result.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimSystemsConfig;
    use crate::game::engine::simulate_game;
    use crate::game::state::GameSimParams;

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify_entry("HOME power for 3 yds, touchdown HOME, extra point good"), LogCategory::Scoring);
        assert_eq!(classify_entry("pass intercepted by AWAY, returned 12 yds"), LogCategory::Turnover);
        assert_eq!(classify_entry("penalty on HOME: holding, 10 yds, replay down"), LogCategory::Penalty);
        assert_eq!(classify_entry("timeout HOME (2 left), HOME quick game incomplete"), LogCategory::Timeout);
        assert_eq!(classify_entry("HOME punt 44 yds, fair catch"), LogCategory::Special);
        assert_eq!(classify_entry("42-yard field goal is no good, wide left"), LogCategory::Special);
        assert_eq!(classify_entry("HOME dropback complete for 14 yds, 1st down"), LogCategory::Pass);
        assert_eq!(classify_entry("HOME inside zone for 4 yds"), LogCategory::Run);
        assert_eq!(classify_entry("end of quarter 1"), LogCategory::Other);
    }

    #[test]
    fn test_parse_yards() {
        assert_eq!(parse_yards("HOME draw for -2 yds"), Some(-2));
        assert_eq!(parse_yards("HOME sacked for a loss of 7 yds"), Some(7));
        assert_eq!(parse_yards("end of half"), None);
    }

    #[test]
    fn test_view_leaves_log_untouched() {
        let cfg = SimSystemsConfig::default();
        let summary = simulate_game(GameSimParams::new("HOME", "AWAY", 17), &cfg);
        let before = summary.log.clone();
        let view = derive_log_view(&summary.log);
        assert_eq!(summary.log, before);
        assert_eq!(view.len(), before.len());
        assert!(view.iter().any(|v| v.category == LogCategory::Run));
        assert!(view.iter().any(|v| v.category == LogCategory::Pass));
    }
}
