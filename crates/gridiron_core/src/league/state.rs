//! League state: standings, results, conferences

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::phase::LeaguePhase;
use super::rankings::AwardsTally;
use super::schedule::Schedule;
use crate::config::SimSystemsConfig;
use crate::game::{Sides, TeamBox};
use crate::playoffs::PostseasonRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRecord {
    pub wins: u16,
    pub losses: u16,
    /// Only recorded user scores can tie
    #[serde(default)]
    pub ties: u16,
    pub points_for: u32,
    pub points_against: u32,
}

impl StandingsRecord {
    pub fn games(&self) -> u16 {
        self.wins + self.losses + self.ties
    }

    /// Ties count half. 0.0 before the first game.
    pub fn win_pct(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            g => (self.wins as f64 + 0.5 * self.ties as f64) / g as f64,
        }
    }

    pub fn point_diff(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }

    /// "10-7" or "9-7-1"
    pub fn display(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Regular,
    Playoff,
}

impl GameType {
    pub fn as_str(self) -> &'static str {
        match self {
            GameType::Regular => "regular",
            GameType::Playoff => "playoff",
        }
    }
}

/// One completed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: String,
    pub season: u16,
    pub week: u16,
    pub game_type: GameType,
    pub home_id: String,
    pub away_id: String,
    pub home_score: u16,
    pub away_score: u16,
    /// `None` only for a tied user score
    pub winner: Option<String>,
    pub user_game: bool,
    pub overtime: bool,
    /// Present for play-by-play games
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub box_score: Option<Sides<TeamBox>>,
}

impl GameResult {
    pub fn loser(&self) -> Option<&str> {
        let winner = self.winner.as_deref()?;
        Some(if winner == self.home_id { &self.away_id } else { &self.home_id })
    }

    pub fn margin(&self) -> u16 {
        self.home_score.abs_diff(self.away_score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    pub name: String,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueState {
    pub season: u16,
    pub phase: LeaguePhase,
    /// Input order; conferences and schedules depend on it
    pub team_ids: Vec<String>,
    pub conferences: Vec<Conference>,
    pub standings: BTreeMap<String, StandingsRecord>,
    pub results: Vec<GameResult>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub postseason: Option<PostseasonRecord>,
    /// Weeks already recorded, per game type
    #[serde(default)]
    pub simulated_weeks: BTreeSet<(GameType, u16)>,
    #[serde(default)]
    pub awards: AwardsTally,
}

/// Zeroed standings for every id, conferences split by list order.
pub fn init_league_state(team_ids: &[String], season: u16, cfg: &SimSystemsConfig) -> LeagueState {
    let standings = team_ids.iter().map(|id| (id.clone(), StandingsRecord::default())).collect();
    LeagueState {
        season,
        phase: LeaguePhase::Preseason,
        team_ids: team_ids.to_vec(),
        conferences: split_conferences(team_ids, &cfg.league.conference_names),
        standings,
        results: Vec::new(),
        schedule: None,
        postseason: None,
        simulated_weeks: BTreeSet::new(),
        awards: AwardsTally::default(),
    }
}

/// Most conferences a league is split into; the title game pairs their champions.
pub const MAX_CONFERENCES: usize = 2;

/// Contiguous chunks of the id list, one per name. Empty chunks are dropped.
fn split_conferences(team_ids: &[String], names: &[String]) -> Vec<Conference> {
    if team_ids.is_empty() {
        return Vec::new();
    }
    let fallback = ["LEAGUE".to_string()];
    let names = if names.is_empty() { &fallback[..] } else { &names[..names.len().min(MAX_CONFERENCES)] };
    let chunk = team_ids.len().div_ceil(names.len());
    team_ids
        .chunks(chunk)
        .zip(names.iter())
        .map(|(teams, name)| Conference { name: name.clone(), teams: teams.to_vec() })
        .collect()
}

impl LeagueState {
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn record(&self, team_id: &str) -> Option<&StandingsRecord> {
        self.standings.get(team_id)
    }

    pub fn conference_of(&self, team_id: &str) -> Option<&Conference> {
        self.conferences.iter().find(|c| c.teams.iter().any(|t| t == team_id))
    }

    pub fn is_week_simulated(&self, week: u16, game_type: GameType) -> bool {
        self.simulated_weeks.contains(&(game_type, week))
    }

    /// Sum of wins + losses + ties over every team.
    pub fn recorded_decisions(&self) -> u32 {
        self.standings.values().map(|r| r.games() as u32).sum()
    }

    /// Fold one result into the standings. Unknown ids get a fresh record.
    pub(crate) fn apply_result(&mut self, result: &GameResult) {
        let sides = [
            (&result.home_id, result.home_score, result.away_score),
            (&result.away_id, result.away_score, result.home_score),
        ];
        for (team, scored, allowed) in sides {
            let rec = self.standings.entry(team.clone()).or_default();
            rec.points_for += scored as u32;
            rec.points_against += allowed as u32;
            match result.winner.as_deref() {
                Some(w) if w == team.as_str() => rec.wins += 1,
                Some(_) => rec.losses += 1,
                None => rec.ties += 1,
            }
        }
    }
}
