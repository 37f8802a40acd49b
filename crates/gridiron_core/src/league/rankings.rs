//! Weekly power rankings and the MVP race

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::{GameResult, LeagueState};
use crate::ratings::{rating_z, TeamRatings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerRankingEntry {
    pub rank: u16,
    pub team_id: String,
    pub score: f64,
    /// "W-L"
    pub record: String,
}

/// Ranking score: record first, margin second, roster strength as the
/// early-season prior.
fn power_score(league: &LeagueState, team_id: &str) -> f64 {
    let rec = league.record(team_id).copied().unwrap_or_default();
    let games = rec.games().max(1) as f64;
    let per_game_diff = rec.point_diff() as f64 / games;
    let prior = rating_z(TeamRatings::for_team(team_id).overall());
    rec.win_pct() * 100.0 + per_game_diff * 1.5 + prior * 5.0
}

/// Every team, best first; ties go to the lower team id.
pub fn compute_power_rankings(league: &LeagueState) -> Vec<PowerRankingEntry> {
    let mut scored: Vec<(String, f64)> =
        league.standings.keys().map(|id| (id.clone(), power_score(league, id))).collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (team_id, score))| PowerRankingEntry {
            rank: i as u16 + 1,
            record: league.record(&team_id).map(|r| r.display()).unwrap_or_default(),
            team_id,
            score: (score * 100.0).round() / 100.0,
        })
        .collect()
}

// ============================================================================
// Awards
// ============================================================================

/// Season-long award race, keyed by team (the team's starting QB).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwardsTally {
    pub mvp_points: BTreeMap<String, f64>,
    pub players_of_the_week: Vec<PlayerOfTheWeek>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerOfTheWeek {
    pub week: u16,
    pub team_id: String,
    pub game_score: f64,
}

/// Award artifacts of one simulated week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAwards {
    pub week: u16,
    pub player_of_the_week: Option<PlayerOfTheWeek>,
    pub mvp_leader: Option<String>,
}

impl AwardsTally {
    /// Current leader; ties go to the lower team id.
    pub fn mvp_leader(&self) -> Option<&str> {
        self.mvp_points
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(id, _)| id.as_str())
    }
}

/// QB game score for one side of a result. Box scores count passing
/// production; aggregate results fall back to the margin.
fn qb_game_score(result: &GameResult, team_id: &str) -> f64 {
    let won = result.winner.as_deref() == Some(team_id);
    let base = if won { 10.0 } else { 0.0 };
    match &result.box_score {
        Some(sides) => {
            let team_box = if team_id == result.home_id { &sides.home } else { &sides.away };
            base + team_box.pass_yards as f64 / 25.0 + team_box.touchdowns as f64 * 4.0
                - team_box.turnovers as f64 * 3.0
        }
        None => {
            let (own, other) = if team_id == result.home_id {
                (result.home_score, result.away_score)
            } else {
                (result.away_score, result.home_score)
            };
            base + own as f64 * 0.5 - other as f64 * 0.2
        }
    }
}

/// Fold one week of results into the tally.
pub fn tally_week_awards(tally: &AwardsTally, results: &[GameResult], week: u16) -> (AwardsTally, WeeklyAwards) {
    let mut next = tally.clone();
    let mut best: Option<PlayerOfTheWeek> = None;

    for result in results {
        for team in [&result.home_id, &result.away_id] {
            let score = qb_game_score(result, team);
            *next.mvp_points.entry(team.clone()).or_default() += score.max(0.0);
            let better = match &best {
                None => true,
                Some(b) => score > b.game_score || (score == b.game_score && *team < b.team_id),
            };
            if better {
                best = Some(PlayerOfTheWeek { week, team_id: team.clone(), game_score: score });
            }
        }
    }
    if let Some(potw) = &best {
        next.players_of_the_week.push(potw.clone());
    }
    let weekly = WeeklyAwards {
        week,
        player_of_the_week: best,
        mvp_leader: next.mvp_leader().map(str::to_string),
    };
    (next, weekly)
}
