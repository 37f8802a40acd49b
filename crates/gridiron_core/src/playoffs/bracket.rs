//! Playoff bracket data and seeding rules

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{SimSystemsConfig, MAX_PLAYOFF_SEEDS};
use crate::league::{LeagueState, StandingsRecord};

// ============================================================================
// Seeding
// ============================================================================

/// Total order used to seed playoff teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingRule {
    /// Win percentage desc, point differential desc, points for desc,
    /// team id ascending.
    #[default]
    WinPctPointDiffPointsForTeamId,
}

impl SeedingRule {
    pub fn compare(self, a: (&str, &StandingsRecord), b: (&str, &StandingsRecord)) -> Ordering {
        match self {
            SeedingRule::WinPctPointDiffPointsForTeamId => {
                let (a_id, a_rec) = a;
                let (b_id, b_rec) = b;
                b_rec
                    .win_pct()
                    .total_cmp(&a_rec.win_pct())
                    .then_with(|| b_rec.point_diff().cmp(&a_rec.point_diff()))
                    .then_with(|| b_rec.points_for.cmp(&a_rec.points_for))
                    .then_with(|| a_id.cmp(b_id))
            }
        }
    }

    /// `teams` sorted best first. Missing standings count as 0-0.
    pub fn order(self, league: &LeagueState, teams: &[String]) -> Vec<String> {
        let mut ranked: Vec<(String, StandingsRecord)> = teams
            .iter()
            .map(|id| (id.clone(), league.record(id).copied().unwrap_or_default()))
            .collect();
        ranked.sort_by(|a, b| self.compare((&a.0, &a.1), (&b.0, &b.1)));
        ranked.into_iter().map(|(id, _)| id).collect()
    }
}

/// Seeds for a conference of `conference_size` teams.
pub fn seeds_per_conference(conference_size: usize, cfg: &SimSystemsConfig) -> usize {
    let configured = cfg.league.playoff_seeds_per_conference.clamp(1, MAX_PLAYOFF_SEEDS);
    configured.min(conference_size.div_ceil(2)).min(conference_size)
}

// ============================================================================
// Rounds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoffRound {
    WildCard,
    Divisional,
    Conference,
    Championship,
}

impl PlayoffRound {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayoffRound::WildCard => "wild_card",
            PlayoffRound::Divisional => "divisional",
            PlayoffRound::Conference => "conference",
            PlayoffRound::Championship => "championship",
        }
    }

    /// Conference rounds for a bracket of `size` slots, counted back from
    /// the conference final.
    pub fn conference_rounds(size: usize) -> Vec<PlayoffRound> {
        const BACKWARDS: [PlayoffRound; 3] =
            [PlayoffRound::Conference, PlayoffRound::Divisional, PlayoffRound::WildCard];
        let count = if size <= 1 { 0 } else { size.next_power_of_two().trailing_zeros() as usize };
        let mut rounds: Vec<PlayoffRound> = BACKWARDS.iter().take(count).copied().collect();
        rounds.reverse();
        rounds
    }
}

// ============================================================================
// Bracket
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededTeam {
    pub seed: u8,
    pub team_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffGameResult {
    pub home_score: u16,
    pub away_score: u16,
    pub winner: String,
    pub overtime: bool,
    pub user_game: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffGame {
    pub game_id: String,
    pub round: PlayoffRound,
    /// `None` for the championship
    pub conference: Option<String>,
    pub home_id: String,
    pub away_id: String,
    pub home_seed: Option<u8>,
    pub away_seed: Option<u8>,
    pub result: Option<PlayoffGameResult>,
}

impl PlayoffGame {
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    pub fn loser(&self) -> Option<&str> {
        let result = self.result.as_ref()?;
        Some(if result.winner == self.home_id { &self.away_id } else { &self.home_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceBracket {
    pub name: String,
    /// Best first
    pub seeds: Vec<SeededTeam>,
    /// Rounds this conference plays, in order
    pub rounds: Vec<PlayoffRound>,
    pub games: BTreeMap<PlayoffRound, Vec<PlayoffGame>>,
    /// Still alive, best seed first
    pub alive: Vec<SeededTeam>,
    pub champion: Option<String>,
}

impl ConferenceBracket {
    /// Top seeds that skip the first round.
    pub fn byes(&self) -> usize {
        match self.seeds.len() {
            0 | 1 => 0,
            n => n.next_power_of_two() - n,
        }
    }
}

/// Completed game, keyed by game id in [`PlayoffBracket::completed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedGame {
    pub round: PlayoffRound,
    pub home_id: String,
    pub away_id: String,
    pub home_score: u16,
    pub away_score: u16,
    pub winner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    pub season: u16,
    pub seeding_rule: SeedingRule,
    /// League-wide rounds in play order
    pub rounds: Vec<PlayoffRound>,
    /// Index into `rounds`; equals `rounds.len()` once every round is played
    pub current_round: usize,
    pub conferences: Vec<ConferenceBracket>,
    pub championship: Option<PlayoffGame>,
    pub completed: BTreeMap<String, CompletedGame>,
    /// Seeded order across the whole league; decides the title-game host
    pub league_order: Vec<String>,
    pub champion: Option<String>,
}

impl PlayoffBracket {
    pub fn current(&self) -> Option<PlayoffRound> {
        self.rounds.get(self.current_round).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.champion.is_some()
    }

    /// Every game created so far, in play order.
    pub fn all_games(&self) -> Vec<&PlayoffGame> {
        let mut games: Vec<&PlayoffGame> = Vec::new();
        for round in &self.rounds {
            for conf in &self.conferences {
                if let Some(list) = conf.games.get(round) {
                    games.extend(list.iter());
                }
            }
        }
        games.extend(self.championship.iter());
        games
    }
}
