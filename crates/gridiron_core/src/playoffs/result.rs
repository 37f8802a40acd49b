//! Per-team postseason outcome

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::bracket::{PlayoffBracket, PlayoffRound};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPostseasonResult {
    pub made_playoffs: bool,
    pub seed: Option<u8>,
    /// Round of the team's last loss; `None` for the champion and non-qualifiers
    pub eliminated_in: Option<PlayoffRound>,
    pub champion: bool,
}

/// Postseason of one season, every league team included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostseasonRecord {
    pub season: u16,
    pub champion: Option<String>,
    pub results: BTreeMap<String, TeamPostseasonResult>,
}

impl PostseasonRecord {
    pub fn champions(&self) -> impl Iterator<Item = &str> {
        self.results.iter().filter(|(_, r)| r.champion).map(|(id, _)| id.as_str())
    }

    pub fn qualifiers(&self) -> usize {
        self.results.values().filter(|r| r.made_playoffs).count()
    }
}

/// Derive the record from a bracket. Teams outside `team_ids` that appear
/// in the bracket are still listed.
pub fn postseason_record(bracket: &PlayoffBracket, team_ids: &[String]) -> PostseasonRecord {
    let mut results: BTreeMap<String, TeamPostseasonResult> =
        team_ids.iter().map(|id| (id.clone(), TeamPostseasonResult::default())).collect();

    for conf in &bracket.conferences {
        for seeded in &conf.seeds {
            let entry = results.entry(seeded.team_id.clone()).or_default();
            entry.made_playoffs = true;
            entry.seed = Some(seeded.seed);
        }
    }
    for game in bracket.all_games() {
        if let Some(loser) = game.loser() {
            results.entry(loser.to_string()).or_default().eliminated_in = Some(game.round);
        }
    }
    if let Some(champ) = &bracket.champion {
        let entry = results.entry(champ.clone()).or_default();
        entry.champion = true;
        entry.eliminated_in = None;
    }

    PostseasonRecord { season: bracket.season, champion: bracket.champion.clone(), results }
}
