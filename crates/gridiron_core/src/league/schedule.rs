//! Regular-season schedule generation (circle method)
//!
//! 1. Shuffle the id list with `rng(seed, "schedule-order")`.
//! 2. Build one full round robin: slot 0 stays fixed, the rest rotate.
//! 3. Shuffle the round order with `rng(seed, "schedule-rounds")`.
//! 4. Lay rounds onto weeks, cycling through the round robin; every other
//!    cycle swaps home and away.
//!
//! Odd team counts add a bye slot. Those leagues are scheduled in whole
//! cycles so every team gets the same number of games.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::REGULAR_SEASON_WEEKS;
use crate::rng::rng;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub home: String,
    pub away: String,
}

impl Matchup {
    pub fn involves(&self, team_id: &str) -> bool {
        self.home == team_id || self.away == team_id
    }

    /// Same pairing, either orientation.
    pub fn same_teams(&self, a: &str, b: &str) -> bool {
        (self.home == a && self.away == b) || (self.home == b && self.away == a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWeek {
    /// 1-based
    pub week: u16,
    pub matchups: Vec<Matchup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub weeks: Vec<ScheduleWeek>,
}

impl Schedule {
    pub fn week(&self, week: u16) -> Option<&ScheduleWeek> {
        self.weeks.iter().find(|w| w.week == week)
    }

    pub fn total_games(&self) -> usize {
        self.weeks.iter().map(|w| w.matchups.len()).sum()
    }

    pub fn games_for(&self, team_id: &str) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| w.matchups.iter())
            .filter(|m| m.involves(team_id))
            .count()
    }
}

/// Full regular season of [`REGULAR_SEASON_WEEKS`] weeks.
pub fn generate_league_schedule(team_ids: &[String], seed: u32) -> Schedule {
    generate_schedule_with_weeks(team_ids, seed, REGULAR_SEASON_WEEKS)
}

/// Schedule with `weeks` weeks (odd leagues round up to whole cycles).
pub fn generate_schedule_with_weeks(team_ids: &[String], seed: u32, weeks: u16) -> Schedule {
    if team_ids.len() < 2 || weeks == 0 {
        return Schedule::default();
    }

    let mut slots: Vec<Option<&str>> = team_ids.iter().map(|id| Some(id.as_str())).collect();
    rng(seed, Some("schedule-order")).shuffle(&mut slots);
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let rounds = round_robin(&slots);
    let mut order: Vec<usize> = (0..rounds.len()).collect();
    rng(seed, Some("schedule-rounds")).shuffle(&mut order);

    let per_cycle = rounds.len() as u16;
    let weeks = if team_ids.len() % 2 == 1 {
        let cycles = weeks.div_ceil(per_cycle);
        warn!(
            "{} teams: scheduling {} full cycles ({} weeks) so byes stay even",
            team_ids.len(),
            cycles,
            cycles * per_cycle
        );
        cycles * per_cycle
    } else {
        weeks
    };

    let weeks = (0..weeks)
        .map(|w| {
            let cycle = w / per_cycle;
            let round = &rounds[order[(w % per_cycle) as usize]];
            let matchups = round
                .iter()
                .map(|&(home, away)| {
                    let (home, away) = if cycle % 2 == 1 { (away, home) } else { (home, away) };
                    Matchup { home: home.to_string(), away: away.to_string() }
                })
                .collect();
            ScheduleWeek { week: w + 1, matchups }
        })
        .collect();

    Schedule { weeks }
}

/// One round robin over an even slot list; byes (`None`) are dropped.
fn round_robin<'a>(slots: &[Option<&'a str>]) -> Vec<Vec<(&'a str, &'a str)>> {
    let n = slots.len();
    let mut ring: Vec<usize> = (1..n).collect();
    let mut rounds = Vec::with_capacity(n - 1);

    for r in 0..n - 1 {
        let mut lineup = Vec::with_capacity(n);
        lineup.push(0);
        lineup.extend_from_slice(&ring);

        let mut games = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (a, b) = (lineup[i], lineup[n - 1 - i]);
            // alternate the fixed slot's venue round to round
            let (home, away) = if (r + i) % 2 == 0 { (a, b) } else { (b, a) };
            if let (Some(h), Some(w)) = (slots[home], slots[away]) {
                games.push((h, w));
            }
        }
        rounds.push(games);
        ring.rotate_right(1);
    }
    rounds
}
