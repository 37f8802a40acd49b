//! Weekly league simulation
//!
//! Non-user games run in parallel with rayon. Every game draws from its own
//! stream, `hash_seed(seed, season, week, game_type, home, away)`, and
//! results are folded into the standings in schedule order, so a parallel
//! run is identical to a serial one.

use log::{info, warn};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::rankings::{compute_power_rankings, tally_week_awards, PowerRankingEntry, WeeklyAwards};
use super::schedule::{Matchup, Schedule};
use super::state::{GameResult, GameType, LeagueState};
use crate::config::{SimMode, SimSystemsConfig};
use crate::error::{Result, SimError};
use crate::game::{simulate_game, GameSimParams, OvertimeRule, Sides, TeamBox};
use crate::ratings::{rating_z, TeamRatings};
use crate::rng::{hash_seed, keyed_rng};
use crate::seed_parts;

/// Score supplied by the caller for the user's game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserScore {
    pub home: u16,
    pub away: u16,
}

/// The one matchup the player controls this week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGame {
    pub home_id: String,
    pub away_id: String,
    /// Recorded as-is when present; simulated otherwise
    pub score: Option<UserScore>,
}

pub struct WeekSimArgs<'a> {
    pub league: LeagueState,
    pub schedule: &'a Schedule,
    pub week: u16,
    pub game_type: GameType,
    pub seed: u32,
    pub user_game: Option<UserGame>,
    /// Defaults to `cfg.league.sim_mode`
    pub mode: Option<SimMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSimOutcome {
    pub league: LeagueState,
    /// Schedule order
    pub results: Vec<GameResult>,
    pub power_rankings: Vec<PowerRankingEntry>,
    /// Regular-season weeks only
    pub awards: Option<WeeklyAwards>,
}

/// Final score of one simulated matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupScore {
    pub home_score: u16,
    pub away_score: u16,
    pub overtime: bool,
    pub box_score: Option<Sides<TeamBox>>,
}

/// Stream seed of one league game.
pub fn game_seed(seed: u32, season: u16, week: u16, game_type: GameType, home: &str, away: &str) -> u32 {
    hash_seed(&seed_parts![seed, season, week, game_type.as_str(), home, away])
}

/// Play one matchup to a decision. League and playoff games never tie:
/// play-by-play uses sudden death plus the kick duel, the aggregate model
/// breaks ties with an overtime field goal.
pub fn simulate_matchup(home: &str, away: &str, seed: u32, mode: SimMode, cfg: &SimSystemsConfig) -> MatchupScore {
    match mode {
        SimMode::PlayByPlay => {
            let params = GameSimParams::new(home, away, seed).with_overtime(OvertimeRule::SuddenDeath);
            let summary = simulate_game(params, cfg);
            MatchupScore {
                home_score: summary.home_score,
                away_score: summary.away_score,
                overtime: summary.overtime,
                box_score: Some(summary.box_score),
            }
        }
        SimMode::Aggregate => aggregate_score(home, away, seed, cfg),
    }
}

/// Ratings-driven score model: each side's points are normal around
/// `base + per_z * (own offense z - opposing defense z)`.
fn aggregate_score(home: &str, away: &str, seed: u32, cfg: &SimSystemsConfig) -> MatchupScore {
    let agg = &cfg.league.aggregate;
    let mut r = keyed_rng(seed, &seed_parts!["aggregate", home, away]);
    let h = TeamRatings::for_team(home);
    let a = TeamRatings::for_team(away);

    let home_mean = agg.base_points + agg.points_per_z * (rating_z(h.offense()) - rating_z(a.defense())) + agg.home_edge / 2.0;
    let away_mean = agg.base_points + agg.points_per_z * (rating_z(a.offense()) - rating_z(h.defense())) - agg.home_edge / 2.0;

    let mut draw = |mean: f64| {
        let noise = Normal::new(0.0, agg.score_sd.max(0.1)).map(|n| n.sample(&mut r)).unwrap_or(0.0);
        (mean + noise).round().clamp(0.0, 70.0) as u16
    };
    let mut home_score = draw(home_mean);
    let mut away_score = draw(away_mean);

    let overtime = home_score == away_score;
    if overtime {
        if r.next_f64() < 0.5 {
            home_score += 3;
        } else {
            away_score += 3;
        }
    }
    MatchupScore { home_score, away_score, overtime, box_score: None }
}

fn to_result(
    league: &LeagueState,
    week: u16,
    game_type: GameType,
    index: usize,
    matchup: &Matchup,
    score: MatchupScore,
    user_game: bool,
) -> GameResult {
    let winner = match score.home_score.cmp(&score.away_score) {
        std::cmp::Ordering::Greater => Some(matchup.home.clone()),
        std::cmp::Ordering::Less => Some(matchup.away.clone()),
        std::cmp::Ordering::Equal => None,
    };
    GameResult {
        game_id: format!("{}-{}-{}-{}", league.season, game_type.as_str(), week, index),
        season: league.season,
        week,
        game_type,
        home_id: matchup.home.clone(),
        away_id: matchup.away.clone(),
        home_score: score.home_score,
        away_score: score.away_score,
        winner,
        user_game,
        overtime: score.overtime,
        box_score: score.box_score,
    }
}

/// Simulate one scheduled week and fold it into the standings.
///
/// Emits exactly one result per scheduled matchup. A week that was already
/// recorded is an error; a user game that is not on the schedule is ignored.
pub fn simulate_league_week(args: WeekSimArgs<'_>, cfg: &SimSystemsConfig) -> Result<WeekSimOutcome> {
    let WeekSimArgs { mut league, schedule, week, game_type, seed, user_game, mode } = args;
    if league.is_week_simulated(week, game_type) {
        return Err(SimError::WeekAlreadySimulated { week, game_type: game_type.as_str().to_string() });
    }
    let mode = mode.unwrap_or(cfg.league.sim_mode);
    let matchups: &[Matchup] = schedule.week(week).map(|w| w.matchups.as_slice()).unwrap_or(&[]);
    if matchups.is_empty() {
        warn!("week {week} has no scheduled games");
    }

    let user_index = user_game.as_ref().and_then(|u| {
        let found = matchups.iter().position(|m| m.same_teams(&u.home_id, &u.away_id));
        if found.is_none() {
            warn!("user game {} at {} is not on week {week}; ignoring", u.away_id, u.home_id);
        }
        found
    });

    let season = league.season;
    let scores: Vec<MatchupScore> = matchups
        .par_iter()
        .enumerate()
        .map(|(i, m)| {
            let stream = game_seed(seed, season, week, game_type, &m.home, &m.away);
            match (user_index == Some(i), user_game.as_ref().and_then(|u| u.score)) {
                (true, Some(score)) => recorded_user_score(m, user_game.as_ref(), score),
                // the user's own game always gets a full drive log
                (true, None) => simulate_matchup(&m.home, &m.away, stream, SimMode::PlayByPlay, cfg),
                (false, _) => simulate_matchup(&m.home, &m.away, stream, mode, cfg),
            }
        })
        .collect();

    let results: Vec<GameResult> = matchups
        .iter()
        .zip(scores)
        .enumerate()
        .map(|(i, (m, score))| to_result(&league, week, game_type, i, m, score, user_index == Some(i)))
        .collect();

    // playoff games never count toward the regular-season standings
    if game_type == GameType::Regular {
        for result in &results {
            league.apply_result(result);
        }
    }
    league.results.extend(results.iter().cloned());
    league.simulated_weeks.insert((game_type, week));

    let awards = match game_type {
        GameType::Regular => {
            let (tally, weekly) = tally_week_awards(&league.awards, &results, week);
            league.awards = tally;
            Some(weekly)
        }
        GameType::Playoff => None,
    };
    let power_rankings = compute_power_rankings(&league);
    info!(
        "season {} {} week {}: {} games ({:?})",
        league.season,
        game_type.as_str(),
        week,
        results.len(),
        mode
    );

    Ok(WeekSimOutcome { league, results, power_rankings, awards })
}

/// User score oriented to the scheduled home/away.
fn recorded_user_score(m: &Matchup, user: Option<&UserGame>, score: UserScore) -> MatchupScore {
    let flipped = user.is_some_and(|u| u.home_id != m.home);
    let (home_score, away_score) = if flipped { (score.away, score.home) } else { (score.home, score.away) };
    MatchupScore { home_score, away_score, overtime: false, box_score: None }
}

/// One regular-season week from the league's own schedule.
pub fn simulate_week(league: LeagueState, week: u16, seed: u32, cfg: &SimSystemsConfig) -> Result<WeekSimOutcome> {
    let schedule = league.schedule.clone().unwrap_or_default();
    simulate_league_week(
        WeekSimArgs {
            league,
            schedule: &schedule,
            week,
            game_type: GameType::Regular,
            seed,
            user_game: None,
            mode: None,
        },
        cfg,
    )
}

/// Every scheduled week not yet recorded, in order.
pub fn simulate_regular_season(league: LeagueState, seed: u32, cfg: &SimSystemsConfig) -> Result<LeagueState> {
    if league.team_ids.is_empty() {
        return Err(SimError::EmptyLeague);
    }
    let weeks: Vec<u16> = league
        .schedule
        .as_ref()
        .map(|s| s.weeks.iter().map(|w| w.week).collect())
        .unwrap_or_default();

    let mut league = league;
    for week in weeks {
        if league.is_week_simulated(week, GameType::Regular) {
            continue;
        }
        league = simulate_week(league, week, seed, cfg)?.league;
    }
    Ok(league)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::schedule::generate_league_schedule;
    use crate::league::state::init_league_state;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("T{i:02}")).collect()
    }

    fn league(n: usize, seed: u32) -> LeagueState {
        let cfg = SimSystemsConfig::default();
        let teams = ids(n);
        init_league_state(&teams, 2025, &cfg).with_schedule(generate_league_schedule(&teams, seed))
    }

    #[test]
    fn test_one_result_per_matchup() {
        let cfg = SimSystemsConfig::default();
        let out = simulate_week(league(8, 3), 1, 3, &cfg).unwrap();
        assert_eq!(out.results.len(), 4);
        assert!(out.results.iter().all(|r| r.winner.is_some()));
        assert_eq!(out.power_rankings.len(), 8);
        assert!(out.awards.is_some());
        assert_eq!(out.league.recorded_decisions(), 8);
    }

    #[test]
    fn test_decisions_track_weeks() {
        let mut cfg = SimSystemsConfig::default();
        cfg.league.sim_mode = SimMode::Aggregate;
        let mut state = league(12, 8);
        for week in 1..=5u16 {
            state = simulate_week(state, week, 8, &cfg).unwrap().league;
            assert_eq!(state.recorded_decisions(), 6 * week as u32 * 2);
        }
    }

    #[test]
    fn test_resimulating_week_errors() {
        let cfg = SimSystemsConfig::default();
        let state = simulate_week(league(4, 1), 1, 1, &cfg).unwrap().league;
        let err = simulate_week(state, 1, 1, &cfg).unwrap_err();
        assert!(matches!(err, SimError::WeekAlreadySimulated { week: 1, .. }));
    }

    #[test]
    fn test_user_score_recorded_as_is() {
        let cfg = SimSystemsConfig::default();
        let state = league(6, 2);
        let schedule = state.schedule.clone().unwrap();
        let m = schedule.week(1).unwrap().matchups[0].clone();
        let user = UserGame {
            home_id: m.away.clone(),
            away_id: m.home.clone(),
            score: Some(UserScore { home: 3, away: 41 }),
        };
        let out = simulate_league_week(
            WeekSimArgs {
                league: state,
                schedule: &schedule,
                week: 1,
                game_type: GameType::Regular,
                seed: 2,
                user_game: Some(user),
                mode: Some(SimMode::Aggregate),
            },
            &cfg,
        )
        .unwrap();
        let r = &out.results[0];
        assert!(r.user_game);
        // caller listed the teams reversed; score follows the teams
        assert_eq!((r.home_score, r.away_score), (41, 3));
        assert_eq!(r.winner.as_deref(), Some(m.home.as_str()));
    }

    #[test]
    fn test_unknown_user_game_ignored() {
        let cfg = SimSystemsConfig::default();
        let state = league(4, 4);
        let schedule = state.schedule.clone().unwrap();
        let out = simulate_league_week(
            WeekSimArgs {
                league: state,
                schedule: &schedule,
                week: 1,
                game_type: GameType::Regular,
                seed: 4,
                user_game: Some(UserGame { home_id: "X".into(), away_id: "Y".into(), score: None }),
                mode: Some(SimMode::Aggregate),
            },
            &cfg,
        )
        .unwrap();
        assert_eq!(out.results.len(), 2);
        assert!(out.results.iter().all(|r| !r.user_game));
    }

    #[test]
    fn test_playoff_week_leaves_standings() {
        let cfg = SimSystemsConfig::default().with_sim_mode(SimMode::Aggregate);
        let state = league(4, 6);
        let schedule = state.schedule.clone().unwrap();
        let regular = simulate_week(state, 1, 6, &cfg).unwrap().league;
        assert_eq!(regular.recorded_decisions(), 4);
        let standings = regular.standings.clone();

        let out = simulate_league_week(
            WeekSimArgs {
                league: regular,
                schedule: &schedule,
                week: 1,
                game_type: GameType::Playoff,
                seed: 6,
                user_game: None,
                mode: None,
            },
            &cfg,
        )
        .unwrap();
        assert_eq!(out.league.recorded_decisions(), 4);
        assert_eq!(out.league.standings, standings);
        assert_eq!(out.results.len(), 2);
        assert_eq!(out.league.results.len(), 4);
        assert!(out.league.is_week_simulated(1, GameType::Playoff));
        assert!(out.awards.is_none());
    }

    #[test]
    fn test_week_is_deterministic() {
        let cfg = SimSystemsConfig::default();
        let a = simulate_week(league(8, 77), 2, 77, &cfg).unwrap();
        let b = simulate_week(league(8, 77), 2, 77, &cfg).unwrap();
        assert_eq!(a.results, b.results);
        assert_eq!(a.league.standings, b.league.standings);
    }

    #[test]
    fn test_aggregate_never_ties() {
        let cfg = SimSystemsConfig::default();
        for seed in 0..300u32 {
            let s = simulate_matchup("A", "B", seed, SimMode::Aggregate, &cfg);
            assert_ne!(s.home_score, s.away_score);
        }
    }

    #[test]
    fn test_full_season_counts() {
        let mut cfg = SimSystemsConfig::default();
        cfg.league.sim_mode = SimMode::Aggregate;
        let state = simulate_regular_season(league(8, 5), 5, &cfg).unwrap();
        for rec in state.standings.values() {
            assert_eq!(rec.games(), 17);
        }
        assert_eq!(state.results.len(), 17 * 4);
    }
}
