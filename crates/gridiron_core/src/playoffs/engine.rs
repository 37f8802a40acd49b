//! Playoff round engine
//!
//! A bracket moves through three calls per round:
//! [`get_playoff_round_games`] lists the current round,
//! [`simulate_cpu_playoff_games_for_round`] fills in results, and
//! [`advance_playoff_round`] eliminates losers and pairs the next round.
//! [`simulate_playoffs`] loops them to a champion.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::bracket::{
    seeds_per_conference, CompletedGame, ConferenceBracket, PlayoffBracket, PlayoffGame,
    PlayoffGameResult, PlayoffRound, SeededTeam, SeedingRule,
};
use super::result::{postseason_record, PostseasonRecord};
use crate::config::{SimMode, SimSystemsConfig};
use crate::error::{Result, SimError};
use crate::league::{simulate_matchup, GameResult, GameType, LeagueState, MatchupScore, UserGame};
use crate::rng::hash_seed;
use crate::seed_parts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffOutcome {
    pub bracket: PlayoffBracket,
    pub champion: String,
    pub postseason: PostseasonRecord,
    /// Every playoff game in play order
    pub games: Vec<GameResult>,
}

// ============================================================================
// Build
// ============================================================================

/// Seed each conference from the standings and pair the first round.
///
/// Pure function of standings, conferences and season.
pub fn build_playoff_bracket(league: &LeagueState, season: u16, cfg: &SimSystemsConfig) -> PlayoffBracket {
    let rule = SeedingRule::default();

    let conferences: Vec<ConferenceBracket> = league
        .conferences
        .iter()
        .filter(|c| !c.teams.is_empty())
        .map(|c| {
            let count = seeds_per_conference(c.teams.len(), cfg);
            let seeds: Vec<SeededTeam> = rule
                .order(league, &c.teams)
                .into_iter()
                .take(count)
                .enumerate()
                .map(|(i, team_id)| SeededTeam { seed: i as u8 + 1, team_id })
                .collect();
            let champion = match seeds.as_slice() {
                [only] => Some(only.team_id.clone()),
                _ => None,
            };
            ConferenceBracket {
                name: c.name.clone(),
                rounds: PlayoffRound::conference_rounds(seeds.len()),
                alive: seeds.clone(),
                seeds,
                games: BTreeMap::new(),
                champion,
            }
        })
        .collect();

    let mut rounds: Vec<PlayoffRound> = conferences
        .iter()
        .map(|c| c.rounds.clone())
        .max_by_key(|r| r.len())
        .unwrap_or_default();
    if conferences.len() > 1 {
        rounds.push(PlayoffRound::Championship);
    }

    // single conference whose lone seed is already its champion
    let champion = match conferences.as_slice() {
        [only] if rounds.is_empty() => only.champion.clone(),
        _ => None,
    };

    let mut bracket = PlayoffBracket {
        season,
        seeding_rule: rule,
        rounds,
        current_round: 0,
        conferences,
        championship: None,
        completed: BTreeMap::new(),
        league_order: rule.order(league, &league.team_ids),
        champion,
    };
    if bracket.champion.is_none() {
        populate_round(&mut bracket);
    }
    bracket
}

fn game_id(season: u16, conference: &str, round: PlayoffRound, index: usize) -> String {
    format!("{season}-{conference}-{}-{index}", round.as_str())
}

/// Create the games of `bracket.current()`. Each round pairs the best
/// remaining seed against the worst; seeds that outnumber a power of two
/// take first-round byes.
fn populate_round(bracket: &mut PlayoffBracket) {
    let Some(round) = bracket.current() else {
        return;
    };
    let season = bracket.season;

    if round == PlayoffRound::Championship {
        let champs: Vec<String> = bracket.conferences.iter().filter_map(|c| c.champion.clone()).collect();
        if let [a, b] = champs.as_slice() {
            let rank = |id: &str| bracket.league_order.iter().position(|t| t == id).unwrap_or(usize::MAX);
            let (home, away) = if rank(a) <= rank(b) { (a, b) } else { (b, a) };
            let seed_of = |id: &str| {
                bracket
                    .conferences
                    .iter()
                    .flat_map(|c| c.seeds.iter())
                    .find(|s| s.team_id == id)
                    .map(|s| s.seed)
            };
            bracket.championship = Some(PlayoffGame {
                game_id: format!("{season}-CHAMPIONSHIP"),
                round,
                conference: None,
                home_id: home.clone(),
                away_id: away.clone(),
                home_seed: seed_of(home),
                away_seed: seed_of(away),
                result: None,
            });
        }
        return;
    }

    for conf in bracket.conferences.iter_mut() {
        if !conf.rounds.contains(&round) || conf.games.contains_key(&round) {
            continue;
        }
        let alive = conf.alive.len();
        let games = alive - alive.next_power_of_two() / 2;
        let playing = &conf.alive[alive - 2 * games..];
        let list: Vec<PlayoffGame> = (0..games)
            .map(|i| {
                let (home, away) = (&playing[i], &playing[playing.len() - 1 - i]);
                PlayoffGame {
                    game_id: game_id(season, &conf.name, round, i),
                    round,
                    conference: Some(conf.name.clone()),
                    home_id: home.team_id.clone(),
                    away_id: away.team_id.clone(),
                    home_seed: Some(home.seed),
                    away_seed: Some(away.seed),
                    result: None,
                }
            })
            .collect();
        conf.games.insert(round, list);
    }
}

// ============================================================================
// Round play
// ============================================================================

/// Games of the current round, conference order then index.
pub fn get_playoff_round_games(bracket: &PlayoffBracket) -> Vec<&PlayoffGame> {
    let Some(round) = bracket.current() else {
        return Vec::new();
    };
    let mut games: Vec<&PlayoffGame> = bracket
        .conferences
        .iter()
        .filter_map(|c| c.games.get(&round))
        .flat_map(|list| list.iter())
        .collect();
    if round == PlayoffRound::Championship {
        games.extend(bracket.championship.iter());
    }
    games
}

fn round_games_mut(bracket: &mut PlayoffBracket, round: PlayoffRound) -> Vec<&mut PlayoffGame> {
    let mut games: Vec<&mut PlayoffGame> = bracket
        .conferences
        .iter_mut()
        .filter_map(|c| c.games.get_mut(&round))
        .flat_map(|list| list.iter_mut())
        .collect();
    if round == PlayoffRound::Championship {
        games.extend(bracket.championship.iter_mut());
    }
    games
}

/// Stream seed of one playoff game.
pub fn playoff_game_seed(seed: u32, season: u16, game: &PlayoffGame) -> u32 {
    hash_seed(&seed_parts![seed, season, "playoff", &game.game_id, &game.home_id, &game.away_id])
}

/// Play every unplayed game of the current round.
///
/// A user game with a decisive score is recorded as given; a tied user
/// score cannot stand in an elimination game and is simulated instead.
pub fn simulate_cpu_playoff_games_for_round(
    mut bracket: PlayoffBracket,
    seed: u32,
    user_game: Option<UserGame>,
    cfg: &SimSystemsConfig,
) -> PlayoffBracket {
    let Some(round) = bracket.current() else {
        return bracket;
    };
    let season = bracket.season;
    let mode = cfg.league.sim_mode;

    let pending: Vec<PlayoffGame> = get_playoff_round_games(&bracket)
        .into_iter()
        .filter(|g| !g.is_complete())
        .cloned()
        .collect();

    let user = user_game.as_ref();
    let user_id = user.and_then(|u| pending.iter().find(|g| same_teams(g, &u.home_id, &u.away_id)).map(|g| g.game_id.clone()));
    if let (Some(u), None) = (user, &user_id) {
        warn!("user game {} at {} is not in the {} round; ignoring", u.away_id, u.home_id, round.as_str());
    }

    let results: Vec<(String, PlayoffGameResult)> = pending
        .par_iter()
        .map(|game| {
            let is_user = user_id.as_deref() == Some(game.game_id.as_str());
            let recorded = if is_user { user.and_then(|u| oriented_user_score(game, u)) } else { None };
            let score = match recorded {
                Some(score) => score,
                None => {
                    let mode = if is_user { SimMode::PlayByPlay } else { mode };
                    simulate_matchup(&game.home_id, &game.away_id, playoff_game_seed(seed, season, game), mode, cfg)
                }
            };
            (game.game_id.clone(), to_playoff_result(game, &score, is_user))
        })
        .collect();

    for game in round_games_mut(&mut bracket, round) {
        if let Some((_, result)) = results.iter().find(|(id, _)| *id == game.game_id) {
            debug!(
                "{} {} {}-{} {} (winner {})",
                game.game_id, game.home_id, result.home_score, result.away_score, game.away_id, result.winner
            );
            game.result = Some(result.clone());
        }
    }
    for game in get_playoff_round_games(&bracket).into_iter().cloned().collect::<Vec<_>>() {
        if let Some(result) = &game.result {
            bracket.completed.entry(game.game_id.clone()).or_insert_with(|| CompletedGame {
                round: game.round,
                home_id: game.home_id.clone(),
                away_id: game.away_id.clone(),
                home_score: result.home_score,
                away_score: result.away_score,
                winner: result.winner.clone(),
            });
        }
    }
    bracket
}

fn same_teams(game: &PlayoffGame, a: &str, b: &str) -> bool {
    (game.home_id == a && game.away_id == b) || (game.home_id == b && game.away_id == a)
}

fn oriented_user_score(game: &PlayoffGame, user: &UserGame) -> Option<MatchupScore> {
    let score = user.score?;
    if score.home == score.away {
        warn!("tied user score for playoff game {}; simulating instead", game.game_id);
        return None;
    }
    let (home_score, away_score) =
        if user.home_id == game.home_id { (score.home, score.away) } else { (score.away, score.home) };
    Some(MatchupScore { home_score, away_score, overtime: false, box_score: None })
}

/// Matchup scores never tie; a tie that slips through goes to the higher seed.
fn to_playoff_result(game: &PlayoffGame, score: &MatchupScore, user_game: bool) -> PlayoffGameResult {
    let winner = if score.away_score > score.home_score { &game.away_id } else { &game.home_id };
    PlayoffGameResult {
        home_score: score.home_score,
        away_score: score.away_score,
        winner: winner.clone(),
        overtime: score.overtime,
        user_game,
    }
}

/// Eliminate the current round's losers and pair the next round.
pub fn advance_playoff_round(mut bracket: PlayoffBracket) -> Result<PlayoffBracket> {
    if bracket.is_complete() {
        return Err(SimError::BracketComplete);
    }
    let Some(round) = bracket.current() else {
        return Err(SimError::BracketComplete);
    };
    let games = get_playoff_round_games(&bracket);
    let pending = games.iter().filter(|g| !g.is_complete()).count();
    if pending > 0 {
        return Err(SimError::RoundIncomplete { round: round.as_str().to_string(), pending });
    }
    let losers: Vec<String> = games.iter().filter_map(|g| g.loser()).map(str::to_string).collect();

    for conf in bracket.conferences.iter_mut() {
        if !conf.games.contains_key(&round) {
            continue;
        }
        conf.alive.retain(|s| !losers.contains(&s.team_id));
        if conf.rounds.last() == Some(&round) {
            conf.champion = conf.alive.first().map(|s| s.team_id.clone());
        }
    }

    let is_last = bracket.current_round + 1 == bracket.rounds.len();
    if round == PlayoffRound::Championship {
        bracket.champion = bracket.championship.as_ref().and_then(|g| g.result.as_ref()).map(|r| r.winner.clone());
    } else if is_last && bracket.conferences.len() == 1 {
        bracket.champion = bracket.conferences[0].champion.clone();
    }

    bracket.current_round += 1;
    if bracket.champion.is_none() {
        populate_round(&mut bracket);
    }
    Ok(bracket)
}

// ============================================================================
// Driver
// ============================================================================

fn to_game_result(bracket: &PlayoffBracket, game: &PlayoffGame) -> Option<GameResult> {
    let result = game.result.as_ref()?;
    let week = bracket.rounds.iter().position(|r| *r == game.round).map_or(0, |i| i as u16 + 1);
    Some(GameResult {
        game_id: game.game_id.clone(),
        season: bracket.season,
        week,
        game_type: GameType::Playoff,
        home_id: game.home_id.clone(),
        away_id: game.away_id.clone(),
        home_score: result.home_score,
        away_score: result.away_score,
        winner: Some(result.winner.clone()),
        user_game: result.user_game,
        overtime: result.overtime,
        box_score: None,
    })
}

/// Build, play and advance every round until a champion is crowned.
pub fn simulate_playoffs(
    league: &LeagueState,
    season: u16,
    seed: u32,
    cfg: &SimSystemsConfig,
) -> Result<PlayoffOutcome> {
    if league.team_ids.is_empty() {
        return Err(SimError::EmptyLeague);
    }
    let mut bracket = build_playoff_bracket(league, season, cfg);
    while !bracket.is_complete() {
        let Some(round) = bracket.current() else {
            break;
        };
        bracket = simulate_cpu_playoff_games_for_round(bracket, seed, None, cfg);
        debug!("season {season} {}: {} games", round.as_str(), get_playoff_round_games(&bracket).len());
        bracket = advance_playoff_round(bracket)?;
    }
    let champion = bracket.champion.clone().ok_or(SimError::EmptyLeague)?;
    info!("season {season} champion: {champion}");

    let postseason = postseason_record(&bracket, &league.team_ids);
    let games = bracket.all_games().into_iter().filter_map(|g| to_game_result(&bracket, g)).collect();
    Ok(PlayoffOutcome { bracket, champion, postseason, games })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{generate_league_schedule, init_league_state, simulate_regular_season, UserScore};

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("T{i:02}")).collect()
    }

    fn aggregate_cfg() -> SimSystemsConfig {
        let mut cfg = SimSystemsConfig::default();
        cfg.league.sim_mode = SimMode::Aggregate;
        cfg
    }

    fn played_league(n: usize, seed: u32, cfg: &SimSystemsConfig) -> LeagueState {
        let teams = ids(n);
        let league = init_league_state(&teams, 2025, cfg).with_schedule(generate_league_schedule(&teams, seed));
        simulate_regular_season(league, seed, cfg).unwrap()
    }

    #[test]
    fn test_bracket_shape_sixteen_per_conference() {
        let cfg = aggregate_cfg();
        let league = played_league(32, 11, &cfg);
        let bracket = build_playoff_bracket(&league, 2025, &cfg);
        assert_eq!(bracket.conferences.len(), 2);
        assert_eq!(
            bracket.rounds,
            vec![
                PlayoffRound::WildCard,
                PlayoffRound::Divisional,
                PlayoffRound::Conference,
                PlayoffRound::Championship
            ]
        );
        for conf in &bracket.conferences {
            assert_eq!(conf.seeds.len(), 7);
            assert_eq!(conf.byes(), 1);
            let wild_card = &conf.games[&PlayoffRound::WildCard];
            assert_eq!(wild_card.len(), 3);
            // 2 hosts 7, 3 hosts 6, 4 hosts 5
            let pairs: Vec<(Option<u8>, Option<u8>)> = wild_card.iter().map(|g| (g.home_seed, g.away_seed)).collect();
            assert_eq!(pairs, vec![(Some(2), Some(7)), (Some(3), Some(6)), (Some(4), Some(5))]);
        }
        assert_eq!(get_playoff_round_games(&bracket).len(), 6);
    }

    #[test]
    fn test_game_id_format() {
        let cfg = aggregate_cfg();
        let league = played_league(8, 3, &cfg);
        let outcome = simulate_playoffs(&league, 2025, 3, &cfg).unwrap();
        let first = &outcome.games[0];
        assert!(first.game_id.starts_with("2025-"), "{}", first.game_id);
        assert!(first.game_id.contains("-divisional-0") || first.game_id.contains("-conference-0"));
        assert_eq!(outcome.games.last().map(|g| g.game_id.as_str()), Some("2025-CHAMPIONSHIP"));
    }

    #[test]
    fn test_exactly_one_champion() {
        let cfg = aggregate_cfg();
        for n in [2usize, 3, 5, 8, 12, 32] {
            let league = played_league(n, n as u32, &cfg);
            let outcome = simulate_playoffs(&league, 2025, 9, &cfg).unwrap();
            let champs: Vec<&str> = outcome.postseason.champions().collect();
            assert_eq!(champs, vec![outcome.champion.as_str()], "{n} teams");
            assert_eq!(outcome.postseason.results.len(), n);
            let champ = &outcome.postseason.results[&outcome.champion];
            assert!(champ.made_playoffs && champ.eliminated_in.is_none());
            // every other qualifier lost exactly once
            let eliminated = outcome.postseason.results.values().filter(|r| r.eliminated_in.is_some()).count();
            assert_eq!(eliminated + 1, outcome.postseason.qualifiers());
        }
    }

    #[test]
    fn test_playoffs_deterministic() {
        let cfg = SimSystemsConfig::default();
        let league = played_league(8, 21, &aggregate_cfg());
        let a = simulate_playoffs(&league, 2025, 21, &cfg).unwrap();
        let b = simulate_playoffs(&league, 2025, 21, &cfg).unwrap();
        assert_eq!(a.champion, b.champion);
        assert_eq!(a.postseason, b.postseason);
        assert_eq!(serde_json::to_string(&a.bracket).unwrap(), serde_json::to_string(&b.bracket).unwrap());
    }

    #[test]
    fn test_advance_errors() {
        let cfg = aggregate_cfg();
        let league = played_league(8, 4, &cfg);
        let bracket = build_playoff_bracket(&league, 2025, &cfg);
        let pending = get_playoff_round_games(&bracket).len();
        match advance_playoff_round(bracket.clone()) {
            Err(SimError::RoundIncomplete { pending: p, .. }) => assert_eq!(p, pending),
            other => panic!("expected RoundIncomplete, got {other:?}"),
        }

        let mut bracket = bracket;
        while !bracket.is_complete() {
            bracket = simulate_cpu_playoff_games_for_round(bracket, 4, None, &cfg);
            bracket = advance_playoff_round(bracket).unwrap();
        }
        assert!(matches!(advance_playoff_round(bracket), Err(SimError::BracketComplete)));
    }

    #[test]
    fn test_user_score_recorded_and_tie_simulated() {
        let cfg = aggregate_cfg();
        let league = played_league(8, 6, &cfg);
        let bracket = build_playoff_bracket(&league, 2025, &cfg);
        let game = get_playoff_round_games(&bracket)[0].clone();

        let user = UserGame {
            home_id: game.home_id.clone(),
            away_id: game.away_id.clone(),
            score: Some(UserScore { home: 10, away: 13 }),
        };
        let played = simulate_cpu_playoff_games_for_round(bracket.clone(), 6, Some(user), &cfg);
        let result = played.completed[&game.game_id].clone();
        assert_eq!((result.home_score, result.away_score), (10, 13));
        assert_eq!(result.winner, game.away_id);

        let tied = UserGame {
            home_id: game.home_id.clone(),
            away_id: game.away_id.clone(),
            score: Some(UserScore { home: 20, away: 20 }),
        };
        let played = simulate_cpu_playoff_games_for_round(bracket, 6, Some(tied), &cfg);
        let result = &played.completed[&game.game_id];
        assert_ne!(result.home_score, result.away_score);
    }

    #[test]
    fn test_single_team_league_is_decided_at_build() {
        let cfg = aggregate_cfg();
        let league = init_league_state(&ids(1), 2025, &cfg);
        let bracket = build_playoff_bracket(&league, 2025, &cfg);
        assert_eq!(bracket.champion.as_deref(), Some("T00"));
        let outcome = simulate_playoffs(&league, 2025, 1, &cfg).unwrap();
        assert_eq!(outcome.champion, "T00");
        assert!(outcome.games.is_empty());
    }

    #[test]
    fn test_empty_league_errors() {
        let cfg = SimSystemsConfig::default();
        let league = init_league_state(&[], 2025, &cfg);
        assert!(matches!(simulate_playoffs(&league, 2025, 1, &cfg), Err(SimError::EmptyLeague)));
    }
}
