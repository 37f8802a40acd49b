//! Play engine
//!
//! `step_play` resolves exactly one play:
//! 1. call resolution (valid call → opening script → auto-pick)
//! 2. late-half timeout, tempo runoff
//! 3. penalty check (runs and passes)
//! 4. the physics resolvers the concept needs
//! 5. field position, scoring, downs
//! 6. clock (two-minute warning, quarter and half ends, overtime)
//!
//! Every call appends one drive-log entry. The per-play stream is
//! `rng(seed, "play:{n}")`, so a game is a pure function of its params and
//! the sequence of calls.

use log::{debug, warn};

use super::clock::{choose_tempo, live_ball, pre_snap_runoff, tick, ClockTick, Tempo};
use super::fourth_down::{recommend_fourth_down, FourthDownDecision};
use super::play_call::{
    is_valid_call, scripted_call, CallSource, DefensiveFocus, OffensiveFocus, Personnel, PlayCall,
    PlayConcept, MAX_FIELD_GOAL_DISTANCE,
};
use super::state::{
    conditions_for_seed, DriveLogEntry, GameClock, GamePhase, GameSimParams, GameSimState, GameSummary,
    KickDuelState, OutcomeTag, OvertimeRule, PlayExplanation, PlayResult, PlayType, Sides,
    StepOutcome, TeamBox, TeamSide,
};
use crate::config::SimSystemsConfig;
use crate::physics::{
    ballistics, contact, fumble, kick, pass_rush, pile, BallisticsInput, ContactInput, ContactKind,
    FieldGoalInput, FumbleInput, FumbleOutcome, KickoffInput, PassRushInput, PileInput, PuntInput,
    PUNT_TOUCHBACK_SPOT,
};
use crate::ratings::{rating_z, TeamRatings};
use crate::rng::{rng, DetRng};

/// Hard stop for `simulate_game`.
pub const MAX_PLAYS_PER_GAME: u32 = 6_000;

/// Extra point: snapped from the 15, kicked from the 23.
const EXTRA_POINT_DISTANCE: f64 = 33.0;
const KICK_DUEL_BASE_DISTANCE: f64 = 35.0;
const KICK_DUEL_STEP: f64 = 5.0;
const SAFETY_FREE_KICK_SPOT: f64 = 20.0;

// ============================================================================
// Init
// ============================================================================

/// Q1 15:00, clock stopped, opening kickoff pending.
///
/// The coin toss is the first draw of `rng(seed, "coin-toss")`; its winner
/// receives.
pub fn init_game_sim(params: GameSimParams, cfg: &SimSystemsConfig) -> GameSimState {
    let GameSimParams {
        home_id,
        away_id,
        seed,
        home_plan,
        away_plan,
        home_ratings,
        away_ratings,
        conditions,
        overtime,
    } = params;

    let mut toss = rng(seed as i64, Some("coin-toss"));
    let opening_receiver = if toss.next_f64() < 0.5 { TeamSide::Home } else { TeamSide::Away };

    let ratings = Sides::new(
        home_ratings.unwrap_or_else(|| TeamRatings::for_team(&home_id)),
        away_ratings.unwrap_or_else(|| TeamRatings::for_team(&away_id)),
    );
    let timeouts = cfg.clock.timeouts_per_half;

    GameSimState {
        seed,
        team_ids: Sides::new(home_id, away_id),
        ratings,
        plans: Sides::new(home_plan, away_plan),
        conditions: conditions.unwrap_or_else(|| conditions_for_seed(seed)),
        overtime,
        phase: GamePhase::Kickoff,
        clock: GameClock::new(cfg.clock.quarter_seconds),
        score: Sides::default(),
        timeouts: Sides::new(timeouts, timeouts),
        possession: opening_receiver.other(),
        down: 1,
        distance: 10,
        ball_on: 25,
        free_kick: false,
        opening_receiver,
        drive: 0,
        play_in_drive: 0,
        drives_started: Sides::default(),
        plays: 0,
        kick_duel: None,
        box_score: Sides::new(TeamBox::default(), TeamBox::default()),
        log: Vec::new(),
    }
}

// ============================================================================
// Step
// ============================================================================

/// Pre-snap situation copied into the log entry.
struct Snap {
    drive: u16,
    quarter: u8,
    clock_seconds: u16,
    offense: String,
    down: u8,
    distance: u8,
}

/// Play under construction.
struct PlayDraft {
    play_type: PlayType,
    concept: Option<PlayConcept>,
    personnel: Personnel,
    yards: i32,
    parts: Vec<String>,
    tags: Vec<OutcomeTag>,
    primary: String,
    secondary: String,
    coaching_note: Option<String>,
}

impl PlayDraft {
    fn new(play_type: PlayType, concept: Option<PlayConcept>, personnel: Personnel) -> Self {
        Self {
            play_type,
            concept,
            personnel,
            yards: 0,
            parts: Vec::new(),
            tags: Vec::new(),
            primary: String::new(),
            secondary: String::new(),
            coaching_note: None,
        }
    }

    fn say(&mut self, text: impl Into<String>) {
        self.parts.push(text.into());
    }

    fn tag(&mut self, tag: OutcomeTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    fn explain(&mut self, primary: impl Into<String>, secondary: impl Into<String>) {
        self.primary = primary.into();
        self.secondary = secondary.into();
    }
}

/// Resolve one play. A final state comes back untouched with no result.
pub fn step_play(state: GameSimState, call: PlayCall, cfg: &SimSystemsConfig) -> StepOutcome {
    let mut s = state;
    let play_id = s.plays + 1;
    let mut r = rng(s.seed as i64, Some(format!("play:{play_id}").as_str()));
    let snap = Snap {
        drive: s.drive,
        quarter: s.clock.quarter,
        clock_seconds: s.clock.seconds_remaining,
        offense: s.team_id(s.possession).to_string(),
        down: s.down,
        distance: s.distance,
    };

    let draft = match s.phase {
        GamePhase::Kickoff => kickoff_play(&mut s, cfg, &mut r),
        GamePhase::Scrimmage => scrimmage_play(&mut s, call, cfg, &mut r),
        GamePhase::KickDuel => duel_kick(&mut s, cfg, &mut r),
        GamePhase::Final => return StepOutcome { state: s, result: None },
    };
    s.plays = play_id;

    let result = record(&mut s, play_id, snap, draft);
    StepOutcome { state: s, result: Some(result) }
}

fn record(s: &mut GameSimState, play_id: u32, snap: Snap, draft: PlayDraft) -> PlayResult {
    let text = draft.parts.join(", ");
    s.log.push(DriveLogEntry {
        play_id,
        drive: snap.drive,
        quarter: snap.quarter,
        clock_seconds: snap.clock_seconds,
        offense: snap.offense,
        play_type: draft.play_type,
        personnel: draft.personnel,
        down: snap.down,
        distance: snap.distance,
        yards: draft.yards,
        result: text.clone(),
        tags: draft.tags.clone(),
    });
    PlayResult {
        play_id,
        play_type: draft.play_type,
        concept: draft.concept,
        personnel: draft.personnel,
        yards: draft.yards,
        text,
        tags: draft.tags,
        explanation: PlayExplanation {
            primary: draft.primary,
            secondary: draft.secondary,
            coaching_note: draft.coaching_note,
        },
    }
}

/// Run the game to the end with auto-picked calls.
pub fn simulate_game(params: GameSimParams, cfg: &SimSystemsConfig) -> GameSummary {
    let mut state = init_game_sim(params, cfg);
    while !state.is_final() {
        if state.plays >= MAX_PLAYS_PER_GAME {
            warn!(
                "{} vs {} reached {} plays, ending the game",
                state.team_ids.home, state.team_ids.away, MAX_PLAYS_PER_GAME
            );
            state.phase = GamePhase::Final;
            break;
        }
        state = step_play(state, PlayCall::Auto, cfg).state;
    }
    debug!(
        "{} {} - {} {} ({} plays, {} - {} yds, {})",
        state.team_ids.home,
        state.score.home,
        state.score.away,
        state.team_ids.away,
        state.plays,
        state.box_score.home.total_yards(),
        state.box_score.away.total_yards(),
        state.clock.display()
    );
    GameSummary::from_state(state)
}

// ============================================================================
// Possession helpers
// ============================================================================

fn start_drive(s: &mut GameSimState, side: TeamSide, ball_on: i32) {
    let ball_on = ball_on.clamp(1, 99) as u8;
    s.phase = GamePhase::Scrimmage;
    s.possession = side;
    s.ball_on = ball_on;
    s.down = 1;
    s.distance = 10.min(100 - ball_on);
    s.drive += 1;
    s.play_in_drive = 0;
    *s.drives_started.get_mut(side) += 1;
    s.free_kick = false;
}

fn set_kickoff(s: &mut GameSimState, kicker: TeamSide, free_kick: bool) {
    s.phase = GamePhase::Kickoff;
    s.possession = kicker;
    s.free_kick = free_kick;
    s.down = 1;
    s.distance = 10;
}

fn score_touchdown(
    s: &mut GameSimState,
    side: TeamSide,
    cfg: &SimSystemsConfig,
    r: &mut DetRng,
    draft: &mut PlayDraft,
) {
    *s.score.get_mut(side) += 6;
    s.box_score.get_mut(side).touchdowns += 1;
    s.clock.running = false;
    draft.tag(OutcomeTag::Touchdown);
    draft.say(format!("touchdown {}", s.team_id(side)));

    if s.clock.is_overtime() {
        s.phase = GamePhase::Final;
        return;
    }

    let kicker = s.ratings.get(side);
    let pat = kick::resolve_field_goal(
        &FieldGoalInput {
            accuracy: kicker.kicker_accuracy,
            power: kicker.kicker_power,
            distance_yards: EXTRA_POINT_DISTANCE,
            conditions: s.conditions,
            pressure: false,
        },
        &cfg.physics.kick,
        r,
    );
    if pat.made {
        *s.score.get_mut(side) += 1;
        draft.tag(OutcomeTag::ExtraPoint);
        draft.say("extra point good");
    } else {
        draft.say("extra point no good");
    }
    set_kickoff(s, side, false);
}

fn score_field_goal(s: &mut GameSimState, side: TeamSide, distance: f64, draft: &mut PlayDraft) {
    *s.score.get_mut(side) += 3;
    s.box_score.get_mut(side).field_goals += 1;
    s.clock.running = false;
    draft.tag(OutcomeTag::FieldGoal);
    draft.say(format!("{}-yard field goal is good", distance.round() as i32));
    if s.clock.is_overtime() {
        s.phase = GamePhase::Final;
    } else {
        set_kickoff(s, side, false);
    }
}

/// `conceding` was tackled in its own end zone.
fn score_safety(s: &mut GameSimState, conceding: TeamSide, draft: &mut PlayDraft) {
    *s.score.get_mut(conceding.other()) += 2;
    s.clock.running = false;
    draft.tag(OutcomeTag::Safety);
    draft.say(format!("safety, 2 points {}", s.team_id(conceding.other())));
    if s.clock.is_overtime() {
        s.phase = GamePhase::Final;
    } else {
        set_kickoff(s, conceding, true);
    }
}

/// Move the ball `yards` for the offense and settle scoring and downs.
fn advance_ball(
    s: &mut GameSimState,
    yards: i32,
    cfg: &SimSystemsConfig,
    r: &mut DetRng,
    draft: &mut PlayDraft,
) {
    let offense = s.offense();
    let spot = s.ball_on as i32 + yards;
    if spot >= 100 {
        score_touchdown(s, offense, cfg, r, draft);
        return;
    }
    if spot <= 0 {
        score_safety(s, offense, draft);
        return;
    }

    s.ball_on = spot as u8;
    if yards >= s.distance as i32 {
        s.down = 1;
        s.distance = 10.min(100 - s.ball_on);
        s.box_score.get_mut(offense).first_downs += 1;
        draft.tag(OutcomeTag::FirstDown);
        draft.say("1st down");
    } else if s.down >= 4 {
        s.clock.running = false;
        draft.tag(OutcomeTag::TurnoverOnDowns);
        draft.say("turnover on downs");
        start_drive(s, offense.other(), 100 - spot);
    } else {
        s.down += 1;
        s.distance = (s.distance as i32 - yards).clamp(1, 99) as u8;
    }
}

/// Loose ball after a `yards` gain.
fn settle_fumble(
    s: &mut GameSimState,
    yards: i32,
    f: &FumbleOutcome,
    cfg: &SimSystemsConfig,
    r: &mut DetRng,
    draft: &mut PlayDraft,
) {
    let offense = s.offense();
    let defense = s.defense();
    draft.tag(OutcomeTag::Fumble);
    s.clock.running = false;
    let spot = s.ball_on as i32 + yards + f.bounce_yards;

    if !f.lost {
        draft.say(format!(
            "fumble{}, recovered by {}",
            if f.weird_bounce { " takes a wild bounce" } else { "" },
            s.team_id(offense)
        ));
        advance_ball(s, yards + f.bounce_yards, cfg, r, draft);
        return;
    }

    s.box_score.get_mut(offense).turnovers += 1;
    draft.tag(OutcomeTag::FumbleLost);
    draft.say(format!("fumble, recovered by {}", s.team_id(defense)));
    if spot >= 100 {
        draft.tag(OutcomeTag::Touchback);
        draft.say("touchback");
        start_drive(s, defense, PUNT_TOUCHBACK_SPOT);
    } else if spot <= 0 {
        score_touchdown(s, defense, cfg, r, draft);
    } else {
        start_drive(s, defense, 100 - spot);
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Live-ball time of the play just resolved.
fn run_clock(s: &mut GameSimState, elapsed: u16, cfg: &SimSystemsConfig, draft: &mut PlayDraft) {
    if matches!(s.phase, GamePhase::Final | GamePhase::KickDuel) {
        return;
    }
    let t = live_ball(&mut s.clock, elapsed, &cfg.clock);
    clock_events(s, t, cfg, draft);
}

/// Huddle time before the snap; only a running clock loses it.
fn run_off(s: &mut GameSimState, seconds: u16, cfg: &SimSystemsConfig, draft: &mut PlayDraft) {
    if matches!(s.phase, GamePhase::Final | GamePhase::KickDuel) {
        return;
    }
    let t = tick(&mut s.clock, seconds, &cfg.clock);
    clock_events(s, t, cfg, draft);
}

fn clock_events(s: &mut GameSimState, t: ClockTick, cfg: &SimSystemsConfig, draft: &mut PlayDraft) {
    if t.two_minute_warning {
        draft.tag(OutcomeTag::TwoMinuteWarning);
        draft.say("two-minute warning");
    }
    if t.expired {
        end_quarter(s, cfg, draft);
    }
}

fn end_quarter(s: &mut GameSimState, cfg: &SimSystemsConfig, draft: &mut PlayDraft) {
    s.clock.running = false;
    match s.clock.quarter {
        1 | 3 => {
            draft.say(format!("end of quarter {}", s.clock.quarter));
            s.clock.quarter += 1;
            s.clock.seconds_remaining = cfg.clock.quarter_seconds;
        }
        2 => {
            draft.tag(OutcomeTag::EndOfHalf);
            draft.say("end of half");
            s.clock.quarter = 3;
            s.clock.seconds_remaining = cfg.clock.quarter_seconds;
            s.timeouts = Sides::new(cfg.clock.timeouts_per_half, cfg.clock.timeouts_per_half);
            let kicker = s.opening_receiver;
            set_kickoff(s, kicker, false);
        }
        4 if s.leader().is_none() && s.overtime == OvertimeRule::SuddenDeath => {
            draft.say("end of regulation, overtime");
            s.clock.quarter = 5;
            s.clock.seconds_remaining = cfg.clock.overtime_seconds;
            s.timeouts = Sides::new(cfg.clock.timeouts_per_half, cfg.clock.timeouts_per_half);
            let mut toss = rng(s.seed as i64, Some("overtime-toss"));
            let receiver = if toss.next_f64() < 0.5 { TeamSide::Home } else { TeamSide::Away };
            set_kickoff(s, receiver.other(), false);
        }
        q if q >= 5 && s.leader().is_none() => {
            draft.say("end of overtime, kick duel");
            let mut toss = rng(s.seed as i64, Some("kick-duel"));
            let first = if toss.next_f64() < 0.5 { TeamSide::Home } else { TeamSide::Away };
            s.kick_duel = Some(KickDuelState { round: 1, first_kicker: first, first_made: None });
            s.possession = first;
            s.phase = GamePhase::KickDuel;
        }
        _ => {
            draft.say("final");
            s.phase = GamePhase::Final;
        }
    }
}

// ============================================================================
// Kickoff / kick duel
// ============================================================================

fn kickoff_play(s: &mut GameSimState, cfg: &SimSystemsConfig, r: &mut DetRng) -> PlayDraft {
    let kicker = s.possession;
    let receiver = kicker.other();
    let mut draft = PlayDraft::new(PlayType::Kickoff, None, Personnel::SpecialTeams);

    let k = s.ratings.get(kicker);
    let ret = s.ratings.get(receiver);
    let input = KickoffInput {
        from_yard_line: if s.free_kick { SAFETY_FREE_KICK_SPOT } else { cfg.physics.kick.kickoff_spot },
        power: k.kicker_power,
        returner: ret.returner,
        coverage: k.lb_tackling,
        conditions: s.conditions,
    };
    let out = kick::resolve_kickoff(&input, &cfg.physics.kick, r);
    let verb = if s.free_kick { "free kick" } else { "kickoff" };
    draft.yards = out.return_yards;
    draft.explain("kicker power", "return coverage");

    let elapsed = if out.touchback {
        draft.tag(OutcomeTag::Touchback);
        draft.say(format!("{} {verb}, touchback", s.team_id(kicker)));
        start_drive(s, receiver, out.receiving_spot);
        0
    } else if out.receiving_spot >= 100 {
        draft.say(format!("{verb} returned {} yds", out.return_yards));
        draft.explain("returner", "coverage lane broke down");
        s.possession = receiver;
        score_touchdown(s, receiver, cfg, r, &mut draft);
        cfg.clock.kickoff_duration
    } else {
        draft.say(format!(
            "{verb} returned {} yds to the {}",
            out.return_yards, out.receiving_spot
        ));
        start_drive(s, receiver, out.receiving_spot);
        cfg.clock.kickoff_duration
    };

    s.clock.running = false;
    run_clock(s, elapsed, cfg, &mut draft);
    draft
}

fn duel_kick(s: &mut GameSimState, cfg: &SimSystemsConfig, r: &mut DetRng) -> PlayDraft {
    let mut draft = PlayDraft::new(
        PlayType::FieldGoal,
        Some(PlayConcept::FieldGoal),
        Personnel::SpecialTeams,
    );
    let Some(mut duel) = s.kick_duel.clone() else {
        s.phase = GamePhase::Final;
        return draft;
    };

    let kicker = s.possession;
    let distance = KICK_DUEL_BASE_DISTANCE + KICK_DUEL_STEP * (duel.round.saturating_sub(1)) as f64;
    let k = s.ratings.get(kicker);
    let out = kick::resolve_field_goal(
        &FieldGoalInput {
            accuracy: k.kicker_accuracy,
            power: k.kicker_power,
            distance_yards: distance,
            conditions: s.conditions,
            pressure: true,
        },
        &cfg.physics.kick,
        r,
    );
    draft.explain("kicker accuracy", "duel pressure");
    draft.say(format!(
        "kick duel round {}: {} {}-yard field goal {}",
        duel.round,
        s.team_id(kicker),
        distance as i32,
        match (out.made, out.miss) {
            (true, _) => "is good".to_string(),
            (false, Some(dir)) => format!("is no good, {}", dir.describe()),
            (false, None) => "is blocked".to_string(),
        }
    ));
    if out.made {
        draft.tag(OutcomeTag::FieldGoal);
    }

    match duel.first_made {
        None => {
            duel.first_made = Some(out.made);
            s.possession = kicker.other();
        }
        Some(first_made) => {
            let winner = if first_made != out.made {
                Some(if first_made { kicker.other() } else { kicker })
            } else if duel.round >= cfg.clock.max_kick_duel_rounds {
                let side = if r.next_f64() < 0.5 { TeamSide::Home } else { TeamSide::Away };
                draft.say("kick duel capped, decided by coin toss");
                Some(side)
            } else {
                None
            };
            match winner {
                Some(side) => {
                    *s.score.get_mut(side) += 3;
                    draft.say(format!("{} wins the kick duel", s.team_id(side)));
                    s.phase = GamePhase::Final;
                }
                None => {
                    duel.round += 1;
                    duel.first_made = None;
                    s.possession = duel.first_kicker;
                }
            }
        }
    }
    s.kick_duel = Some(duel);
    draft
}

// ============================================================================
// Scrimmage
// ============================================================================

fn play_type_for(concept: PlayConcept) -> PlayType {
    match concept {
        PlayConcept::Punt => PlayType::Punt,
        PlayConcept::FieldGoal => PlayType::FieldGoal,
        PlayConcept::Kneel => PlayType::Kneel,
        c if c.is_pass() => PlayType::Pass,
        _ => PlayType::Run,
    }
}

fn scrimmage_play(
    s: &mut GameSimState,
    call: PlayCall,
    cfg: &SimSystemsConfig,
    r: &mut DetRng,
) -> PlayDraft {
    let offense = s.offense();
    let call_roll = r.next_f64();
    let variant_roll = r.next_f64();

    let (concept, personnel, source) = choose_play(s, call, call_roll, variant_roll, cfg);
    let mut draft = PlayDraft::new(play_type_for(concept), Some(concept), personnel);
    match source {
        CallSource::Fallback => {
            draft.coaching_note = Some("called play was not legal here; auto-pick used".to_string());
        }
        CallSource::Scripted => {
            draft.coaching_note = Some(format!("scripted play {}", s.play_in_drive + 1));
        }
        CallSource::Auto if s.down == 4 && (concept.is_run() || concept.is_pass()) => {
            draft.coaching_note = Some(format!("went for it on 4th and {}", s.distance));
        }
        _ => {}
    }

    // Trailing offense stops a running clock late in a half.
    let late = matches!(s.clock.quarter, 2 | 4) && s.clock.seconds_remaining <= cfg.clock.two_minute_threshold;
    if s.clock.running
        && late
        && s.margin(offense) < 0
        && *s.timeouts.get(offense) > 0
        && concept != PlayConcept::Kneel
    {
        *s.timeouts.get_mut(offense) -= 1;
        s.clock.running = false;
        draft.tag(OutcomeTag::Timeout);
        draft.say(format!(
            "timeout {} ({} left)",
            s.team_id(offense),
            s.timeouts.get(offense)
        ));
    }

    let tempo = choose_tempo(&s.clock, s.margin(offense));
    let runoff = pre_snap_runoff(&s.clock, tempo, &cfg.clock);
    run_off(s, runoff, cfg, &mut draft);

    s.play_in_drive += 1;
    s.box_score.get_mut(offense).plays += 1;

    let elapsed = match concept {
        PlayConcept::Kneel => kneel_play(s, cfg, r, &mut draft),
        PlayConcept::Punt => punt_play(s, cfg, r, &mut draft),
        PlayConcept::FieldGoal => field_goal_play(s, cfg, r, &mut draft),
        c => match penalty_check(s, cfg, r, &mut draft) {
            Some(elapsed) => elapsed,
            None if c.is_pass() => pass_play(s, c, cfg, r, &mut draft),
            None => run_play(s, c, personnel, cfg, r, &mut draft),
        },
    };

    run_clock(s, elapsed, cfg, &mut draft);
    draft
}

fn choose_play(
    s: &GameSimState,
    call: PlayCall,
    call_roll: f64,
    variant_roll: f64,
    cfg: &SimSystemsConfig,
) -> (PlayConcept, Personnel, CallSource) {
    let mut rejected = false;
    if let PlayCall::Called { concept, personnel } = call {
        if is_valid_call(s, concept, personnel) {
            return (concept, personnel, CallSource::Called);
        }
        warn!(
            "invalid call {:?} from {} personnel on {} and {} at the {}; using auto-pick",
            concept,
            personnel.label(),
            s.down,
            s.distance,
            s.ball_on
        );
        rejected = true;
    }
    if let Some((concept, personnel)) = scripted_call(s) {
        let source = if rejected { CallSource::Fallback } else { CallSource::Scripted };
        return (concept, personnel, source);
    }
    let (concept, personnel) = auto_pick(s, call_roll, variant_roll, cfg);
    (concept, personnel, if rejected { CallSource::Fallback } else { CallSource::Auto })
}

/// Situational play selection.
pub(crate) fn auto_pick(
    s: &GameSimState,
    call_roll: f64,
    variant_roll: f64,
    cfg: &SimSystemsConfig,
) -> (PlayConcept, Personnel) {
    let offense = s.offense();
    let margin = s.margin(offense);
    let clock = &s.clock;
    let to_goal = s.yards_to_goal();
    let fg_distance = to_goal + 17;
    let kicker = s.ratings.get(offense);
    let in_fg_range = fg_distance <= MAX_FIELD_GOAL_DISTANCE
        && (fg_distance as f64) <= kick::kicker_range(kicker.kicker_power, &cfg.physics.kick) + 2.0;
    let short = s.distance <= 2;

    // Victory formation
    let kneel_window = (cfg.clock.huddle_milk + cfg.clock.kneel_duration) * (5 - s.down.min(4)) as u16;
    if clock.quarter == 4 && margin > 0 && clock.seconds_remaining <= kneel_window {
        return (PlayConcept::Kneel, Personnel::Heavy);
    }
    if clock.quarter == 2 && clock.seconds_remaining <= 15 && to_goal > 60 && s.down < 4 {
        return (PlayConcept::Kneel, Personnel::Heavy);
    }

    // Last snap of a half, or sudden death in range
    let last_snap = matches!(clock.quarter, 2 | 4) && clock.seconds_remaining <= 10;
    let kick_now = in_fg_range
        && ((last_snap && (clock.quarter == 2 || (-3..=0).contains(&margin)))
            || (clock.is_overtime() && s.down >= 3 && to_goal <= 25));
    if kick_now {
        return (PlayConcept::FieldGoal, Personnel::SpecialTeams);
    }

    if s.down == 4 {
        match recommend_fourth_down(s, cfg).best() {
            FourthDownDecision::Punt => return (PlayConcept::Punt, Personnel::SpecialTeams),
            FourthDownDecision::FieldGoal if fg_distance <= MAX_FIELD_GOAL_DISTANCE => {
                return (PlayConcept::FieldGoal, Personnel::SpecialTeams)
            }
            _ => {}
        }
    }

    let plan = s.plans.get(offense);
    let mut run_share = plan.offensive_focus.run_share();
    if short {
        run_share += 0.25;
    } else if s.distance >= 8 {
        run_share -= 0.20;
    }
    match choose_tempo(clock, margin) {
        Tempo::HurryUp => run_share -= 0.25,
        Tempo::Milk => run_share += 0.25,
        Tempo::Normal => {}
    }
    let run_share = run_share.clamp(0.05, 0.95);

    let concept = if call_roll < run_share {
        if s.distance <= 1 && variant_roll < 0.35 {
            PlayConcept::QbSneak
        } else if short {
            if variant_roll < 0.6 { PlayConcept::Power } else { PlayConcept::InsideZone }
        } else {
            match (variant_roll * 4.0) as usize {
                0 => PlayConcept::InsideZone,
                1 => PlayConcept::OutsideZone,
                2 => PlayConcept::Power,
                _ => PlayConcept::Draw,
            }
        }
    } else {
        let deep_share = match plan.offensive_focus {
            OffensiveFocus::Vertical => 0.30,
            OffensiveFocus::PassHeavy => 0.18,
            _ => 0.14,
        };
        if variant_roll < deep_share && to_goal > 25 {
            PlayConcept::DeepShot
        } else if variant_roll < 0.40 {
            PlayConcept::Dropback
        } else if variant_roll < 0.60 {
            PlayConcept::Quick
        } else if variant_roll < 0.75 {
            PlayConcept::Screen
        } else if s.down <= 2 {
            PlayConcept::PlayAction
        } else {
            PlayConcept::Dropback
        }
    };
    (concept, Personnel::default_for(concept, short))
}

/// Flag roll for runs and passes. `Some(elapsed)` when a flag wiped the play.
///
/// Always two draws: flag roll, kind roll.
fn penalty_check(
    s: &mut GameSimState,
    cfg: &SimSystemsConfig,
    r: &mut DetRng,
    draft: &mut PlayDraft,
) -> Option<u16> {
    let flag_roll = r.next_f64();
    let kind_roll = r.next_f64();

    let pc = &cfg.physics.penalty;
    let offense = s.offense();
    let defense = s.defense();
    let p_off = pc.band.clamp(pc.base_rate - pc.discipline_weight * rating_z(s.ratings.get(offense).discipline));
    let p_def = pc.band.clamp(pc.base_rate - pc.discipline_weight * rating_z(s.ratings.get(defense).discipline));
    let pre_snap = kind_roll < pc.pre_snap_share;
    let elapsed = if pre_snap { 0 } else { cfg.clock.run_duration };
    let ball_on = s.ball_on as i32;

    if flag_roll < p_off {
        let (name, full) = if pre_snap { ("false start", 5) } else { ("holding", 10) };
        // half the distance to the goal
        let moved = if full >= ball_on { ball_on / 2 } else { full };
        s.ball_on = (ball_on - moved).max(1) as u8;
        s.distance = (s.distance as i32 + moved).clamp(1, 99) as u8;
        s.box_score.get_mut(offense).penalties += 1;
        s.clock.running = false;
        draft.yards = -moved;
        draft.tag(OutcomeTag::Penalty);
        draft.say(format!("penalty on {}: {name}, {moved} yds, replay down", s.team_id(offense)));
        draft.explain("offensive discipline", name);
        return Some(elapsed);
    }

    if flag_roll < p_off + p_def {
        let (name, full, automatic_first) =
            if pre_snap { ("offside", 5, false) } else { ("pass interference", 15, true) };
        let to_goal = 100 - ball_on;
        let moved = if full >= to_goal { to_goal / 2 } else { full };
        s.ball_on = (ball_on + moved).min(99) as u8;
        s.box_score.get_mut(defense).penalties += 1;
        s.clock.running = false;
        draft.yards = moved;
        draft.tag(OutcomeTag::Penalty);
        draft.say(format!("penalty on {}: {name}, {moved} yds", s.team_id(defense)));
        if automatic_first || moved >= s.distance as i32 {
            s.down = 1;
            s.distance = 10.min(100 - s.ball_on);
            s.box_score.get_mut(offense).first_downs += 1;
            draft.tag(OutcomeTag::FirstDown);
            draft.say("1st down");
        } else {
            s.distance = (s.distance as i32 - moved).max(1) as u8;
        }
        draft.explain("defensive discipline", name);
        return Some(elapsed);
    }
    None
}

fn front_adjustment(focus: DefensiveFocus) -> f64 {
    match focus {
        DefensiveFocus::StopRun => 6.0,
        DefensiveFocus::Blitz => 3.0,
        DefensiveFocus::Coverage => -4.0,
        DefensiveFocus::Balanced => 0.0,
    }
}

fn run_play(
    s: &mut GameSimState,
    concept: PlayConcept,
    personnel: Personnel,
    cfg: &SimSystemsConfig,
    r: &mut DetRng,
    draft: &mut PlayDraft,
) -> u16 {
    let offense = s.offense();
    let off = s.ratings.get(offense).clone();
    let def = s.ratings.get(s.defense()).clone();
    let fatigue = s.drive_fatigue();
    let front = front_adjustment(s.plans.get(s.defense()).defensive_focus);
    let scheme = match concept {
        PlayConcept::Power => 3.0,
        PlayConcept::OutsideZone => -1.0,
        _ => 0.0,
    };
    let to_goal = s.yards_to_goal();
    let goal_to_go = to_goal <= s.distance;
    let use_pile = concept == PlayConcept::QbSneak
        || (s.distance <= 2 && matches!(personnel, Personnel::Heavy | Personnel::P13 | Personnel::P21))
        || (goal_to_go && to_goal <= 2);

    let (yards, kind) = if use_pile {
        let out = pile::resolve(
            &PileInput {
                push: off.ol_run_block + scheme,
                carrier_power: if concept == PlayConcept::QbSneak { off.qb_poise } else { off.rb_power },
                anchor: def.dl_power + front,
                fill: def.lb_tackling,
                yards_to_go: s.distance.min(to_goal),
                goal_line: goal_to_go,
                conditions: s.conditions,
                fatigue,
            },
            &cfg.physics.pile,
            r,
        );
        if out.converted {
            draft.explain("push up front", "short-yardage pile");
        } else {
            draft.explain("defensive anchor", "short-yardage pile");
        }
        (out.yards, ContactKind::Pile)
    } else {
        let out = contact::resolve(
            &ContactInput {
                carrier_power: off.rb_power,
                carrier_elusive: off.rb_elusive,
                tackler_tackling: def.lb_tackling,
                blocking: off.ol_run_block + scheme,
                defenders: def.dl_run_stop + front,
                base_gain: concept.base_gain(),
                open_field: false,
                conditions: s.conditions,
                fatigue,
            },
            &cfg.physics.contact,
            r,
        );
        let primary = if out.breakaway {
            "breakaway run"
        } else if out.broken_tackle {
            "broken tackle"
        } else if out.stuffed {
            "run stuffed at the line"
        } else {
            "blocking at the point of attack"
        };
        draft.explain(primary, "run fit");
        let kind = if out.stuffed { ContactKind::GangTackle } else { ContactKind::Standard };
        (out.yards, kind)
    };

    let f = fumble::resolve(
        &FumbleInput {
            carrier_security: off.ball_security,
            hitter_power: def.dl_power,
            contact: kind,
            conditions: s.conditions,
            fatigue,
        },
        &cfg.physics.fumble,
        r,
    );
    let oob_roll = r.next_f64();
    let oob_rate = if concept == PlayConcept::OutsideZone { 0.25 } else { 0.08 };

    s.box_score.get_mut(offense).rush_yards += yards;
    draft.yards = yards;
    draft.say(format!("{} {} for {yards} yds", s.team_id(offense), concept.label()));

    if f.fumbled {
        settle_fumble(s, yards, &f, cfg, r, draft);
    } else {
        let out_of_bounds = oob_roll < oob_rate;
        s.clock.running = !out_of_bounds;
        if out_of_bounds {
            draft.say("out of bounds");
        }
        advance_ball(s, yards, cfg, r, draft);
    }
    cfg.clock.run_duration
}

fn pass_play(
    s: &mut GameSimState,
    concept: PlayConcept,
    cfg: &SimSystemsConfig,
    r: &mut DetRng,
    draft: &mut PlayDraft,
) -> u16 {
    let offense = s.offense();
    let defense = s.defense();
    let off = s.ratings.get(offense).clone();
    let def = s.ratings.get(defense).clone();
    let fatigue = s.drive_fatigue();
    let focus = s.plans.get(defense).defensive_focus;

    let blitz_roll = r.next_f64();
    let blitz = blitz_roll
        < match focus {
            DefensiveFocus::Blitz => 0.45,
            DefensiveFocus::StopRun => 0.20,
            _ => 0.15,
        };
    let rush = pass_rush::resolve(
        &PassRushInput {
            rusher_bend: def.dl_bend,
            rusher_power: def.dl_power,
            blocker_pass_pro: off.ol_pass_pro,
            qb_poise: off.qb_poise,
            drop: concept.drop_depth(),
            blitz,
            play_action: concept == PlayConcept::PlayAction,
            fatigue,
        },
        &cfg.physics.pass_rush,
        r,
    );

    if rush.sack {
        let f = fumble::resolve(
            &FumbleInput {
                carrier_security: off.ball_security,
                hitter_power: def.dl_power,
                contact: ContactKind::BlindSide,
                conditions: s.conditions,
                fatigue,
            },
            &cfg.physics.fumble,
            r,
        );
        let yards = -rush.sack_yards;
        let team_box = s.box_score.get_mut(offense);
        team_box.sacks_taken += 1;
        team_box.pass_yards += yards;
        draft.yards = yards;
        draft.tag(OutcomeTag::Sack);
        draft.say(format!("{} sacked for a loss of {} yds", s.team_id(offense), rush.sack_yards));
        draft.explain("pass rush", if blitz { "blitz got home" } else { "protection breakdown" });
        if f.fumbled {
            settle_fumble(s, yards, &f, cfg, r, draft);
        } else {
            s.clock.running = true;
            advance_ball(s, yards, cfg, r, draft);
        }
        return cfg.clock.sack_duration;
    }

    let depth_roll = r.next_f64();
    let to_goal = s.yards_to_goal() as f64;
    let target = (concept.target_depth() + (depth_roll - 0.5) * 6.0).min(to_goal + 5.0);
    let coverage_shift = match focus {
        DefensiveFocus::Coverage => -0.35,
        _ => 0.0,
    };
    let separation = rating_z(off.wr_route) - rating_z(def.db_coverage)
        + if blitz { 0.3 } else { 0.0 }
        + coverage_shift;
    let throw = ballistics::resolve(
        &BallisticsInput {
            arm: off.qb_arm,
            accuracy: off.qb_accuracy,
            spin: off.qb_spin,
            poise: off.qb_poise,
            air_yards: target,
            separation,
            pressure: rush.pressure,
            conditions: s.conditions,
        },
        &cfg.physics.ballistics,
        r,
    );
    let air = throw.air_yards.round() as i32;

    if throw.completed {
        let yac = contact::resolve(
            &ContactInput {
                carrier_power: off.rb_power,
                carrier_elusive: off.rb_elusive,
                tackler_tackling: def.lb_tackling,
                blocking: 60.0,
                defenders: def.db_coverage,
                base_gain: concept.base_gain(),
                open_field: true,
                conditions: s.conditions,
                fatigue,
            },
            &cfg.physics.contact,
            r,
        );
        let f = fumble::resolve(
            &FumbleInput {
                carrier_security: off.ball_security,
                hitter_power: def.lb_tackling,
                contact: ContactKind::Standard,
                conditions: s.conditions,
                fatigue,
            },
            &cfg.physics.fumble,
            r,
        );
        let oob_roll = r.next_f64();
        let yards = air + yac.yards.max(0);
        s.box_score.get_mut(offense).pass_yards += yards;
        draft.yards = yards;
        draft.say(format!("{} {} complete for {yards} yds", s.team_id(offense), concept.label()));
        draft.explain(
            if throw.catchable { "ball placement" } else { "contested catch" },
            if yac.broken_tackle { "yards after catch" } else { "route separation" },
        );
        if f.fumbled {
            settle_fumble(s, yards, &f, cfg, r, draft);
        } else {
            s.clock.running = oob_roll >= 0.2;
            if !s.clock.running {
                draft.say("out of bounds");
            }
            advance_ball(s, yards, cfg, r, draft);
        }
        return cfg.clock.pass_complete_duration;
    }

    if throw.intercepted {
        let return_roll = r.next_f64();
        s.box_score.get_mut(offense).turnovers += 1;
        s.clock.running = false;
        draft.tag(OutcomeTag::Interception);
        draft.explain(
            if rush.pressure { "pressure forced the throw" } else { "coverage read" },
            "ball placement",
        );
        let catch_spot = (s.ball_on as i32 + air).max(1);
        if catch_spot >= 100 {
            draft.tag(OutcomeTag::Touchback);
            draft.say(format!("pass intercepted by {} in the end zone, touchback", s.team_id(defense)));
            start_drive(s, defense, PUNT_TOUCHBACK_SPOT);
        } else {
            let ret = (return_roll * return_roll * 40.0).round() as i32;
            draft.say(format!("pass intercepted by {}, returned {ret} yds", s.team_id(defense)));
            let defense_spot = 100 - catch_spot + ret;
            if defense_spot >= 100 {
                score_touchdown(s, defense, cfg, r, draft);
            } else {
                start_drive(s, defense, defense_spot);
            }
        }
        return cfg.clock.pass_complete_duration;
    }

    draft.tag(OutcomeTag::Incomplete);
    draft.say(format!("{} {} incomplete", s.team_id(offense), concept.label()));
    draft.explain(
        if rush.pressure { "pressure" } else { "coverage" },
        if throw.catchable { "dropped" } else { "off target" },
    );
    s.clock.running = false;
    advance_ball(s, 0, cfg, r, draft);
    cfg.clock.pass_incomplete_duration
}

fn kneel_play(s: &mut GameSimState, cfg: &SimSystemsConfig, r: &mut DetRng, draft: &mut PlayDraft) -> u16 {
    let yards = if s.ball_on > 1 { -1 } else { 0 };
    s.box_score.get_mut(s.offense()).rush_yards += yards;
    draft.yards = yards;
    draft.tag(OutcomeTag::Kneel);
    draft.say(format!("{} kneels, {yards} yds", s.team_id(s.offense())));
    draft.explain("clock management", "victory formation");
    s.clock.running = true;
    advance_ball(s, yards, cfg, r, draft);
    cfg.clock.kneel_duration
}

fn punt_play(s: &mut GameSimState, cfg: &SimSystemsConfig, r: &mut DetRng, draft: &mut PlayDraft) -> u16 {
    let kicking = s.offense();
    let receiving = s.defense();
    let k = s.ratings.get(kicking);
    let out = kick::resolve_punt(
        &PuntInput {
            power: k.punter_power,
            returner: s.ratings.get(receiving).returner,
            coverage: k.lb_tackling,
            conditions: s.conditions,
            yards_to_goal: s.yards_to_goal() as f64,
        },
        &cfg.physics.kick,
        r,
    );
    draft.tag(OutcomeTag::Punt);
    draft.yards = out.net_yards;
    draft.explain("punter leg", if out.fair_catch { "hang time" } else { "return coverage" });
    s.clock.running = false;

    if out.touchback {
        draft.tag(OutcomeTag::Touchback);
        draft.say(format!("{} punt {} yds, touchback", s.team_id(kicking), out.gross_yards));
        start_drive(s, receiving, PUNT_TOUCHBACK_SPOT);
    } else {
        let landing = s.ball_on as i32 + out.gross_yards;
        let spot = 100 - landing + out.return_yards;
        if out.fair_catch {
            draft.say(format!("{} punt {} yds, fair catch", s.team_id(kicking), out.gross_yards));
        } else {
            draft.say(format!(
                "{} punt {} yds, returned {} yds",
                s.team_id(kicking),
                out.gross_yards,
                out.return_yards
            ));
        }
        if spot >= 100 {
            score_touchdown(s, receiving, cfg, r, draft);
        } else {
            start_drive(s, receiving, spot);
        }
    }
    cfg.clock.punt_duration
}

fn field_goal_play(
    s: &mut GameSimState,
    cfg: &SimSystemsConfig,
    r: &mut DetRng,
    draft: &mut PlayDraft,
) -> u16 {
    let offense = s.offense();
    let distance = s.yards_to_goal() as f64 + 17.0;
    let k = s.ratings.get(offense);
    let pressure = s.clock.end_of_half(cfg.clock.two_minute_threshold) && s.margin(offense).abs() <= 3;
    let out = kick::resolve_field_goal(
        &FieldGoalInput {
            accuracy: k.kicker_accuracy,
            power: k.kicker_power,
            distance_yards: distance,
            conditions: s.conditions,
            pressure,
        },
        &cfg.physics.kick,
        r,
    );
    s.clock.running = false;
    draft.explain("kicker accuracy", if pressure { "late-game pressure" } else { "distance" });

    if out.made {
        score_field_goal(s, offense, distance, draft);
    } else {
        let how = match out.miss {
            Some(dir) => format!("is no good, {}", dir.describe()),
            None => "is blocked".to_string(),
        };
        draft.say(format!("{}-yard field goal {how}", distance as i32));
        let kick_spot = s.ball_on as i32 - 7;
        let defense = s.defense();
        start_drive(s, defense, (100 - kick_spot).max(20));
    }
    cfg.clock.field_goal_duration
}
