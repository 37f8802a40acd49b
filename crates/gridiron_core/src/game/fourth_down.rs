//! Fourth-down decision support
//!
//! Expected points are linear in field position. Each option is valued as
//! `p * success + (1 - p) * failure`, from the offense's point of view, with
//! the opponent's ensuing possession counted against it.

use serde::{Deserialize, Serialize};

use super::state::GameSimState;
use crate::config::SimSystemsConfig;
use crate::physics::kick::{field_goal_make_probability, FieldGoalInput};
use crate::ratings::rating_z;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FourthDownDecision {
    Go,
    Punt,
    FieldGoal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourthDownOption {
    pub decision: FourthDownDecision,
    pub expected_points: f64,
    pub success_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourthDownRecommendation {
    /// Best first
    pub options: Vec<FourthDownOption>,
    /// Conversion rate at which going for it ties the best kicking option
    pub break_even_go_rate: f64,
}

impl FourthDownRecommendation {
    pub fn best(&self) -> FourthDownDecision {
        self.options.first().map(|o| o.decision).unwrap_or(FourthDownDecision::Punt)
    }
}

/// Yard line the kickoff after a score is expected to give the opponent.
const KICKOFF_RECEIVING_SPOT: f64 = 25.0;

/// Conversion probability for `distance` yards to go.
pub fn go_success_rate(state: &GameSimState, cfg: &SimSystemsConfig) -> f64 {
    let fd = &cfg.fourth_down;
    let offense = state.ratings.get(state.offense());
    let defense = state.ratings.get(state.defense());
    let edge = 0.03 * (rating_z(offense.offense()) - rating_z(defense.defense()));
    let distance = state.distance.max(1) as f64;
    (fd.go_base_rate - fd.go_rate_per_yard * (distance - 1.0) + edge)
        .clamp(fd.go_rate_min, fd.go_rate_max)
}

/// 4th down 추천
pub fn recommend_fourth_down(state: &GameSimState, cfg: &SimSystemsConfig) -> FourthDownRecommendation {
    let fd = &cfg.fourth_down;
    let ep = |yard_line: f64| fd.ep_intercept + fd.ep_per_yard * yard_line.clamp(1.0, 99.0);
    let score_value = |points: f64| points - ep(KICKOFF_RECEIVING_SPOT);

    let ball_on = state.ball_on.clamp(1, 99) as f64;
    let distance = state.distance.max(1) as f64;
    let turnover_at_spot = -ep(100.0 - ball_on);

    // Go
    let p_go = go_success_rate(state, cfg);
    let go_success = if ball_on + distance >= 100.0 {
        score_value(fd.touchdown_value)
    } else {
        ep(ball_on + distance)
    };
    let mut go_ev = p_go * go_success + (1.0 - p_go) * turnover_at_spot;

    // Field goal
    let offense = state.ratings.get(state.offense());
    let kick = FieldGoalInput {
        accuracy: offense.kicker_accuracy,
        power: offense.kicker_power,
        distance_yards: 100.0 - ball_on + 17.0,
        conditions: state.conditions,
        pressure: false,
    };
    let p_fg = field_goal_make_probability(&kick, &cfg.physics.kick);
    let miss_spot = (100.0 - (ball_on - 7.0)).clamp(20.0, 99.0);
    let mut fg_ev = p_fg * score_value(3.0) + (1.0 - p_fg) * -ep(miss_spot);

    // Punt
    let opponent_after_punt = if ball_on + fd.punt_net_yards >= 100.0 {
        20.0
    } else {
        100.0 - (ball_on + fd.punt_net_yards)
    };
    let mut punt_ev = -ep(opponent_after_punt);

    // Score / time context
    let margin = state.margin(state.offense());
    let late = state.clock.quarter >= 4 && (state.clock.is_overtime() || state.clock.seconds_remaining <= 300);
    let mut go_bonus = 0.0;
    if late && margin < 0 {
        go_bonus = fd.urgency_bonus;
        if margin < -3 {
            // a field goal does not catch up
            fg_ev -= fd.urgency_bonus;
        }
    } else if late && margin > 0 {
        punt_ev += fd.protect_lead_bonus;
        fg_ev += fd.protect_lead_bonus;
    }
    go_ev += go_bonus;

    let best_kick = punt_ev.max(fg_ev);
    let go_swing = go_success - turnover_at_spot;
    let break_even = if go_swing > f64::EPSILON {
        (best_kick - go_bonus - turnover_at_spot) / go_swing
    } else {
        1.0
    };

    let mut options = vec![
        FourthDownOption { decision: FourthDownDecision::Go, expected_points: go_ev, success_probability: p_go },
        FourthDownOption { decision: FourthDownDecision::Punt, expected_points: punt_ev, success_probability: 1.0 },
        FourthDownOption {
            decision: FourthDownDecision::FieldGoal,
            expected_points: fg_ev,
            success_probability: p_fg,
        },
    ];
    // stable sort keeps Go > Punt > FieldGoal on exact ties
    options.sort_by(|a, b| b.expected_points.total_cmp(&a.expected_points));

    FourthDownRecommendation { options, break_even_go_rate: break_even.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::init_game_sim;
    use crate::game::state::{GamePhase, GameSimParams};
    use crate::physics::Conditions;

    fn fourth(ball_on: u8, distance: u8) -> GameSimState {
        let cfg = SimSystemsConfig::default();
        let mut state = init_game_sim(GameSimParams::new("A", "B", 9), &cfg);
        state.phase = GamePhase::Scrimmage;
        state.down = 4;
        state.ball_on = ball_on;
        state.distance = distance;
        state.conditions = Conditions::default();
        state
    }

    #[test]
    fn test_three_ranked_options() {
        let cfg = SimSystemsConfig::default();
        let rec = recommend_fourth_down(&fourth(45, 3), &cfg);
        assert!(rec.options.len() >= 3);
        assert!((0.0..=1.0).contains(&rec.break_even_go_rate));
        for pair in rec.options.windows(2) {
            assert!(pair[0].expected_points >= pair[1].expected_points);
        }
    }

    #[test]
    fn test_deep_in_own_territory_punts() {
        let cfg = SimSystemsConfig::default();
        let rec = recommend_fourth_down(&fourth(15, 9), &cfg);
        assert_eq!(rec.best(), FourthDownDecision::Punt);
    }

    #[test]
    fn test_chip_shot_kicks() {
        let cfg = SimSystemsConfig::default();
        let rec = recommend_fourth_down(&fourth(88, 12), &cfg);
        assert_eq!(rec.best(), FourthDownDecision::FieldGoal);
    }

    #[test]
    fn test_trailing_late_favors_going() {
        let cfg = SimSystemsConfig::default();
        let calm = fourth(55, 4);
        let mut desperate = calm.clone();
        desperate.clock.quarter = 4;
        desperate.clock.seconds_remaining = 90;
        let offense = desperate.offense();
        *desperate.score.get_mut(offense.other()) = 14;

        let go_ev = |rec: &FourthDownRecommendation| {
            rec.options
                .iter()
                .find(|o| o.decision == FourthDownDecision::Go)
                .map(|o| o.expected_points)
                .unwrap()
        };
        let a = recommend_fourth_down(&calm, &cfg);
        let b = recommend_fourth_down(&desperate, &cfg);
        assert!(go_ev(&b) > go_ev(&a));
        assert_eq!(b.best(), FourthDownDecision::Go);
    }
}
