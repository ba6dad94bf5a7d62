//! End-to-end scenarios driven through `Game` with a scripted outcome table.

use super::{GameEvent, PlayEngine, PlayReport, Submission};
use crate::config::RulesConfig;
use crate::error::{ErrorKind, GameError};
use crate::game::Game;
use crate::models::{
    Action, DefenseScheme, OffenseScheme, OvertimeSlot, PlayResult, PlayType, Playbook, QuarterType,
    Side, Team, TimeOption, TimeoutRequest,
};
use crate::table::{Outcome, OutcomeKey, OutcomeProvider, TimeProvider};
use chrono::Utc;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Hands out queued outcomes in order and remembers every key it was asked
#[derive(Default)]
struct Script {
    outcomes: RefCell<VecDeque<Outcome>>,
    keys: RefCell<Vec<OutcomeKey>>,
}

impl Script {
    fn push(&self, outcome: Outcome) {
        self.outcomes.borrow_mut().push_back(outcome);
    }

    fn last_key(&self) -> Option<OutcomeKey> {
        self.keys.borrow().last().copied()
    }
}

impl OutcomeProvider for Script {
    fn lookup(&self, key: &OutcomeKey) -> Option<Outcome> {
        self.keys.borrow_mut().push(*key);
        self.outcomes.borrow_mut().pop_front()
    }
}

struct FlatTimes(u32);

impl TimeProvider for FlatTimes {
    fn play_seconds(&self, _play: PlayType, _result: PlayResult, _yards: Option<i32>) -> Option<u32> {
        Some(self.0)
    }
}

struct Tables {
    script: Script,
    times: FlatTimes,
}

impl Tables {
    fn new(seconds: u32) -> Self {
        Self { script: Script::default(), times: FlatTimes(seconds) }
    }

    fn engine(&self) -> PlayEngine<'_> {
        PlayEngine::new(&self.script, &self.times)
    }
}

fn new_game() -> Game {
    let home = Playbook { offense: OffenseScheme::Spread, defense: DefenseScheme::FourThree };
    let away = Playbook { offense: OffenseScheme::Flexbone, defense: DefenseScheme::ThreeFour };
    Game::new(
        Team::new("home", "Home U", home).with_coaches(["coach_h"]),
        Team::new("away", "Away State", away).with_coaches(["coach_a"]),
        RulesConfig::default(),
        Utc::now(),
    )
    .with_coin_seed(2024)
}

/// Home on offense, first quarter, waiting on the defense
fn game_at(location: i32, down: u32, yards_to_go: i32) -> Game {
    let mut game = new_game();
    game.status.possession = Side::Home;
    game.status.location = location;
    game.status.down = down;
    game.status.yards_to_go = yards_to_go;
    game.status.await_numbers(Action::Play);
    game
}

fn try_call(
    game: &mut Game,
    tables: &Tables,
    play: PlayType,
    outcome: Option<Outcome>,
    time_option: TimeOption,
) -> Result<PlayReport, GameError> {
    if let Some(outcome) = outcome {
        tables.script.push(outcome);
    }
    let offense = game.status.possession;
    game.submit_defense(offense.negate(), 700, None, Utc::now())?;
    let submission = Submission::new(offense, play, 720).with_time_option(time_option);
    game.submit_offense(&tables.engine(), submission, Utc::now())
}

fn call(game: &mut Game, tables: &Tables, play: PlayType, result: PlayResult, yards: Option<i32>) -> PlayReport {
    try_call(game, tables, play, Some(Outcome::new(result, yards)), TimeOption::Normal).unwrap()
}

#[test]
fn scenario_a_gain_moves_the_chains() {
    let tables = Tables::new(10);
    let mut game = game_at(45, 2, 7);
    let report = call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(12));

    assert_eq!(report.summary.actual_result, PlayResult::Gain);
    assert_eq!(report.summary.location, 45);
    assert_eq!(game.status.location, 57);
    assert_eq!((game.status.down, game.status.yards_to_go), (1, 10));
    assert_eq!(game.status.stats(Side::Home).yards_rushing, 12);
    assert_eq!(game.status.stats(Side::Home).yards_total, 12);

    let key = tables.script.last_key().unwrap();
    assert_eq!(key.position, 55);
    assert_eq!(key.offense, Some(OffenseScheme::Spread));
    assert_eq!(key.defense, Some(DefenseScheme::ThreeFour));
    assert_eq!(key.difference, 20);
}

#[test]
fn scenario_b_gain_past_goal_is_touchdown() {
    let tables = Tables::new(10);
    let mut game = game_at(92, 1, 8);
    let report = call(&mut game, &tables, PlayType::Pass, PlayResult::Gain, Some(10));

    assert_eq!(report.summary.result, Some(PlayResult::Gain));
    assert_eq!(report.summary.actual_result, PlayResult::Touchdown);
    assert_eq!(report.summary.yards, Some(8));
    assert_eq!(game.status.points(Side::Home), 6);
    assert_eq!(game.status.location, 97);
    assert_eq!(game.status.waiting_action, Action::Conversion);
    assert_eq!(game.status.waiting_on, Side::Away);
    assert!(report.events.iter().any(|e| matches!(e, GameEvent::DriveEnded(d) if d.result == PlayResult::Touchdown)));
}

#[test]
fn scenario_c_failed_fourth_down_turns_over() {
    let tables = Tables::new(10);
    let mut game = game_at(30, 4, 5);
    let report = call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(3));

    assert_eq!(report.summary.actual_result, PlayResult::Turnover);
    assert_eq!(game.status.possession, Side::Away);
    assert_eq!(game.status.location, 67);
    assert_eq!((game.status.down, game.status.yards_to_go), (1, 10));
    assert_eq!(game.status.waiting_on, Side::Home);
}

#[test]
fn scenario_d_field_goal_goes_to_kickoff() {
    let tables = Tables::new(5);
    let mut game = game_at(75, 4, 6);
    call(&mut game, &tables, PlayType::FieldGoal, PlayResult::FieldGoal, None);

    assert_eq!(game.status.points(Side::Home), 3);
    assert_eq!(game.status.waiting_action, Action::Kickoff);
    assert_eq!(game.status.possession, Side::Home);
    assert_eq!(game.status.location, 35);
    let stats = game.status.stats(Side::Home);
    assert_eq!((stats.field_goals_scored, stats.field_goals_attempted), (1, 1));
}

#[test]
fn scenario_d_overtime_field_goal_ends_possession() {
    let tables = Tables::new(5);
    let mut game = game_at(80, 3, 8);
    game.status.quarter = 5;
    game.status.quarter_type = QuarterType::OvertimeSudden;
    game.status.overtime_possession = Some(OvertimeSlot::First);
    call(&mut game, &tables, PlayType::FieldGoal, PlayResult::FieldGoal, None);

    assert_eq!(game.status.points(Side::Home), 3);
    assert_eq!(game.status.waiting_action, Action::Play);
    assert_eq!(game.status.possession, Side::Away);
    assert_eq!(game.status.location, 75);
    assert_eq!(game.status.overtime_possession, Some(OvertimeSlot::Second));
}

#[test]
fn scenario_e_halftime_kickoff_resets_timeouts() {
    let tables = Tables::new(10);
    let mut game = game_at(50, 1, 10);
    game.status.quarter = 2;
    game.status.clock = 3;
    game.status.receiving_next = Side::Away;
    game.status.state_mut(Side::Home).timeouts = 1;
    game.status.state_mut(Side::Away).timeouts = 0;
    let report = call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(4));

    assert!(report.events.contains(&GameEvent::Halftime));
    assert_eq!(game.status.quarter, 3);
    assert_eq!(game.status.clock, 420);
    assert_eq!(game.status.state(Side::Home).timeouts, 3);
    assert_eq!(game.status.state(Side::Away).timeouts, 3);
    assert_eq!(game.status.waiting_action, Action::Kickoff);
    assert_eq!(game.status.possession, Side::Home);
    assert!(!game.status.time_runoff);
    assert_eq!(game.status.drives.last().unwrap().result, PlayResult::EndHalf);
}

#[test]
fn scenario_f_third_penalty_forfeits() {
    let mut game = game_at(50, 1, 10);
    game.status.score(Side::Home, 21);
    let now = Utc::now();
    game.penalize(Side::Home, now).unwrap();
    assert_eq!(game.status.points(Side::Away), 8);
    // Away kicks off to the delinquent home side
    assert_eq!(game.status.possession, Side::Away);
    assert_eq!(game.status.waiting_action, Action::Kickoff);

    game.penalize(Side::Home, now).unwrap();
    let events = game.penalize(Side::Home, now).unwrap();
    assert!(events.contains(&GameEvent::GameOver { winner: Some(Side::Away) }));
    assert_eq!(game.winner(), Some(Side::Away));
    assert_eq!(game.status.waiting_action, Action::End);
}

#[test]
fn runoff_and_timeouts() {
    let tables = Tables::new(10);
    let mut game = game_at(20, 1, 10);
    call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(3));
    // Clock was stopped before the first snap
    assert_eq!(game.status.clock, 410);
    assert!(game.status.time_runoff);

    let report = call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(2));
    assert_eq!(report.summary.runoff_time, 20);
    assert_eq!(game.status.clock, 380);

    game.request_timeout(Side::Home).unwrap();
    let report = call(&mut game, &tables, PlayType::Pass, PlayResult::Incomplete, None);
    assert_eq!(report.summary.runoff_time, 0);
    assert!(report.events.contains(&GameEvent::TimeoutUsed(Side::Home)));
    assert_eq!(game.status.state(Side::Home).timeouts, 2);
    assert_eq!(game.status.state(Side::Home).requested_timeout, TimeoutRequest::Used);
    assert_eq!(game.status.clock, 370);
    assert!(!game.status.time_runoff);

    // Clock stopped after the incompletion, so hurry-up costs nothing
    let report =
        try_call(&mut game, &tables, PlayType::Run, Some(Outcome::new(PlayResult::Gain, Some(6))), TimeOption::Hurry)
            .unwrap();
    assert_eq!(report.summary.runoff_time, 0);
    assert_eq!(game.status.state(Side::Home).requested_timeout, TimeoutRequest::None);
    assert_eq!(game.status.stats(Side::Home).possession_seconds, 10 + 30 + 10 + 10);
}

#[test]
fn touchdown_at_zero_clock_keeps_conversion() {
    let tables = Tables::new(10);
    let mut game = game_at(90, 1, 10);
    game.status.clock = 4;
    call(&mut game, &tables, PlayType::Pass, PlayResult::Touchdown, None);
    assert_eq!(game.status.clock, 0);
    assert_eq!(game.status.quarter, 1);
    assert_eq!(game.status.waiting_action, Action::Conversion);

    let report = call(&mut game, &tables, PlayType::Pat, PlayResult::Pat, None);
    assert_eq!(report.summary.play_time, 0);
    assert!(report.events.contains(&GameEvent::EndOfQuarter(1)));
    assert_eq!(game.status.points(Side::Home), 7);
    assert_eq!(game.status.quarter, 2);
    assert_eq!(game.status.clock, 420);
    assert_eq!(game.status.waiting_action, Action::Kickoff);
}

#[test]
fn safety_bars_onside_kick() {
    let tables = Tables::new(6);
    let mut game = game_at(3, 2, 10);
    let report = call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(-5));
    assert_eq!(report.summary.actual_result, PlayResult::Safety);
    assert_eq!(report.summary.yards, Some(-3));
    assert_eq!(game.status.points(Side::Away), 2);
    assert_eq!(game.status.possession, Side::Home);
    assert_eq!(game.status.location, 20);
    assert_eq!(game.status.waiting_action, Action::Kickoff);

    let err = try_call(&mut game, &tables, PlayType::KickoffOnside, None, TimeOption::Normal).unwrap_err();
    assert_eq!(err, GameError::OnsideNotAllowed);

    // The defense number stays, so only the offense resubmits
    let offense = game.status.possession;
    tables.script.push(Outcome::new(PlayResult::Kick, Some(30)));
    game.submit_offense(&tables.engine(), Submission::new(offense, PlayType::KickoffNormal, 9), Utc::now())
        .unwrap();
    assert_eq!(game.status.possession, Side::Away);
    assert_eq!(game.status.location, 30);
    assert_eq!(game.status.waiting_action, Action::Play);
    assert!(!game.status.no_onside_kick);
}

#[test]
fn safety_ending_half_allows_onside_at_second_half_kickoff() {
    let tables = Tables::new(6);
    let mut game = game_at(3, 1, 10);
    game.status.quarter = 2;
    game.status.clock = 3;
    game.status.receiving_next = Side::Away;
    let report = call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(-5));

    assert_eq!(report.summary.actual_result, PlayResult::Safety);
    assert!(report.events.contains(&GameEvent::Halftime));
    assert_eq!(game.status.quarter, 3);
    assert_eq!(game.status.possession, Side::Home);
    assert_eq!(game.status.location, 35);
    assert_eq!(game.status.waiting_action, Action::Kickoff);
    assert!(!game.status.no_onside_kick);

    call(&mut game, &tables, PlayType::KickoffOnside, PlayResult::Turnover, Some(45));
    assert_eq!(game.status.possession, Side::Home);
    assert_eq!(game.status.location, 55);
}

#[test]
fn kickoff_results() {
    let tables = Tables::new(5);

    let mut game = game_at(35, 1, 10);
    game.status.await_numbers(Action::Kickoff);
    call(&mut game, &tables, PlayType::KickoffNormal, PlayResult::Touchback, None);
    assert_eq!((game.status.possession, game.status.location), (Side::Away, 25));

    let mut game = game_at(35, 1, 10);
    game.status.await_numbers(Action::Kickoff);
    call(&mut game, &tables, PlayType::KickoffOnside, PlayResult::Turnover, Some(45));
    assert_eq!((game.status.possession, game.status.location), (Side::Home, 55));

    let mut game = game_at(35, 1, 10);
    game.status.await_numbers(Action::Kickoff);
    call(&mut game, &tables, PlayType::KickoffSquib, PlayResult::Touchdown, None);
    assert_eq!(game.status.points(Side::Away), 6);
    assert_eq!(game.status.possession, Side::Away);
    assert_eq!(game.status.waiting_action, Action::Conversion);
}

#[test]
fn interception_credits_defense_the_ball() {
    let tables = Tables::new(8);
    let mut game = game_at(40, 3, 6);
    let report = call(&mut game, &tables, PlayType::Pass, PlayResult::Turnover, Some(15));
    assert_eq!(report.summary.actual_result, PlayResult::Turnover);
    assert_eq!(game.status.possession, Side::Away);
    assert_eq!(game.status.location, 45);
    assert_eq!(game.status.stats(Side::Home).turnover_interceptions, 1);
    assert_eq!(game.status.stats(Side::Home).turnover_fumble, 0);
}

#[test]
fn pick_six_gives_defense_conversion() {
    let tables = Tables::new(8);
    let mut game = game_at(40, 1, 10);
    call(&mut game, &tables, PlayType::Pass, PlayResult::TurnoverTouchdown, None);
    assert_eq!(game.status.points(Side::Away), 6);
    assert_eq!(game.status.possession, Side::Away);
    assert_eq!(game.status.waiting_action, Action::Conversion);
    assert_eq!(game.status.waiting_on, Side::Home);
}

#[test]
fn punt_flips_field() {
    let tables = Tables::new(8);
    let mut game = game_at(30, 4, 9);
    call(&mut game, &tables, PlayType::Punt, PlayResult::Kick, Some(45));
    assert_eq!((game.status.possession, game.status.location), (Side::Away, 25));

    let mut game = game_at(60, 4, 9);
    let report = call(&mut game, &tables, PlayType::Punt, PlayResult::Kick, Some(50));
    assert_eq!(report.summary.actual_result, PlayResult::Touchback);
    assert_eq!((game.status.possession, game.status.location), (Side::Away, 20));
}

#[test]
fn pat_refused_from_third_overtime() {
    let tables = Tables::new(8);
    let mut game = game_at(97, 1, 10);
    game.status.quarter = 7;
    game.status.quarter_type = QuarterType::OvertimeSudden;
    game.status.await_numbers(Action::Conversion);
    let err = try_call(&mut game, &tables, PlayType::Pat, None, TimeOption::Normal).unwrap_err();
    assert_eq!(err, GameError::PatNotAllowed);
}

#[test]
fn missing_outcome_leaves_status_untouched() {
    let tables = Tables::new(8);
    let mut game = game_at(40, 2, 4);
    let before_history = game.history().len();
    let err = try_call(&mut game, &tables, PlayType::Run, None, TimeOption::Normal).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    assert_eq!(game.status.location, 40);
    assert_eq!(game.status.down, 2);
    assert_eq!(game.status.defense_number, Some(700));
    assert_eq!(game.history().len(), before_history);
}

#[test]
fn invalid_outcome_for_play_is_rejected() {
    let tables = Tables::new(8);
    let mut game = game_at(40, 2, 4);
    let err = try_call(
        &mut game,
        &tables,
        PlayType::FieldGoal,
        Some(Outcome::new(PlayResult::Incomplete, None)),
        TimeOption::Normal,
    )
    .unwrap_err();
    assert!(matches!(err, GameError::InvalidOutcome { play: PlayType::FieldGoal, .. }));
    assert_eq!(game.status.stats(Side::Home).field_goals_attempted, 0);
}

#[test]
fn errored_game_refuses_until_cleared() {
    let tables = Tables::new(8);
    let mut game = game_at(40, 1, 10);
    let now = Utc::now();
    game.submit_defense(Side::Away, 300, None, now).unwrap();
    game.set_errored(now);

    tables.script.push(Outcome::new(PlayResult::Gain, Some(5)));
    let err = game
        .submit_offense(&tables.engine(), Submission::new(Side::Home, PlayType::Run, 310), now)
        .unwrap_err();
    assert_eq!(err, GameError::Errored);
    assert_eq!(game.status.location, 40);

    game.clear_errored(now);
    game.submit_offense(&tables.engine(), Submission::new(Side::Home, PlayType::Run, 310), now).unwrap();
    assert_eq!(game.status.location, 45);
}

#[test]
fn revert_restores_previous_play() {
    let tables = Tables::new(8);
    let mut game = game_at(40, 1, 10);
    call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(5));
    call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(7));
    assert_eq!(game.status.location, 52);

    game.revert(0).unwrap();
    assert_eq!(game.status.location, 45);
    // Restored to the moment the offense was about to call
    assert_eq!(game.status.waiting_on, Side::Home);
    assert!(game.status.defense_number.is_some());
    assert_eq!(game.history().len(), 1);
}

#[test]
fn overtime_from_tied_regulation_to_winner() {
    let tables = Tables::new(10);
    let mut game = game_at(50, 1, 10);
    game.status.quarter = 4;
    game.status.clock = 5;
    let report = call(&mut game, &tables, PlayType::Run, PlayResult::Gain, Some(3));
    assert!(report.events.contains(&GameEvent::OvertimeStarted { time_forced: false }));
    assert_eq!(game.status.waiting_action, Action::OvertimeStart);
    assert_eq!(game.status.quarter, 5);

    let now = Utc::now();
    let won = game.coin_toss(Side::Away, true, now).unwrap();
    let winner = if won { Side::Away } else { Side::Home };
    game.coin_decision(winner, false, now).unwrap();
    assert_eq!(game.status.possession, winner);
    assert_eq!(game.status.location, 75);
    assert_eq!(game.status.overtime_possession, Some(OvertimeSlot::First));

    call(&mut game, &tables, PlayType::Pass, PlayResult::Gain, Some(30));
    assert_eq!(game.status.waiting_action, Action::Conversion);
    call(&mut game, &tables, PlayType::Pat, PlayResult::Pat, None);
    assert_eq!(game.status.points(winner), 7);
    assert_eq!(game.status.possession, winner.negate());
    assert_eq!(game.status.overtime_possession, Some(OvertimeSlot::Second));
    // No clock in overtime
    assert_eq!(game.status.clock, 0);

    let report = call(&mut game, &tables, PlayType::Run, PlayResult::Turnover, None);
    assert!(report.events.contains(&GameEvent::GameOver { winner: Some(winner) }));
    assert!(game.is_ended());
    assert_eq!(game.status.quarter_type, QuarterType::End);
}

#[test]
fn overtime_defensive_score_is_six_without_conversion() {
    let tables = Tables::new(10);
    let mut game = game_at(75, 1, 10);
    game.status.quarter = 5;
    game.status.quarter_type = QuarterType::OvertimeSudden;
    game.status.overtime_possession = Some(OvertimeSlot::Second);
    call(&mut game, &tables, PlayType::Pass, PlayResult::TurnoverTouchdown, None);
    assert_eq!(game.status.points(Side::Away), 6);
    assert_eq!(game.winner(), Some(Side::Away));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: after any run of gains and losses the stored status is
        /// either a live snap inside the field with down <= 4, or a pending
        /// conversion/kickoff after a score
        #[test]
        fn prop_location_and_down_resolved(
            start in 1i32..100,
            gains in proptest::collection::vec(-15i32..40, 1..30)
        ) {
            let tables = Tables::new(6);
            let mut game = game_at(start, 1, 10);
            for yards in gains {
                if game.is_ended() {
                    break;
                }
                let play = match game.status.waiting_action {
                    Action::Play => PlayType::Run,
                    Action::Conversion => PlayType::TwoPoint,
                    Action::Kickoff => PlayType::KickoffNormal,
                    _ => break,
                };
                let outcome = match play {
                    PlayType::Run => Outcome::new(PlayResult::Gain, Some(yards)),
                    PlayType::TwoPoint => Outcome::new(PlayResult::Miss, None),
                    _ => Outcome::new(PlayResult::Kick, Some(25)),
                };
                try_call(&mut game, &tables, play, Some(outcome), TimeOption::Normal).unwrap();

                let status = &game.status;
                prop_assert!((1..=4).contains(&status.down));
                match status.waiting_action {
                    Action::Play => prop_assert!(status.location > 0 && status.location < 100),
                    Action::Conversion => prop_assert_eq!(status.location, 97),
                    Action::Kickoff => prop_assert!(status.location == 35 || status.location == 20),
                    _ => {}
                }
            }
        }
    }
}
