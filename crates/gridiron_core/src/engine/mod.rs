//! # Play Engine
//!
//! Applies one resolved call to a [`GameStatus`]: yardage, scoring, down and
//! distance, possession, clock, drive bookkeeping and the overtime protocol.
//!
//! The engine never touches the outside world. Tables come in through
//! [`OutcomeProvider`] and [`TimeProvider`], rules through [`RulesConfig`],
//! and anything a reporter might want to announce comes back as
//! [`GameEvent`]s.
//!
//! On error the status passed in is left in an unspecified state; callers
//! run the engine on a copy and commit only on success (see `game::Game`).

pub mod clock;
pub mod coin;
pub mod drive;
pub mod overtime;
pub mod play;
pub mod resolver;

#[cfg(test)]
mod scenario_tests;

pub use resolver::difference;

use crate::config::{RulesConfig, MAX_NUMBER, MIN_NUMBER};
use crate::error::{GameError, Result};
use crate::models::{
    Action, DriveSummary, GameStatus, PerSide, PlaySummary, PlayType, Playbook, Side, TimeOption,
};
use crate::table::{OutcomeProvider, TimeProvider};

/// Something worth announcing that happened while applying a play
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    TimeoutUsed(Side),
    DriveEnded(DriveSummary),
    EndOfQuarter(u32),
    Halftime,
    /// Regulation ended tied
    OvertimeStarted { time_forced: bool },
    OvertimePeriod(u32),
    CoinDecided { winner: Side },
    PlayclockPenalty { side: Side, count: u32 },
    GameOver { winner: Option<Side> },
}

/// Per-game facts the engine reads but never changes
#[derive(Debug, Clone, PartialEq)]
pub struct GameFacts {
    pub playbooks: PerSide<Playbook>,
    /// The hard game deadline has passed, so overtime is time-forced
    pub deadline_passed: bool,
    pub force_chew: bool,
    pub coin_seed: u64,
}

/// The offense's half of a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub side: Side,
    pub play: PlayType,
    pub number: u32,
    pub time_option: TimeOption,
    pub submitter: Option<String>,
}

impl Submission {
    pub fn new(side: Side, play: PlayType, number: u32) -> Self {
        Self { side, play, number, time_option: TimeOption::Normal, submitter: None }
    }

    pub fn with_time_option(mut self, time_option: TimeOption) -> Self {
        self.time_option = time_option;
        self
    }

    pub fn with_submitter(mut self, submitter: impl Into<String>) -> Self {
        self.submitter = Some(submitter.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayReport {
    pub summary: PlaySummary,
    pub events: Vec<GameEvent>,
}

pub fn check_number(number: u32) -> Result<u32> {
    if (MIN_NUMBER..=MAX_NUMBER).contains(&number) {
        Ok(number)
    } else {
        Err(GameError::NumberOutOfRange(number))
    }
}

/// Mutable context for a single transition
pub(crate) struct Turn<'a> {
    pub rules: &'a RulesConfig,
    pub facts: &'a GameFacts,
    pub status: &'a mut GameStatus,
    pub events: Vec<GameEvent>,
}

impl<'a> Turn<'a> {
    pub fn new(rules: &'a RulesConfig, facts: &'a GameFacts, status: &'a mut GameStatus) -> Self {
        Self { rules, facts, status, events: Vec::new() }
    }

    pub fn offense(&self) -> Side {
        self.status.possession
    }

    pub fn defense(&self) -> Side {
        self.status.possession.negate()
    }

    pub fn playbook(&self, side: Side) -> Playbook {
        *self.facts.playbooks.get(side)
    }
}

/// Resolves plays against a pair of tables
#[derive(Clone, Copy)]
pub struct PlayEngine<'t> {
    outcomes: &'t dyn OutcomeProvider,
    times: &'t dyn TimeProvider,
}

impl<'t> PlayEngine<'t> {
    pub fn new(outcomes: &'t dyn OutcomeProvider, times: &'t dyn TimeProvider) -> Self {
        Self { outcomes, times }
    }

    /// Check that `submission` is legal right now without changing anything
    pub fn validate(&self, status: &GameStatus, rules: &RulesConfig, submission: &Submission) -> Result<()> {
        if status.is_ended() {
            return Err(GameError::GameOver);
        }
        if !status.waiting_action.takes_numbers() {
            return Err(GameError::NotExpected {
                expected: status.waiting_action,
                got: submission.play.action(),
            });
        }
        if submission.play.action() != status.waiting_action {
            return Err(GameError::WrongPlay { play: submission.play, expected: status.waiting_action });
        }
        if submission.side != status.possession {
            return Err(GameError::WrongSide { expected: status.possession, got: submission.side });
        }
        if submission.play == PlayType::KickoffOnside && status.no_onside_kick {
            return Err(GameError::OnsideNotAllowed);
        }
        if submission.play == PlayType::Pat && status.quarter >= rules.two_point_only_quarter {
            return Err(GameError::PatNotAllowed);
        }
        check_number(submission.number)?;
        if status.defense_number.is_none() {
            return Err(GameError::NoDefenseNumber);
        }
        Ok(())
    }

    /// Apply one offensive submission to `status`
    pub fn run_play(
        &self,
        status: &mut GameStatus,
        rules: &RulesConfig,
        facts: &GameFacts,
        submission: &Submission,
    ) -> Result<PlayReport> {
        self.validate(status, rules, submission)?;
        let mut turn = Turn::new(rules, facts, status);
        let summary = self.execute(&mut turn, submission)?;
        Ok(PlayReport { summary, events: turn.events })
    }

    fn execute(&self, turn: &mut Turn<'_>, submission: &Submission) -> Result<PlaySummary> {
        let defense_number = turn.status.defense_number.ok_or(GameError::NoDefenseNumber)?;
        let mut summary = turn.status.summary_for(submission.play);
        summary.offense_number = Some(submission.number);
        summary.offense_submitter = submission.submitter.clone();
        let offense = turn.offense();

        turn.forget_spent_timeouts();
        let runoff = turn.runoff(submission.time_option);
        let call = resolver::difference(submission.number, defense_number);

        let resolved = match turn.status.waiting_action {
            Action::Play => self.normal_play(turn, submission.play, call)?,
            Action::Conversion => self.conversion(turn, submission.play, call)?,
            Action::Kickoff => self.kickoff(turn, submission.play, call)?,
            other => {
                return Err(GameError::NotExpected { expected: other, got: submission.play.action() })
            }
        };

        let play_time = self.play_duration(turn.rules, submission.play, &resolved)?;
        tracing::debug!(
            play = %submission.play,
            result = %resolved.actual,
            yards = ?resolved.yards,
            difference = call,
            play_time,
            runoff,
            "play resolved"
        );

        summary.result = resolved.result;
        summary.actual_result = resolved.actual;
        summary.yards = resolved.yards;
        summary.play_time = play_time;
        summary.runoff_time = runoff;

        turn.status.stats_mut(offense).possession_seconds += play_time + runoff;
        if let Some(drive) = drive::record_play(turn.status, summary.clone()) {
            turn.events.push(GameEvent::DriveEnded(drive));
        }

        turn.status.time_runoff = !turn.status.is_overtime()
            && turn.status.waiting_action == Action::Play
            && resolved.actual.keeps_clock_running();
        turn.run_clock(play_time + runoff);
        turn.clear_timeout_requests();

        if turn.status.waiting_action.takes_numbers() {
            let action = turn.status.waiting_action;
            turn.status.await_numbers(action);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DefenseScheme, OffenseScheme};
    use crate::table::{OutcomeTable, TimeTable};

    fn facts() -> GameFacts {
        let playbook = Playbook { offense: OffenseScheme::Spread, defense: DefenseScheme::FourThree };
        GameFacts { playbooks: PerSide::new(playbook, playbook), deadline_passed: false, force_chew: false, coin_seed: 1 }
    }

    #[test]
    fn test_check_number() {
        assert_eq!(check_number(1), Ok(1));
        assert_eq!(check_number(1500), Ok(1500));
        assert_eq!(check_number(0), Err(GameError::NumberOutOfRange(0)));
        assert_eq!(check_number(1501), Err(GameError::NumberOutOfRange(1501)));
    }

    #[test]
    fn test_validation_refuses_without_mutation() {
        let outcomes = OutcomeTable::default();
        let times = TimeTable::default();
        let engine = PlayEngine::new(&outcomes, &times);
        let rules = RulesConfig::default();

        let mut status = GameStatus::new(rules.quarter_length, rules.timeouts_per_half);
        status.possession = Side::Home;
        status.location = 40;
        status.await_numbers(Action::Play);
        let before = status.clone();

        let err = engine
            .run_play(&mut status, &rules, &facts(), &Submission::new(Side::Home, PlayType::Run, 10))
            .unwrap_err();
        assert_eq!(err, GameError::NoDefenseNumber);

        status.defense_number = Some(10);
        let err = engine
            .run_play(&mut status, &rules, &facts(), &Submission::new(Side::Away, PlayType::Run, 10))
            .unwrap_err();
        assert_eq!(err, GameError::WrongSide { expected: Side::Home, got: Side::Away });

        let err = engine
            .run_play(&mut status, &rules, &facts(), &Submission::new(Side::Home, PlayType::Pat, 10))
            .unwrap_err();
        assert_eq!(err, GameError::WrongPlay { play: PlayType::Pat, expected: Action::Play });

        let err = engine
            .run_play(&mut status, &rules, &facts(), &Submission::new(Side::Home, PlayType::Run, 0))
            .unwrap_err();
        assert_eq!(err, GameError::NumberOutOfRange(0));

        status.defense_number = None;
        assert_eq!(status, before);
    }
}
