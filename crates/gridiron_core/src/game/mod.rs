//! # Game Aggregate
//!
//! A [`Game`] owns everything about one matchup: the two teams, the rules it
//! is played under, the live [`GameStatus`], a short history for reverts and
//! the per-play deadline.
//!
//! Every mutating entry point enters a `game` tracing span carrying the game
//! id, runs against a copy of the status and commits only on success, so a
//! refused or failed operation never leaves a half-applied play behind.
//!
//! ```rust
//! use gridiron_core::game::Game;
//! use gridiron_core::config::RulesConfig;
//! use gridiron_core::models::{DefenseScheme, OffenseScheme, Playbook, Side, Team, Action};
//!
//! let playbook = Playbook { offense: OffenseScheme::Spread, defense: DefenseScheme::FourThree };
//! let home = Team::new("home", "Home U", playbook);
//! let away = Team::new("away", "Away State", playbook);
//! let mut game = Game::new(home, away, RulesConfig::default(), chrono::Utc::now());
//!
//! assert_eq!(game.status.waiting_action, Action::Coin);
//! let now = chrono::Utc::now();
//! let won = game.coin_toss(Side::Away, true, now).unwrap();
//! let winner = if won { Side::Away } else { Side::Home };
//! game.coin_decision(winner, false, now).unwrap();
//! assert_eq!(game.status.waiting_action, Action::Kickoff);
//! ```

pub mod deadline;
pub mod history;
pub mod input;

pub use deadline::PlayclockCheck;
pub use history::StatusHistory;
pub use input::{parse_coin_call, parse_defer, parse_number, parse_play};

use crate::config::RulesConfig;
use crate::engine::coin::next_flip;
use crate::engine::{check_number, GameEvent, GameFacts, PlayEngine, PlayReport, Submission, Turn};
use crate::error::{GameError, Result};
use crate::models::{Action, GameStatus, OvertimeSlot, PerSide, Side, Team, TimeoutRequest};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub home: Team,
    pub away: Team,
    pub rules: RulesConfig,
    pub status: GameStatus,
    history: StatusHistory,

    /// Changed since the last save
    pub dirty: bool,
    pub errored: bool,
    pub errored_at: Option<DateTime<Utc>>,
    /// When the side being waited on runs out of time
    pub playclock: DateTime<Utc>,
    /// After this, a tied game goes to time-forced overtime
    pub deadline: DateTime<Utc>,
    pub force_chew: bool,
    pub coin_seed: u64,

    pub start_time: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub station: Option<String>,
}

impl Game {
    pub fn new(home: Team, away: Team, rules: RulesConfig, now: DateTime<Utc>) -> Self {
        let id = Uuid::new_v4();
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&id.as_bytes()[..8]);

        let status = GameStatus::new(rules.quarter_length, rules.timeouts_per_half);
        let history = StatusHistory::new(rules.history_cap);
        let playclock = now + Duration::hours(rules.playclock_hours);
        let deadline = now + Duration::days(rules.game_deadline_days);

        info!(id = %id, home = %home.tag, away = %away.tag, "new game");
        Self {
            id,
            home,
            away,
            rules,
            status,
            history,
            dirty: true,
            errored: false,
            errored_at: None,
            playclock,
            deadline,
            force_chew: false,
            coin_seed: u64::from_le_bytes(seed),
            start_time: None,
            venue: None,
            station: None,
        }
    }

    /// Replace the random coin seed, for reproducible games
    pub fn with_coin_seed(mut self, seed: u64) -> Self {
        self.coin_seed = seed;
        self
    }

    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("game", id = %self.id)
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    pub fn history(&self) -> &StatusHistory {
        &self.history
    }

    pub fn winner(&self) -> Option<Side> {
        self.status.winner
    }

    pub fn is_ended(&self) -> bool {
        self.status.is_ended()
    }

    pub fn facts(&self, now: DateTime<Utc>) -> GameFacts {
        GameFacts {
            playbooks: PerSide::new(self.home.playbook, self.away.playbook),
            deadline_passed: now > self.deadline,
            force_chew: self.force_chew,
            coin_seed: self.coin_seed,
        }
    }

    fn ensure_active(&self) -> Result<()> {
        if self.errored {
            return Err(GameError::Errored);
        }
        if self.status.is_ended() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    fn ensure_waiting(&self, expected: Action, side: Side) -> Result<()> {
        if self.status.waiting_action != expected {
            return Err(GameError::NotExpected { expected: self.status.waiting_action, got: expected });
        }
        if self.status.waiting_on != side {
            return Err(GameError::WrongSide { expected: self.status.waiting_on, got: side });
        }
        Ok(())
    }

    pub(crate) fn reset_playclock(&mut self, now: DateTime<Utc>) {
        self.playclock = now + Duration::hours(self.rules.playclock_hours);
        self.status.playclock_warning = 0;
    }

    /// Keep the old status in history and take the new one
    fn commit(&mut self, status: GameStatus, now: DateTime<Utc>) {
        let previous = std::mem::replace(&mut self.status, status);
        self.history.push(previous);
        self.dirty = true;
        self.reset_playclock(now);
    }

    /// Run `apply` against a copy of the status and commit it if it succeeds
    pub(crate) fn transition<F>(&mut self, now: DateTime<Utc>, apply: F) -> Result<Vec<GameEvent>>
    where
        F: FnOnce(&mut Turn<'_>) -> Result<()>,
    {
        let facts = self.facts(now);
        let mut status = self.status.clone();
        let events = {
            let mut turn = Turn::new(&self.rules, &facts, &mut status);
            apply(&mut turn)?;
            turn.events
        };
        self.commit(status, now);
        Ok(events)
    }

    /// Call a coin toss. Returns whether `side` won it.
    pub fn coin_toss(&mut self, side: Side, heads: bool, now: DateTime<Utc>) -> Result<bool> {
        let _span = self.span().entered();
        self.ensure_active()?;
        let expected = match self.status.waiting_action {
            Action::Coin | Action::OvertimeStart => self.status.waiting_action,
            _ => Action::Coin,
        };
        self.ensure_waiting(expected, side)?;

        let mut status = self.status.clone();
        let flip = next_flip(&mut status, self.coin_seed);
        let won = flip == heads;
        let winner = if won { side } else { side.negate() };
        status.waiting_action = Action::Defer;
        status.waiting_on = winner;
        info!(caller = %side, heads, flip, winner = %winner, "coin toss");

        self.commit(status, now);
        Ok(won)
    }

    /// The toss winner elects to receive or defer
    pub fn coin_decision(&mut self, side: Side, defer: bool, now: DateTime<Utc>) -> Result<Vec<GameEvent>> {
        let _span = self.span().entered();
        self.ensure_active()?;
        self.ensure_waiting(Action::Defer, side)?;
        info!(side = %side, defer, "coin decision");

        self.transition(now, |turn| {
            if turn.status.is_overtime() {
                let offense = if defer { side.negate() } else { side };
                turn.status.overtime_possession = Some(OvertimeSlot::First);
                turn.start_overtime_possession(offense);
            } else {
                // Whoever kicks now receives after halftime
                let kicker = if defer { side } else { side.negate() };
                turn.status.receiving_next = kicker;
                turn.kickoff_by(kicker);
            }
            Ok(())
        })
    }

    /// The defense commits its number first
    pub fn submit_defense(
        &mut self,
        side: Side,
        number: u32,
        submitter: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let _span = self.span().entered();
        self.ensure_active()?;
        if !self.status.waiting_action.takes_numbers() {
            return Err(GameError::NotExpected { expected: self.status.waiting_action, got: Action::Play });
        }
        let defense = self.status.possession.negate();
        if side != defense || self.status.defense_number.is_some() {
            return Err(GameError::WrongSide { expected: self.status.waiting_on, got: side });
        }
        let number = check_number(number)?;

        self.status.defense_number = Some(number);
        self.status.defense_submitter = submitter;
        self.status.waiting_on = self.status.possession;
        self.dirty = true;
        self.reset_playclock(now);
        info!(side = %side, "defense number submitted");
        Ok(())
    }

    /// The offense's call resolves the play
    pub fn submit_offense(
        &mut self,
        engine: &PlayEngine<'_>,
        submission: Submission,
        now: DateTime<Utc>,
    ) -> Result<PlayReport> {
        let _span = self.span().entered();
        self.ensure_active()?;

        let facts = self.facts(now);
        let mut status = self.status.clone();
        let report = match engine.run_play(&mut status, &self.rules, &facts, &submission) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), play = %submission.play, "play refused");
                return Err(e);
            }
        };

        info!(
            play = %submission.play,
            result = %report.summary.actual_result,
            home = status.points(Side::Home),
            away = status.points(Side::Away),
            "play complete"
        );
        self.commit(status, now);
        Ok(report)
    }

    pub fn request_timeout(&mut self, side: Side) -> Result<()> {
        let _span = self.span().entered();
        self.ensure_active()?;
        let waiting = self.status.waiting_action;
        if !waiting.takes_numbers() {
            return Err(GameError::NotExpected { expected: waiting, got: Action::Play });
        }
        let state = self.status.state_mut(side);
        if state.timeouts == 0 {
            return Err(GameError::NoTimeouts(side));
        }
        state.requested_timeout = TimeoutRequest::Requested;
        self.dirty = true;
        info!(side = %side, "timeout requested");
        Ok(())
    }

    /// Go back to the status `index` transitions ago, 0 being the last one
    pub fn revert(&mut self, index: usize) -> Result<()> {
        let _span = self.span().entered();
        let status = self.history.restore(index).ok_or(GameError::NoHistory(index))?;
        info!(index, "reverted");
        self.status = status;
        self.dirty = true;
        Ok(())
    }

    /// End the game with no winner
    pub fn abandon(&mut self) {
        let _span = self.span().entered();
        warn!("game abandoned");
        let mut status = self.status.clone();
        status.end_game(None);
        self.history.push(std::mem::replace(&mut self.status, status));
        self.dirty = true;
    }
}
