//! Playclock, hard deadline and the errored flag.

use super::Game;
use crate::engine::{GameEvent, Turn};
use crate::error::Result;
use crate::models::{Action, OvertimeSlot, Side};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What the scheduler should do about a game right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayclockCheck {
    Ok,
    /// Remind this side that time is running low
    Warn(Side),
    /// This side missed the playclock
    Expired(Side),
}

impl Game {
    /// Probe the playclock. A warning is handed out once per submission window.
    pub fn check_playclock(&mut self, now: DateTime<Utc>) -> PlayclockCheck {
        if self.errored || self.status.is_ended() {
            return PlayclockCheck::Ok;
        }
        let side = self.status.waiting_on;
        if now >= self.playclock {
            return PlayclockCheck::Expired(side);
        }
        let warn_at = self.playclock - Duration::hours(self.rules.playclock_warning_hours);
        if now >= warn_at && self.status.playclock_warning == 0 {
            self.status.playclock_warning += 1;
            self.dirty = true;
            return PlayclockCheck::Warn(side);
        }
        PlayclockCheck::Ok
    }

    /// Penalize whoever the game is waiting on if their playclock ran out
    pub fn enforce_playclock(&mut self, now: DateTime<Utc>) -> Result<Vec<GameEvent>> {
        match self.check_playclock(now) {
            PlayclockCheck::Expired(side) => self.penalize(side, now),
            PlayclockCheck::Ok | PlayclockCheck::Warn(_) => Ok(Vec::new()),
        }
    }

    /// Charge `side` with a playclock penalty
    pub fn penalize(&mut self, side: Side, now: DateTime<Utc>) -> Result<Vec<GameEvent>> {
        let _span = self.span().entered();
        self.ensure_active()?;
        warn!(side = %side, "playclock penalty");
        self.transition(now, |turn| {
            escalate(turn, side);
            Ok(())
        })
    }

    /// Flag the game after an unexpected failure
    pub fn set_errored(&mut self, now: DateTime<Utc>) {
        let _span = self.span().entered();
        if self.errored {
            return;
        }
        warn!("game flagged errored");
        self.errored = true;
        self.errored_at = Some(now);
        self.dirty = true;
    }

    /// Clear the flag, giving the waiting side back the time the outage took
    pub fn clear_errored(&mut self, now: DateTime<Utc>) {
        let _span = self.span().entered();
        if !self.errored {
            return;
        }
        if let Some(since) = self.errored_at.take() {
            let outage = now - since;
            if outage > Duration::zero() {
                self.playclock += outage;
            }
            info!(outage_seconds = outage.num_seconds(), "errored flag cleared");
        }
        self.errored = false;
        self.dirty = true;
    }

    /// Give everyone more time
    pub fn pause(&mut self, hours: i64) {
        let _span = self.span().entered();
        info!(hours, "playclock paused");
        self.playclock += Duration::hours(hours);
        self.dirty = true;
    }
}

/// Count the penalty; forfeit at the limit, otherwise give the other side
/// the forced score and hand the delinquent side the ball
fn escalate(turn: &mut Turn<'_>, delinquent: Side) {
    let beneficiary = delinquent.negate();
    let state = turn.status.state_mut(delinquent);
    state.playclock_penalties += 1;
    let count = state.playclock_penalties;
    turn.events.push(GameEvent::PlayclockPenalty { side: delinquent, count });

    if count >= turn.rules.max_playclock_penalties {
        warn!(side = %delinquent, count, "forfeit on playclock penalties");
        turn.finish(Some(beneficiary));
        return;
    }

    match turn.status.waiting_action {
        Action::Coin | Action::Defer | Action::OvertimeStart => {
            if turn.status.is_overtime() {
                turn.status.overtime_possession = Some(OvertimeSlot::First);
                turn.start_overtime_possession(beneficiary);
            } else {
                turn.status.receiving_next = delinquent;
                turn.kickoff_by(delinquent);
            }
        }
        Action::Play | Action::Conversion | Action::Kickoff => {
            turn.status.score(beneficiary, turn.rules.forced_score);
            if turn.status.is_overtime() {
                let possession = turn.status.possession;
                turn.overtime_turnover(possession);
            } else {
                turn.kickoff_by(beneficiary);
            }
        }
        Action::End => {}
    }
}
