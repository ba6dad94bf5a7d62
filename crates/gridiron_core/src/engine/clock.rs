//! Game clock: runoff, timeouts, play durations and quarter boundaries.

use super::play::Resolved;
use super::{GameEvent, PlayEngine, Turn};
use crate::config::RulesConfig;
use crate::error::{GameError, Result};
use crate::models::{Action, PlayResult, PlayType, Side, TimeOption, TimeoutRequest};
use tracing::{debug, info};

impl Turn<'_> {
    /// Seconds burned before the snap.
    ///
    /// Only paid when the previous play left the clock running. A pending
    /// timeout request (defense first) is spent instead of the runoff.
    pub(crate) fn runoff(&mut self, option: TimeOption) -> u32 {
        if !self.status.time_runoff || self.status.is_overtime() {
            return 0;
        }

        for side in [self.defense(), self.offense()] {
            if self.spend_timeout(side) {
                return 0;
            }
        }

        let option = match option {
            TimeOption::Normal if self.facts.force_chew => TimeOption::Chew,
            other => other,
        };
        self.rules.runoff_seconds(option, self.status.clock).min(self.status.clock)
    }

    fn spend_timeout(&mut self, side: Side) -> bool {
        let state = self.status.state_mut(side);
        if state.requested_timeout != TimeoutRequest::Requested || state.timeouts == 0 {
            return false;
        }
        state.timeouts -= 1;
        state.requested_timeout = TimeoutRequest::Used;
        let remaining = state.timeouts;
        debug!(side = %side, remaining, "timeout used");
        self.events.push(GameEvent::TimeoutUsed(side));
        true
    }

    /// Requests that were not spent on this play do not carry over
    pub(crate) fn clear_timeout_requests(&mut self) {
        for side in [Side::Home, Side::Away] {
            let state = self.status.state_mut(side);
            if state.requested_timeout == TimeoutRequest::Requested {
                state.requested_timeout = TimeoutRequest::None;
            }
        }
    }

    /// A timeout stays `Used` until the next snap
    pub(crate) fn forget_spent_timeouts(&mut self) {
        for side in [Side::Home, Side::Away] {
            let state = self.status.state_mut(side);
            if state.requested_timeout == TimeoutRequest::Used {
                state.requested_timeout = TimeoutRequest::None;
            }
        }
    }

    /// Take `seconds` off the quarter clock and handle the quarter ending.
    ///
    /// A touchdown that empties the clock still gets its conversion; the
    /// quarter ends after it.
    pub(crate) fn run_clock(&mut self, seconds: u32) {
        if self.status.is_overtime() || self.status.is_ended() {
            return;
        }
        self.status.clock = self.status.clock.saturating_sub(seconds);
        if self.status.clock == 0 && self.status.waiting_action != Action::Conversion {
            self.end_of_quarter();
        }
    }

    pub(crate) fn end_of_quarter(&mut self) {
        let quarter = self.status.quarter;
        info!(quarter, "end of quarter");
        self.status.time_runoff = false;

        match quarter {
            1 | 3 => {
                self.status.quarter += 1;
                self.status.clock = self.rules.quarter_length;
                self.events.push(GameEvent::EndOfQuarter(quarter));
            }
            2 => {
                self.end_drive(PlayResult::EndHalf);
                self.status.quarter = 3;
                self.status.clock = self.rules.quarter_length;
                for side in [Side::Home, Side::Away] {
                    self.status.state_mut(side).timeouts = self.rules.timeouts_per_half;
                }
                let kicker = self.status.receiving_next.negate();
                self.kickoff_by(kicker);
                self.events.push(GameEvent::Halftime);
            }
            _ => {
                self.end_drive(PlayResult::EndHalf);
                self.events.push(GameEvent::EndOfQuarter(quarter));
                match self.status.leader() {
                    Some(winner) => self.finish(Some(winner)),
                    None => self.start_overtime(),
                }
            }
        }
    }
}

impl PlayEngine<'_> {
    /// In-play seconds for a resolved play.
    ///
    /// Looked up by the actual result first, then by the result the outcome
    /// table returned, since reclassified results (a gain into the end zone)
    /// are not always tabulated.
    pub(crate) fn play_duration(&self, rules: &RulesConfig, play: PlayType, resolved: &Resolved) -> Result<u32> {
        match play {
            PlayType::Spike => return Ok(rules.durations.spike),
            PlayType::Kneel => return Ok(rules.durations.kneel),
            PlayType::Pat => return Ok(rules.durations.pat),
            PlayType::TwoPoint => return Ok(rules.durations.two_point),
            PlayType::Run
            | PlayType::Pass
            | PlayType::Punt
            | PlayType::FieldGoal
            | PlayType::KickoffNormal
            | PlayType::KickoffSquib
            | PlayType::KickoffOnside => {}
        }

        self.times
            .play_seconds(play, resolved.actual, resolved.yards)
            .or_else(|| {
                resolved
                    .result
                    .and_then(|called| self.times.play_seconds(play, called, resolved.yards))
            })
            .ok_or_else(|| GameError::MissingPlayTime { play, result: resolved.actual.to_string() })
    }
}
