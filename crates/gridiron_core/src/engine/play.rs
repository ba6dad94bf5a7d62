//! Normal plays, conversions and kickoffs.

use super::resolver::{outcome_key, resolve};
use super::{GameEvent, PlayEngine, Turn};
use crate::error::{GameError, Result};
use crate::models::{Action, PlayResult, PlayType, Side};
use crate::table::Outcome;
use tracing::debug;

/// What a play turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Resolved {
    /// Result from the outcome table; `None` for kneel and spike
    pub result: Option<PlayResult>,
    pub actual: PlayResult,
    pub yards: Option<i32>,
}

impl Resolved {
    fn called(outcome: Outcome, actual: PlayResult, yards: Option<i32>) -> Self {
        Self { result: Some(outcome.result), actual, yards }
    }
}

fn invalid(play: PlayType, outcome: Outcome) -> GameError {
    GameError::InvalidOutcome { play, result: outcome.result.to_string() }
}

impl PlayEngine<'_> {
    fn lookup(&self, turn: &Turn<'_>, play: PlayType, difference: u32) -> Result<Outcome> {
        let offense = turn.playbook(turn.offense()).offense;
        let defense = turn.playbook(turn.defense()).defense;
        let key = outcome_key(play, offense, defense, turn.status.location, difference);
        resolve(self.outcomes, &key)
    }

    pub(crate) fn normal_play(&self, turn: &mut Turn<'_>, play: PlayType, difference: u32) -> Result<Resolved> {
        match play {
            PlayType::Kneel => {
                let actual = turn.advance_down(0, PlayResult::Kneel);
                Ok(Resolved { result: None, actual, yards: Some(0) })
            }
            PlayType::Spike => {
                let actual = turn.advance_down(0, PlayResult::Spike);
                Ok(Resolved { result: None, actual, yards: Some(0) })
            }
            PlayType::Run | PlayType::Pass => {
                let outcome = self.lookup(turn, play, difference)?;
                turn.movement(play, outcome)
            }
            PlayType::Punt => {
                let outcome = self.lookup(turn, play, difference)?;
                turn.punt(outcome)
            }
            PlayType::FieldGoal => {
                let outcome = self.lookup(turn, play, difference)?;
                turn.field_goal(outcome)
            }
            PlayType::Pat
            | PlayType::TwoPoint
            | PlayType::KickoffNormal
            | PlayType::KickoffSquib
            | PlayType::KickoffOnside => Err(GameError::WrongPlay { play, expected: Action::Play }),
        }
    }

    pub(crate) fn conversion(&self, turn: &mut Turn<'_>, play: PlayType, difference: u32) -> Result<Resolved> {
        let outcome = self.lookup(turn, play, difference)?;
        let offense = turn.offense();
        match (play, outcome.result) {
            (PlayType::Pat, PlayResult::Pat) => turn.status.score(offense, 1),
            (PlayType::TwoPoint, PlayResult::TwoPoint) => turn.status.score(offense, 2),
            (PlayType::Pat | PlayType::TwoPoint, PlayResult::Miss) => {}
            (PlayType::Pat | PlayType::TwoPoint, PlayResult::TurnoverTouchdown) => {
                turn.status.score(offense.negate(), 2);
            }
            _ => return Err(invalid(play, outcome)),
        }
        turn.after_score(offense);
        Ok(Resolved::called(outcome, outcome.result, None))
    }

    pub(crate) fn kickoff(&self, turn: &mut Turn<'_>, play: PlayType, difference: u32) -> Result<Resolved> {
        if play.action() != Action::Kickoff {
            return Err(GameError::WrongPlay { play, expected: Action::Kickoff });
        }
        let outcome = self.lookup(turn, play, difference)?;
        let kicker = turn.offense();
        let receiver = kicker.negate();
        turn.status.no_onside_kick = false;

        match outcome.result {
            PlayResult::Kick => {
                let spot = outcome.yards.unwrap_or(turn.rules.kickoff_touchback_spot).clamp(1, 99);
                turn.take_over(receiver, spot);
            }
            PlayResult::Touchback => turn.take_over(receiver, turn.rules.kickoff_touchback_spot),
            PlayResult::Turnover => {
                let spot = outcome.yards.unwrap_or(turn.rules.kickoff_spot).clamp(1, 99);
                turn.take_over(kicker, 100 - spot);
            }
            PlayResult::Touchdown => turn.touchdown(receiver),
            PlayResult::TurnoverTouchdown => turn.touchdown(kicker),
            _ => return Err(invalid(play, outcome)),
        }
        Ok(Resolved::called(outcome, outcome.result, outcome.yards))
    }
}

impl Turn<'_> {
    /// Give `side` a first down at `location` (its own perspective)
    pub(crate) fn take_over(&mut self, side: Side, location: i32) {
        self.status.possession = side;
        self.status.location = location;
        self.status.reset_downs();
        self.status.waiting_action = Action::Play;
    }

    /// Six points and a conversion try for `side`
    pub(crate) fn touchdown(&mut self, side: Side) {
        debug!(side = %side, "touchdown");
        self.status.score(side, 6);
        self.status.possession = side;
        self.status.location = self.rules.conversion_spot;
        self.status.reset_downs();
        self.status.await_numbers(Action::Conversion);
    }

    /// The scored-on offense kicks from its own 20 with onside kicks barred
    pub(crate) fn safety(&mut self) {
        let offense = self.offense();
        debug!(side = %offense.negate(), "safety");
        self.status.score(offense.negate(), 2);
        if self.status.is_overtime() {
            self.overtime_turnover(offense);
            return;
        }
        self.status.location = self.rules.safety_kick_spot;
        self.status.reset_downs();
        self.status.no_onside_kick = true;
        self.status.await_numbers(Action::Kickoff);
    }

    /// Line `kicker` up for a kickoff from the usual spot. Onside kicks are
    /// open again.
    pub(crate) fn kickoff_by(&mut self, kicker: Side) {
        self.status.possession = kicker;
        self.status.no_onside_kick = false;
        self.status.location = self.rules.kickoff_spot;
        self.status.reset_downs();
        self.status.await_numbers(Action::Kickoff);
    }

    /// After a field goal or conversion the scorer kicks off, except in
    /// overtime where the possession simply ends
    pub(crate) fn after_score(&mut self, scorer: Side) {
        if self.status.is_overtime() {
            self.overtime_turnover(scorer);
        } else {
            self.kickoff_by(scorer);
        }
    }

    /// The defense scores on a return
    fn defensive_touchdown(&mut self) {
        let offense = self.offense();
        if self.status.is_overtime() {
            self.status.score(offense.negate(), 6);
            self.overtime_turnover(offense);
        } else {
            self.touchdown(offense.negate());
        }
    }

    /// Defense takes over at `spot` (offense's perspective)
    fn turnover_at(&mut self, spot: i32) {
        let offense = self.offense();
        if self.status.is_overtime() {
            self.overtime_turnover(offense);
            return;
        }
        self.status.location = spot;
        self.status.change_possession();
    }

    /// Count a down. Failing on fourth down gives the ball away.
    pub(crate) fn advance_down(&mut self, yards: i32, result: PlayResult) -> PlayResult {
        if yards >= self.status.yards_to_go {
            self.status.reset_downs();
            return result;
        }
        if self.status.down >= 4 {
            debug!(location = self.status.location, "turnover on downs");
            let location = self.status.location;
            self.turnover_at(location);
            return PlayResult::Turnover;
        }
        self.status.down += 1;
        self.status.yards_to_go -= yards;
        result
    }

    /// Move the ball, resolving touchdowns and safeties before anything persists
    pub(crate) fn apply_yardage(&mut self, play: PlayType, yards: i32) -> (PlayResult, i32) {
        let offense = self.offense();
        let location = self.status.location;
        let target = location + yards;

        if target >= 100 {
            let gained = 100 - location;
            self.status.stats_mut(offense).add_yards(play, gained);
            self.touchdown(offense);
            (PlayResult::Touchdown, gained)
        } else if target <= 0 {
            let lost = -location;
            self.status.stats_mut(offense).add_yards(play, lost);
            self.safety();
            (PlayResult::Safety, lost)
        } else {
            self.status.stats_mut(offense).add_yards(play, yards);
            self.status.location = target;
            (self.advance_down(yards, PlayResult::Gain), yards)
        }
    }

    fn movement(&mut self, play: PlayType, outcome: Outcome) -> Result<Resolved> {
        let offense = self.offense();
        match outcome.result {
            PlayResult::Gain => {
                let (actual, yards) = self.apply_yardage(play, outcome.yards.unwrap_or(0));
                Ok(Resolved::called(outcome, actual, Some(yards)))
            }
            PlayResult::Incomplete => {
                let actual = self.advance_down(0, PlayResult::Incomplete);
                Ok(Resolved::called(outcome, actual, Some(0)))
            }
            PlayResult::Touchdown => {
                let gained = 100 - self.status.location;
                self.status.stats_mut(offense).add_yards(play, gained);
                self.touchdown(offense);
                Ok(Resolved::called(outcome, PlayResult::Touchdown, Some(gained)))
            }
            PlayResult::Turnover => {
                self.status.stats_mut(offense).add_turnover(play);
                let yards = outcome.yards.unwrap_or(0);
                let spot = self.status.location + yards;
                if spot >= 100 {
                    // Taken away in the end zone
                    let touchback = self.rules.touchback_spot;
                    self.turnover_at(100 - touchback);
                } else if spot <= 0 {
                    self.defensive_touchdown();
                    return Ok(Resolved::called(outcome, PlayResult::TurnoverTouchdown, Some(yards)));
                } else {
                    self.status.stats_mut(offense).add_yards(play, yards);
                    self.turnover_at(spot);
                }
                Ok(Resolved::called(outcome, PlayResult::Turnover, Some(yards)))
            }
            PlayResult::TurnoverTouchdown => {
                self.status.stats_mut(offense).add_turnover(play);
                self.defensive_touchdown();
                Ok(Resolved::called(outcome, PlayResult::TurnoverTouchdown, outcome.yards))
            }
            _ => Err(invalid(play, outcome)),
        }
    }

    fn punt(&mut self, outcome: Outcome) -> Result<Resolved> {
        let offense = self.offense();
        let location = self.status.location;
        match outcome.result {
            PlayResult::Kick => {
                let yards = outcome.yards.unwrap_or(0);
                let spot = location + yards;
                if spot >= 100 {
                    let touchback = self.rules.touchback_spot;
                    self.turnover_at(100 - touchback);
                    Ok(Resolved::called(outcome, PlayResult::Touchback, Some(yards)))
                } else if spot <= 0 {
                    self.safety();
                    Ok(Resolved::called(outcome, PlayResult::Safety, Some(yards)))
                } else {
                    self.turnover_at(spot);
                    Ok(Resolved::called(outcome, PlayResult::Kick, Some(yards)))
                }
            }
            PlayResult::Touchback => {
                let touchback = self.rules.touchback_spot;
                self.turnover_at(100 - touchback);
                Ok(Resolved::called(outcome, PlayResult::Touchback, outcome.yards))
            }
            PlayResult::Turnover => {
                // Muffed by the receiver; the kicking team keeps the ball
                let yards = outcome.yards.unwrap_or(0);
                let spot = location + yards;
                if spot >= 100 {
                    self.touchdown(offense);
                    return Ok(Resolved::called(outcome, PlayResult::Touchdown, Some(100 - location)));
                }
                if self.status.is_overtime() {
                    self.overtime_turnover(offense);
                } else {
                    let spot = spot.max(1);
                    self.take_over(offense, spot);
                }
                Ok(Resolved::called(outcome, PlayResult::Turnover, Some(yards)))
            }
            PlayResult::TurnoverTouchdown => {
                self.defensive_touchdown();
                Ok(Resolved::called(outcome, PlayResult::TurnoverTouchdown, outcome.yards))
            }
            _ => Err(invalid(PlayType::Punt, outcome)),
        }
    }

    fn field_goal(&mut self, outcome: Outcome) -> Result<Resolved> {
        let offense = self.offense();
        match outcome.result {
            PlayResult::FieldGoal => {
                let stats = self.status.stats_mut(offense);
                stats.field_goals_attempted += 1;
                stats.field_goals_scored += 1;
                self.status.score(offense, 3);
                self.after_score(offense);
            }
            PlayResult::Miss => {
                self.status.stats_mut(offense).field_goals_attempted += 1;
                let location = self.status.location;
                self.turnover_at(location);
            }
            PlayResult::TurnoverTouchdown => {
                self.status.stats_mut(offense).field_goals_attempted += 1;
                self.defensive_touchdown();
            }
            _ => return Err(invalid(PlayType::FieldGoal, outcome)),
        }
        Ok(Resolved::called(outcome, outcome.result, outcome.yards))
    }

    pub(crate) fn finish(&mut self, winner: Option<Side>) {
        self.status.end_game(winner);
        self.events.push(GameEvent::GameOver { winner });
    }
}
