//! Overtime protocol.
//!
//! Each period gives both sides one possession from the same spot. The
//! `overtime_possession` slot on the status says which of the two is live.
//! Scores do not lead to kickoffs here; every drive-ending result funnels
//! into [`Turn::overtime_turnover`].

use super::coin::next_flip;
use super::{GameEvent, Turn};
use crate::models::{Action, OvertimeSlot, QuarterType, Side};
use tracing::info;

impl Turn<'_> {
    /// Regulation ended tied
    pub(crate) fn start_overtime(&mut self) {
        let time_forced = self.facts.deadline_passed;
        info!(time_forced, "regulation ended tied, starting overtime");

        self.status.quarter = 5;
        self.status.clock = 0;
        self.status.quarter_type =
            if time_forced { QuarterType::OvertimeTime } else { QuarterType::OvertimeSudden };
        self.status.overtime_possession = None;
        self.status.time_runoff = false;
        self.status.waiting_action = Action::OvertimeStart;
        self.status.waiting_on = Side::Away;
        self.status.defense_number = None;
        self.status.defense_submitter = None;
        self.events.push(GameEvent::OvertimeStarted { time_forced });
    }

    /// First possession of a period for `offense`
    pub(crate) fn start_overtime_possession(&mut self, offense: Side) {
        self.status.possession = offense;
        self.status.location = self.rules.overtime_spot;
        self.status.reset_downs();
        self.status.time_runoff = false;
        self.status.await_numbers(Action::Play);
    }

    /// The possession of `ended` is over, by score, turnover or downs
    pub(crate) fn overtime_turnover(&mut self, ended: Side) {
        match self.status.overtime_possession {
            None | Some(OvertimeSlot::First) => {
                self.status.overtime_possession = Some(OvertimeSlot::Second);
                self.start_overtime_possession(ended.negate());
            }
            Some(OvertimeSlot::Second) => self.end_overtime_period(ended),
        }
    }

    fn end_overtime_period(&mut self, second: Side) {
        if let Some(winner) = self.status.leader() {
            self.finish(Some(winner));
            return;
        }

        let periods = self.status.quarter.saturating_sub(4);
        if self.status.quarter_type == QuarterType::OvertimeTime
            && periods >= self.rules.time_forced_overtime_periods
        {
            let heads = next_flip(self.status, self.facts.coin_seed);
            let winner = Side::from_is_home(heads);
            info!(winner = %winner, periods, "overtime decided by coin");
            self.events.push(GameEvent::CoinDecided { winner });
            self.finish(Some(winner));
            return;
        }

        self.status.quarter += 1;
        self.status.overtime_possession = Some(OvertimeSlot::First);
        info!(quarter = self.status.quarter, "new overtime period");
        self.events.push(GameEvent::OvertimePeriod(self.status.quarter));
        self.start_overtime_possession(second);
    }
}
