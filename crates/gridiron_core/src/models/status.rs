use super::play::{Action, PlayResult, PlayType, QuarterType};
use super::side::{PerSide, Side};
use super::summary::{DriveSummary, PlaySummary};
use super::team::{TeamState, TeamStats};
use serde::{Deserialize, Serialize};

pub const FIRST_DOWN_DISTANCE: i32 = 10;

/// Which of the two guaranteed possessions of an overtime period is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OvertimeSlot {
    First,
    Second,
}

/// The live, mutable state of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    /// Seconds left in the current quarter
    pub clock: u32,
    /// 1-4 regulation, 5+ overtime periods
    pub quarter: u32,
    pub quarter_type: QuarterType,
    /// Yards from the offense's own goal line
    pub location: i32,
    pub possession: Side,
    pub down: u32,
    pub yards_to_go: i32,

    pub waiting_action: Action,
    pub waiting_on: Side,
    pub defense_number: Option<u32>,
    pub defense_submitter: Option<String>,

    pub receiving_next: Side,
    pub overtime_possession: Option<OvertimeSlot>,
    pub no_onside_kick: bool,
    /// The clock kept running after the last play, so the next snap pays runoff
    pub time_runoff: bool,
    /// Number of coin tosses resolved so far, used to salt the coin RNG
    pub coin_tosses: u32,
    pub playclock_warning: u32,

    pub state: PerSide<TeamState>,
    pub stats: PerSide<TeamStats>,

    /// Plays grouped by drive; the last group is the open drive
    pub plays: Vec<Vec<PlaySummary>>,
    pub drives: Vec<DriveSummary>,
    pub winner: Option<Side>,
}

impl GameStatus {
    pub fn new(quarter_length: u32, timeouts: u32) -> Self {
        Self {
            clock: quarter_length,
            quarter: 1,
            quarter_type: QuarterType::Normal,
            location: -1,
            possession: Side::Home,
            down: 1,
            yards_to_go: FIRST_DOWN_DISTANCE,
            waiting_action: Action::Coin,
            waiting_on: Side::Away,
            defense_number: None,
            defense_submitter: None,
            receiving_next: Side::Home,
            overtime_possession: None,
            no_onside_kick: false,
            time_runoff: false,
            coin_tosses: 0,
            playclock_warning: 0,
            state: PerSide::new(TeamState::new(timeouts), TeamState::new(timeouts)),
            stats: PerSide::default(),
            plays: vec![Vec::new()],
            drives: Vec::new(),
            winner: None,
        }
    }

    pub fn state(&self, side: Side) -> &TeamState {
        self.state.get(side)
    }

    pub fn state_mut(&mut self, side: Side) -> &mut TeamState {
        self.state.get_mut(side)
    }

    pub fn stats(&self, side: Side) -> &TeamStats {
        self.stats.get(side)
    }

    pub fn stats_mut(&mut self, side: Side) -> &mut TeamStats {
        self.stats.get_mut(side)
    }

    pub fn points(&self, side: Side) -> u32 {
        self.state(side).points
    }

    /// The side ahead on points, `None` when tied
    pub fn leader(&self) -> Option<Side> {
        let home = self.points(Side::Home);
        let away = self.points(Side::Away);
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_overtime(&self) -> bool {
        self.quarter_type.is_overtime()
    }

    pub fn is_ended(&self) -> bool {
        self.waiting_action == Action::End
    }

    pub fn score(&mut self, side: Side, points: u32) {
        let quarter = self.quarter;
        self.state_mut(side).add_points(points, quarter);
    }

    pub fn reset_downs(&mut self) {
        self.down = 1;
        self.yards_to_go = FIRST_DOWN_DISTANCE;
    }

    /// Hand the ball to the other side at the mirrored spot
    pub fn change_possession(&mut self) {
        self.possession.reverse();
        self.location = 100 - self.location;
        self.reset_downs();
    }

    /// Wait for the defense to commit its number for `action`
    pub fn await_numbers(&mut self, action: Action) {
        self.waiting_action = action;
        self.waiting_on = self.possession.negate();
        self.defense_number = None;
        self.defense_submitter = None;
    }

    pub fn end_game(&mut self, winner: Option<Side>) {
        self.quarter_type = QuarterType::End;
        self.waiting_action = Action::End;
        self.defense_number = None;
        self.defense_submitter = None;
        self.winner = winner;
    }

    /// Snapshot of the pre-play status, completed by the engine once the play resolves
    pub fn summary_for(&self, play: PlayType) -> PlaySummary {
        PlaySummary {
            home_score: self.points(Side::Home),
            away_score: self.points(Side::Away),
            quarter: self.quarter,
            clock: self.clock,
            location: self.location,
            possession: self.possession,
            down: self.down,
            yards_to_go: self.yards_to_go,
            play,
            defense_number: self.defense_number,
            offense_number: None,
            defense_submitter: self.defense_submitter.clone(),
            offense_submitter: None,
            result: None,
            actual_result: PlayResult::Gain,
            yards: None,
            play_time: 0,
            runoff_time: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_status_waits_on_away_coin() {
        let status = GameStatus::new(420, 3);
        assert_eq!(status.waiting_action, Action::Coin);
        assert_eq!(status.waiting_on, Side::Away);
        assert_eq!(status.clock, 420);
        assert_eq!(status.state(Side::Home).timeouts, 3);
        assert_eq!(status.plays.len(), 1);
    }

    #[test]
    fn test_change_possession_mirrors_location() {
        let mut status = GameStatus::new(420, 3);
        status.location = 30;
        status.down = 3;
        status.yards_to_go = 4;
        status.change_possession();
        assert_eq!(status.possession, Side::Away);
        assert_eq!(status.location, 70);
        assert_eq!((status.down, status.yards_to_go), (1, FIRST_DOWN_DISTANCE));
    }

    #[test]
    fn test_leader() {
        let mut status = GameStatus::new(420, 3);
        assert_eq!(status.leader(), None);
        status.score(Side::Away, 3);
        assert_eq!(status.leader(), Some(Side::Away));
    }
}
