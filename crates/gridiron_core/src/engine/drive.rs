//! Drive bookkeeping.
//!
//! `GameStatus::plays` holds one group per drive, the last group being the
//! open one. Kickoffs and conversions land in whatever group is open but
//! only normal plays count toward a drive's summary.

use super::{GameEvent, Turn};
use crate::models::{Action, DriveSummary, GameStatus, PlayResult, PlaySummary, PlayType};

/// Append a play to the open drive, closing it if the play ended the drive
pub(crate) fn record_play(status: &mut GameStatus, summary: PlaySummary) -> Option<DriveSummary> {
    let closes = summary.play.action() == Action::Play && summary.actual_result.ends_drive();
    let result = summary.actual_result;
    match status.plays.last_mut() {
        Some(open) => open.push(summary),
        None => status.plays.push(vec![summary]),
    }
    if closes {
        close_drive(status, result)
    } else {
        None
    }
}

/// Close the open drive with `result`; nothing happens if it has no normal plays yet
pub(crate) fn close_drive(status: &mut GameStatus, result: PlayResult) -> Option<DriveSummary> {
    let open = status.plays.last()?;
    let possession = open.iter().find(|p| p.play.action() == Action::Play)?.possession;

    let drive_plays = open
        .iter()
        .filter(|p| p.play.action() == Action::Play && p.possession == possession);
    let mut yards = 0;
    let mut seconds = 0;
    for play in drive_plays {
        seconds += play.play_time + play.runoff_time;
        if gains_ground(play.play) {
            yards += play.yards.unwrap_or(0);
        }
    }

    let drive = DriveSummary { possession, yards, seconds, result };
    status.drives.push(drive.clone());
    status.plays.push(Vec::new());
    Some(drive)
}

/// Kicks move the ball but are not yards gained by the drive
fn gains_ground(play: PlayType) -> bool {
    match play {
        PlayType::Run | PlayType::Pass | PlayType::Kneel | PlayType::Spike => true,
        PlayType::Punt
        | PlayType::FieldGoal
        | PlayType::Pat
        | PlayType::TwoPoint
        | PlayType::KickoffNormal
        | PlayType::KickoffSquib
        | PlayType::KickoffOnside => false,
    }
}

impl Turn<'_> {
    pub(crate) fn end_drive(&mut self, result: PlayResult) {
        if let Some(drive) = close_drive(self.status, result) {
            self.events.push(GameEvent::DriveEnded(drive));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;

    fn play(status: &GameStatus, play: PlayType, actual: PlayResult, yards: i32, seconds: u32) -> PlaySummary {
        let mut summary = status.summary_for(play);
        summary.actual_result = actual;
        summary.yards = Some(yards);
        summary.play_time = seconds;
        summary.runoff_time = 10;
        summary
    }

    #[test]
    fn test_drive_closes_on_touchdown() {
        let mut status = GameStatus::new(420, 3);
        status.possession = Side::Away;

        let kickoff = play(&status, PlayType::KickoffNormal, PlayResult::Kick, 25, 5);
        assert_eq!(record_play(&mut status, kickoff), None);
        status.possession = Side::Home;
        let run = play(&status, PlayType::Run, PlayResult::Gain, 12, 6);
        assert_eq!(record_play(&mut status, run), None);
        let pass = play(&status, PlayType::Pass, PlayResult::Touchdown, 63, 8);
        let drive = record_play(&mut status, pass).unwrap();

        assert_eq!(
            drive,
            DriveSummary { possession: Side::Home, yards: 75, seconds: 34, result: PlayResult::Touchdown }
        );
        assert_eq!(status.plays.len(), 2);
        assert_eq!(status.plays[0].len(), 3);
        assert!(status.plays[1].is_empty());
    }

    #[test]
    fn test_punt_yards_not_counted() {
        let mut status = GameStatus::new(420, 3);
        let run = play(&status, PlayType::Run, PlayResult::Gain, 4, 5);
        record_play(&mut status, run);
        let punt = play(&status, PlayType::Punt, PlayResult::Kick, 45, 7);
        let drive = record_play(&mut status, punt).unwrap();
        assert_eq!(drive.yards, 4);
        assert_eq!(drive.result, PlayResult::Kick);
    }

    #[test]
    fn test_conversion_does_not_close() {
        let mut status = GameStatus::new(420, 3);
        let pat = play(&status, PlayType::Pat, PlayResult::Miss, 0, 0);
        assert_eq!(record_play(&mut status, pat), None);
        assert_eq!(close_drive(&mut status, PlayResult::EndHalf), None);
        assert_eq!(status.plays.len(), 1);
    }
}
