pub mod play;
pub mod side;
pub mod status;
pub mod summary;
pub mod team;

pub use play::{Action, PlayResult, PlayType, QuarterType, TimeOption, TimeoutRequest};
pub use side::{PerSide, Side};
pub use status::{GameStatus, OvertimeSlot, FIRST_DOWN_DISTANCE};
pub use summary::{DriveSummary, PlaySummary};
pub use team::{DefenseScheme, OffenseScheme, Playbook, Team, TeamState, TeamStats};
