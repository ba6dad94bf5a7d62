//! Externally supplied decision and time tables.
//!
//! The core only reads these through [`OutcomeProvider`] and [`TimeProvider`];
//! the concrete tables here are what the `table_builder` crate loads.

pub mod outcome;
pub mod range;
pub mod time;

pub use outcome::{
    DifferenceTable, Outcome, OutcomeKey, OutcomeProvider, OutcomeTable, OutcomeTableBuilder,
    PositionTable,
};
pub use range::{Bucket, BucketRange, RangeTable, DIFFERENCE_DOMAIN, POSITION_DOMAIN};
pub use time::{TimeEntry, TimeProvider, TimeTable};

use serde::{Deserialize, Serialize};

/// Both tables a play engine needs, as loaded together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBundle {
    pub outcomes: OutcomeTable,
    pub times: TimeTable,
}
