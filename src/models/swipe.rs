//! Swipe event model.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The direction of a badge swipe.
///
/// `Unknown` swipes keep their place in the time order but never satisfy a
/// directional rule predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Entering the premises.
    In,
    /// Leaving the premises.
    Out,
    /// The device label carried no usable direction marker.
    Unknown,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
            Direction::Unknown => write!(f, "unknown"),
        }
    }
}

/// A normalized badge swipe. Never mutated after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeEvent {
    /// The employee who swiped.
    pub employee_id: String,
    /// When the swipe happened.
    pub timestamp: NaiveDateTime,
    /// The direction derived from the device label.
    pub direction: Direction,
    /// The device label as it appeared in the source row.
    pub raw_source_tag: String,
    /// The shift label declared on the source row.
    pub shift_label: String,
    /// Index of the source row in the input table.
    pub source_row: usize,
}

impl SwipeEvent {
    /// Returns the time of day of the swipe.
    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// Returns true for entry swipes.
    pub fn is_in(&self) -> bool {
        self.direction == Direction::In
    }

    /// Returns true for exit swipes.
    pub fn is_out(&self) -> bool {
        self.direction == Direction::Out
    }
}
