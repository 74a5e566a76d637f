//! Shift instances and the arena that owns them.
//!
//! Grouping swipes into shifts happens once per run. Every later stage
//! refers to an instance through its [`ShiftInstanceId`] instead of
//! regrouping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SwipeEvent;

/// The kind of duty a shift instance represents.
///
/// The declaration order is the order instances of the same employee and
/// date appear in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    /// Ordinary day shift.
    Day,
    /// Night shift crossing midnight.
    Night,
    /// Day shift worked on a rest day; the whole duty counts as overtime.
    RestDay,
    /// Day shift linked to the next by a half-hour break.
    HalfHourLinked,
    /// The shift label matched no known pattern. Never evaluated.
    Unknown,
}

impl ShiftType {
    /// Returns true for shift types the rule evaluator runs on.
    pub fn is_evaluated(self) -> bool {
        self != ShiftType::Unknown
    }
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftType::Day => write!(f, "day"),
            ShiftType::Night => write!(f, "night"),
            ShiftType::RestDay => write!(f, "rest_day"),
            ShiftType::HalfHourLinked => write!(f, "half_hour_linked"),
            ShiftType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Index of a shift instance inside a [`ShiftArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftInstanceId(pub usize);

/// One continuous duty period of one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInstance {
    /// Position in the owning arena.
    pub id: ShiftInstanceId,
    /// The employee on duty.
    pub employee_id: String,
    /// The date the shift is grouped under.
    pub anchor_date: NaiveDate,
    /// The kind of duty.
    pub shift_type: ShiftType,
    /// Swipes assigned to the shift, in time order.
    pub events: Vec<SwipeEvent>,
}

/// Owns every shift instance of a run, in report order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftArena {
    instances: Vec<ShiftInstance>,
}

impl ShiftArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance and returns its id.
    pub fn push(
        &mut self,
        employee_id: String,
        anchor_date: NaiveDate,
        shift_type: ShiftType,
        events: Vec<SwipeEvent>,
    ) -> ShiftInstanceId {
        let id = ShiftInstanceId(self.instances.len());
        self.instances.push(ShiftInstance {
            id,
            employee_id,
            anchor_date,
            shift_type,
            events,
        });
        id
    }

    /// Looks up an instance by id.
    pub fn get(&self, id: ShiftInstanceId) -> Option<&ShiftInstance> {
        self.instances.get(id.0)
    }

    /// Iterates over instances in report order.
    pub fn iter(&self) -> impl Iterator<Item = &ShiftInstance> {
        self.instances.iter()
    }

    /// Returns the number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true when the arena holds no instances.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
