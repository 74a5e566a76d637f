//! Anomaly records produced by the rule evaluator.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ShiftInstanceId;

/// The rule that raised an anomaly.
///
/// Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyCategory {
    /// Swipes of both directions within one burst window.
    AmbiguousDirectionBurst,
    /// First entry after the late deadline.
    LateArrival,
    /// Last exit before the nominal end of work.
    EarlyDeparture,
    /// An outing inside the working window longer than the limit.
    ExcessOuting,
    /// Two entries with no exit between them.
    UnpairedEntry,
    /// Two exits with no entry between them.
    UnpairedExit,
    /// The shift starts with an exit.
    LeadingExit,
    /// The shift ends with an entry.
    TrailingEntry,
    /// Left after work and did not return before authorized overtime.
    PreOvertimeOutingNotReturned,
    /// No entry between the end of work and the start of authorized overtime.
    OvertimeNotEntered,
    /// Realized overtime below the required hours.
    InsufficientOvertime,
}

impl std::fmt::Display for AnomalyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AnomalyCategory::AmbiguousDirectionBurst => "ambiguous direction burst",
            AnomalyCategory::LateArrival => "late arrival",
            AnomalyCategory::EarlyDeparture => "early departure",
            AnomalyCategory::ExcessOuting => "excess outing",
            AnomalyCategory::UnpairedEntry => "unpaired entry",
            AnomalyCategory::UnpairedExit => "unpaired exit",
            AnomalyCategory::LeadingExit => "leading exit",
            AnomalyCategory::TrailingEntry => "trailing entry",
            AnomalyCategory::PreOvertimeOutingNotReturned => "outing before overtime not returned",
            AnomalyCategory::OvertimeNotEntered => "overtime not entered",
            AnomalyCategory::InsufficientOvertime => "insufficient overtime",
        };
        write!(f, "{}", label)
    }
}

/// Values supporting an anomaly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// The swipes the anomaly refers to, in time order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timestamps: Vec<NaiveDateTime>,
    /// A measured interval in whole minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    /// Realized overtime, rounded to two places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realized_overtime_hours: Option<Decimal>,
    /// Overtime the shift was required to show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_overtime_hours: Option<Decimal>,
}

impl Evidence {
    /// Evidence consisting of swipe timestamps only.
    pub fn swipes(timestamps: impl IntoIterator<Item = NaiveDateTime>) -> Self {
        Self {
            timestamps: timestamps.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// One anomaly raised against one shift instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// The shift instance the anomaly belongs to.
    pub shift: ShiftInstanceId,
    /// The employee on duty.
    pub employee_id: String,
    /// The shift's anchor date.
    pub anchor_date: NaiveDate,
    /// The rule that fired.
    pub category: AnomalyCategory,
    /// Human-readable description.
    pub description: String,
    /// Supporting values.
    pub evidence: Evidence,
}
