//! The anomaly report returned by an audit run.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AnomalyRecord, ShiftType};

/// Marker column of report rows. Only anomalous shifts produce rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyFlag {
    /// The row belongs to a shift with at least one anomaly.
    Yes,
}

/// One retained swipe of an anomalous shift.
///
/// Rows of one (employee, anchor date) group are contiguous so a
/// presentation layer can merge the description cells of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Employee number.
    pub employee_id: String,
    /// Employee name.
    pub name: String,
    /// Department, when the input carried one.
    pub department: Option<String>,
    /// Calendar date of the swipe.
    pub swipe_date: NaiveDate,
    /// Time of the swipe.
    pub swipe_time: NaiveTime,
    /// Device label of the swipe.
    pub swipe_device: String,
    /// Shift label of the swipe.
    pub shift_label: String,
    /// The date the shift is grouped under.
    pub anchor_date: NaiveDate,
    /// The classified shift type.
    pub shift_type: ShiftType,
    /// Joined overtime start.
    pub overtime_start_time: Option<NaiveTime>,
    /// Joined overtime end.
    pub overtime_end_time: Option<NaiveTime>,
    /// Joined overtime hours.
    pub overtime_hours: Option<Decimal>,
    /// Joined leave start.
    pub leave_start_time: Option<NaiveTime>,
    /// Joined leave end.
    pub leave_end_time: Option<NaiveTime>,
    /// Joined leave hours.
    pub leave_hours: Option<Decimal>,
    /// Always `yes`.
    pub anomaly_flag: AnomalyFlag,
    /// De-duplicated descriptions of the shift, joined with `"; "`.
    pub anomaly_description: String,
    /// Start of the last reported excess outing.
    pub outing_start: Option<NaiveTime>,
    /// End of the last reported excess outing.
    pub outing_end: Option<NaiveTime>,
    /// Length of the last reported excess outing in minutes.
    pub outing_duration: Option<i64>,
    /// First swipe of the last reported unpaired entry.
    pub consecutive_entry_1: Option<NaiveTime>,
    /// Second swipe of the last reported unpaired entry.
    pub consecutive_entry_2: Option<NaiveTime>,
    /// Realized overtime, present only when below the requirement.
    pub realized_overtime_hours: Option<Decimal>,
}

/// Counters describing one audit run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Data rows in the input table.
    pub rows_read: usize,
    /// Rows dropped by the normalizer.
    pub rows_skipped: usize,
    /// Swipes kept after normalization.
    pub events_retained: usize,
    /// Night swipes dropped for falling in the afternoon dead zone.
    pub dead_zone_swipes: usize,
    /// Shift instances assembled.
    pub shift_instances: usize,
    /// Instances excluded from evaluation as unclassifiable.
    pub unclassified_instances: usize,
    /// Instances with at least one anomaly.
    pub anomalous_instances: usize,
    /// Swipes removed by burst collapsing.
    pub collapsed_swipes: usize,
}

/// The complete output of an audit run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Report rows, grouped by employee and anchor date.
    pub rows: Vec<ReportRow>,
    /// Every anomaly raised, in report order.
    pub anomalies: Vec<AnomalyRecord>,
    /// Run counters.
    pub summary: AuditSummary,
}
