//! Shift anomaly detection.
//!
//! The stages run in this order for every audit:
//!
//! 1. [`schema`] resolves the table's columns and extracts raw rows.
//! 2. [`normalizer`] turns rows into swipe events and harvests row-embedded
//!    overtime and leave values.
//! 3. [`shift_window`] groups each employee's swipes into shift instances.
//! 4. [`burst`] collapses repeated reads within each instance.
//! 5. [`rules`] evaluates the anomaly checks, consulting [`overtime`].
//! 6. [`report`] turns anomalous instances into report rows.
//!
//! [`run_audit`] drives the whole sequence.

pub mod burst;
pub mod normalizer;
pub mod overtime;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod schema;
pub mod shift_window;
pub mod time_window;

pub use burst::{collapse_bursts, CollapsedEvents};
pub use normalizer::{
    harvest_joins, normalize_record, normalize_records, parse_date, parse_direction, parse_hours,
    parse_time, NormalizedSwipes, SkipReason,
};
pub use overtime::{assess_overtime, is_standard_pattern, OvertimeAssessment};
pub use pipeline::run_audit;
pub use report::{build_rows, join_descriptions};
pub use rules::{describe, evaluate_shift};
pub use schema::{read_records, ColumnMap, REQUIRED_COLUMNS};
pub use shift_window::{assign_shifts, classify_label, night_anchor, ShiftAssignment};
pub use time_window::{minutes_to_hours, minutes_with_rollover, same_minute, ClockWindow, ShiftClock};
