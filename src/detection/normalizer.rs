//! Event normalization.
//!
//! Turns raw table rows into [`SwipeEvent`]s. The normalizer fails closed:
//! a row whose employee, date or time cannot be read is dropped and logged,
//! never reported as an error.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::config::DirectionMarkers;
use crate::models::{
    Cell, Direction, LeaveWindow, OvertimeAuthorization, RawSwipeRecord, ShiftArena, SwipeEvent,
};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%H:%M:%S%.f"];

fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Parses a calendar date cell.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`, or a datetime whose
/// date part is used. Numeric and empty cells yield `None`.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    let Cell::Text(raw) = cell else {
        return None;
    };
    let text = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| parse_datetime_text(text).map(|dt| dt.date()))
}

/// Parses a time-of-day cell.
///
/// Accepts `HH:MM:SS`, `HH:MM`, or a datetime whose time part is used.
/// Numeric and empty cells yield `None`.
pub fn parse_time(cell: &Cell) -> Option<NaiveTime> {
    let Cell::Text(raw) = cell else {
        return None;
    };
    let text = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
        .or_else(|| parse_datetime_text(text).map(|dt| dt.time()))
}

/// Parses an hours cell. Both numbers and numeric text are accepted.
pub fn parse_hours(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Decimal::try_from(*n).ok(),
        Cell::Text(s) => Decimal::from_str(s.trim()).ok(),
        Cell::Empty => None,
    }
}

fn has_marker(label: &str, markers: &[String]) -> bool {
    let lowered = label.to_lowercase();
    markers.iter().any(|marker| {
        let marker = marker.to_lowercase();
        if marker.chars().all(|c| c.is_ascii_alphanumeric()) {
            lowered
                .split(|c: char| !c.is_alphanumeric() || !c.is_ascii())
                .any(|word| word == marker)
        } else {
            lowered.contains(&marker)
        }
    })
}

/// Derives a swipe direction from a device label.
///
/// A label carrying both an entry and an exit marker, or neither, yields
/// [`Direction::Unknown`].
///
/// # Example
///
/// ```
/// use swipe_audit::config::DirectionMarkers;
/// use swipe_audit::detection::parse_direction;
/// use swipe_audit::models::Direction;
///
/// let markers = DirectionMarkers::default();
/// assert_eq!(parse_direction("Gate 3 - IN", &markers), Direction::In);
/// assert_eq!(parse_direction("大门出", &markers), Direction::Out);
/// assert_eq!(parse_direction("Main gate", &markers), Direction::Unknown);
/// ```
pub fn parse_direction(label: &str, markers: &DirectionMarkers) -> Direction {
    match (has_marker(label, &markers.entry), has_marker(label, &markers.exit)) {
        (true, false) => Direction::In,
        (false, true) => Direction::Out,
        _ => Direction::Unknown,
    }
}

/// Why a row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The employee id cell was empty.
    MissingEmployee,
    /// The date cell was empty, numeric or unparseable.
    BadDate,
    /// The time cell was empty, numeric or unparseable.
    BadTime,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingEmployee => write!(f, "missing employee id"),
            SkipReason::BadDate => write!(f, "unparseable swipe date"),
            SkipReason::BadTime => write!(f, "unparseable swipe time"),
        }
    }
}

/// Normalizes one raw row into a swipe event.
pub fn normalize_record(
    record: &RawSwipeRecord,
    markers: &DirectionMarkers,
) -> Result<SwipeEvent, SkipReason> {
    let employee_id = record
        .employee_id
        .as_text()
        .ok_or(SkipReason::MissingEmployee)?;
    let date = parse_date(&record.swipe_date).ok_or(SkipReason::BadDate)?;
    let time = parse_time(&record.swipe_time).ok_or(SkipReason::BadTime)?;

    let raw_source_tag = record.swipe_device.as_text().unwrap_or_default();
    let direction = parse_direction(&raw_source_tag, markers);

    Ok(SwipeEvent {
        employee_id,
        timestamp: date.and_time(time),
        direction,
        raw_source_tag,
        shift_label: record.shift_label.as_text().unwrap_or_default(),
        source_row: record.row_index,
    })
}

/// The outcome of normalizing a whole table.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSwipes {
    /// Events in input order.
    pub events: Vec<SwipeEvent>,
    /// Number of rows dropped.
    pub skipped: usize,
}

/// Normalizes every row, dropping the ones that cannot be read.
pub fn normalize_records(records: &[RawSwipeRecord], markers: &DirectionMarkers) -> NormalizedSwipes {
    let mut normalized = NormalizedSwipes::default();

    for record in records {
        match normalize_record(record, markers) {
            Ok(event) => normalized.events.push(event),
            Err(reason) => {
                debug!(row = record.row_index, reason = %reason, "Skipping swipe row");
                normalized.skipped += 1;
            }
        }
    }

    normalized
}

/// Collects overtime and leave values carried on swipe rows.
///
/// Rows are attributed through the shift instance their swipe landed in, so
/// a night shift's after-midnight rows key to the night's anchor date rather
/// than their calendar date. A row contributes an authorization when both
/// overtime times parse, and a leave window when both leave times parse.
/// Rows whose swipe was dropped or fell in no instance contribute nothing.
pub fn harvest_joins(
    arena: &ShiftArena,
    records: &[RawSwipeRecord],
) -> (Vec<OvertimeAuthorization>, Vec<LeaveWindow>) {
    let mut overtime = Vec::new();
    let mut leave = Vec::new();

    for instance in arena.iter() {
        for event in &instance.events {
            let Some(record) = records.get(event.source_row) else {
                continue;
            };

            if let (Some(start_time), Some(end_time)) = (
                parse_time(&record.overtime_start_time),
                parse_time(&record.overtime_end_time),
            ) {
                overtime.push(OvertimeAuthorization {
                    employee_id: instance.employee_id.clone(),
                    date: instance.anchor_date,
                    start_time,
                    end_time,
                    authorized_hours: parse_hours(&record.overtime_hours).unwrap_or(Decimal::ZERO),
                });
            }

            if let (Some(start_time), Some(end_time)) = (
                parse_time(&record.leave_start_time),
                parse_time(&record.leave_end_time),
            ) {
                leave.push(LeaveWindow {
                    employee_id: instance.employee_id.clone(),
                    date: instance.anchor_date,
                    start_time,
                    end_time,
                    leave_hours: parse_hours(&record.leave_hours),
                });
            }
        }
    }

    (overtime, leave)
}
