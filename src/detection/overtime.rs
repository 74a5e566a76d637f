//! Overtime accounting.
//!
//! Measures the overtime a shift actually shows and compares it with what
//! the shift was required to show.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::config::{RuleThresholds, ShiftProfile};
use crate::models::{OvertimeAuthorization, ShiftType, SwipeEvent};

use super::time_window::{minutes_to_hours, minutes_with_rollover, same_minute, ClockWindow, ShiftClock};

/// Realized overtime of one shift instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvertimeAssessment {
    /// When overtime is taken to begin.
    pub start: NaiveDateTime,
    /// When overtime is taken to end.
    pub end: NaiveDateTime,
    /// Whole minutes between start and end.
    pub realized_minutes: i64,
    /// Hours the shift was required to show.
    pub required_hours: Decimal,
}

impl OvertimeAssessment {
    /// Realized overtime in hours, unrounded.
    pub fn realized_hours(&self) -> Decimal {
        minutes_to_hours(self.realized_minutes)
    }

    /// Returns true when realized overtime is below the requirement.
    pub fn is_insufficient(&self) -> bool {
        self.realized_hours() < self.required_hours
    }
}

/// Returns true when a shift shows the plain first-in-at-start,
/// last-out-at-end pattern.
pub fn is_standard_pattern(events: &[SwipeEvent], profile: &ShiftProfile) -> bool {
    let first_in = events.iter().find(|e| e.is_in());
    let last_out = events.iter().rev().find(|e| e.is_out());
    match (first_in, last_out) {
        (Some(first_in), Some(last_out)) => {
            same_minute(first_in.time(), profile.work_start)
                && same_minute(last_out.time(), profile.work_end)
        }
        _ => false,
    }
}

/// Measures realized overtime.
///
/// Returns `None` when overtime is not applicable: no authorization and no
/// entry inside the default overtime window, or no exit that can close the
/// overtime period.
///
/// A rest-day shift with an authorization counts its whole duty, first entry
/// to last exit, unless it shows the standard pattern.
pub fn assess_overtime(
    shift_type: ShiftType,
    events: &[SwipeEvent],
    profile: &ShiftProfile,
    clock: &ShiftClock,
    authorization: Option<&OvertimeAuthorization>,
    thresholds: &RuleThresholds,
) -> Option<OvertimeAssessment> {
    let required_hours = authorization
        .map(|form| form.authorized_hours)
        .unwrap_or(thresholds.minimum_overtime_hours);

    if shift_type == ShiftType::RestDay && authorization.is_some() {
        if is_standard_pattern(events, profile) {
            return None;
        }
        let start = events.iter().find(|e| e.is_in())?.timestamp;
        let end = events.iter().rev().find(|e| e.is_out())?.timestamp;
        return Some(OvertimeAssessment {
            start,
            end,
            realized_minutes: minutes_with_rollover(start, end),
            required_hours,
        });
    }

    let window = match authorization {
        Some(form) => ClockWindow::new(form.start_time, form.end_time),
        None => ClockWindow::new(profile.overtime_start, profile.overtime_end),
    };
    let (window_start, window_end) = clock.interval(window.start, window.end);

    let first_qualifying_in = events
        .iter()
        .filter(|e| e.is_in() && window.contains(e.time()))
        .map(|e| e.timestamp)
        .next();

    if authorization.is_none() && first_qualifying_in.is_none() {
        return None;
    }

    let start = match first_qualifying_in {
        Some(entered) => entered.max(window_start),
        None => window_start,
    };

    let end = events
        .iter()
        .filter(|e| e.is_out())
        .map(|e| e.timestamp)
        .find(|ts| *ts >= window_end)
        .or_else(|| {
            events
                .iter()
                .rev()
                .find(|e| e.is_out())
                .map(|e| e.timestamp)
                .filter(|ts| *ts > start)
        })?;

    Some(OvertimeAssessment {
        start,
        end,
        realized_minutes: minutes_with_rollover(start, end),
        required_hours,
    })
}
