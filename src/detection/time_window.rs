//! Clock-time windows and shift-relative time resolution.
//!
//! Rule checks compare swipes against nominal clock times such as 20:00 or
//! 04:00. [`ClockWindow`] answers membership questions on time of day alone,
//! wrapping at midnight, while [`ShiftClock`] turns a clock time into the
//! concrete datetime it denotes for one shift instance.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;

/// A closed interval of clock times.
///
/// When `end` is earlier than `start` the window wraps past midnight and a
/// time belongs to it if it is at or after `start` or at or before `end`.
///
/// # Example
///
/// ```
/// use swipe_audit::detection::ClockWindow;
/// use chrono::NaiveTime;
///
/// let night = ClockWindow::new(
///     NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
/// );
/// assert!(night.contains(NaiveTime::from_hms_opt(23, 30, 0).unwrap()));
/// assert!(night.contains(NaiveTime::from_hms_opt(4, 0, 0).unwrap()));
/// assert!(!night.contains(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockWindow {
    /// First clock time of the window.
    pub start: NaiveTime,
    /// Last clock time of the window.
    pub end: NaiveTime,
}

impl ClockWindow {
    /// Creates a window from `start` through `end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Returns true when the window wraps past midnight.
    pub fn wraps(&self) -> bool {
        self.end < self.start
    }

    /// Tests closed-interval membership of a time of day.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.wraps() {
            time >= self.start || time <= self.end
        } else {
            time >= self.start && time <= self.end
        }
    }
}

/// Resolves clock times to datetimes for one shift instance.
///
/// Day shifts resolve every clock time on the anchor date. Night shifts
/// resolve times before the pivot onto the following day, so 04:00 of a
/// shift anchored on the 15th means the 16th at 04:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftClock {
    anchor_date: NaiveDate,
    next_day_before: Option<NaiveTime>,
}

impl ShiftClock {
    /// A clock for a shift that stays within its anchor date.
    pub fn same_day(anchor_date: NaiveDate) -> Self {
        Self {
            anchor_date,
            next_day_before: None,
        }
    }

    /// A clock for a shift that crosses midnight, rolling over at `pivot`.
    pub fn overnight(anchor_date: NaiveDate, pivot: NaiveTime) -> Self {
        Self {
            anchor_date,
            next_day_before: Some(pivot),
        }
    }

    /// Returns the datetime a clock time denotes within this shift.
    pub fn at(&self, time: NaiveTime) -> NaiveDateTime {
        match self.next_day_before {
            Some(pivot) if time < pivot => (self.anchor_date + Duration::days(1)).and_time(time),
            _ => self.anchor_date.and_time(time),
        }
    }

    /// Resolves a pair of clock times as an interval, rolling the end over
    /// by a day when it would precede the start.
    pub fn interval(&self, start: NaiveTime, end: NaiveTime) -> (NaiveDateTime, NaiveDateTime) {
        let from = self.at(start);
        let mut to = self.at(end);
        if to < from {
            to += Duration::days(1);
        }
        (from, to)
    }
}

/// Returns whole minutes from `start` to `end`, adding a day when `end`
/// precedes `start`.
pub fn minutes_with_rollover(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let mut seconds = (end - start).num_seconds();
    if seconds < 0 {
        seconds += 24 * 60 * 60;
    }
    seconds / 60
}

/// Converts minutes to hours as a [`Decimal`].
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::new(minutes, 0) / Decimal::new(60, 0)
}

/// Returns true when two times of day agree to the minute.
pub fn same_minute(a: NaiveTime, b: NaiveTime) -> bool {
    a.hour() == b.hour() && a.minute() == b.minute()
}
