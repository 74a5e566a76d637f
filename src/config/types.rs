//! Configuration types for swipe auditing.
//!
//! These structures are deserialized from the YAML rule file. Every section
//! has a `Default` that reproduces the built-in rule set, so a file only
//! needs to name the values it changes.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ShiftType;

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Nominal clock times for one shift population.
///
/// A profile whose `work_end` is earlier than its `work_start` crosses
/// midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftProfile {
    /// Nominal start of work.
    pub work_start: NaiveTime,
    /// Latest first entry that still counts as on time.
    pub late_after: NaiveTime,
    /// Nominal end of work.
    pub work_end: NaiveTime,
    /// Default start of the overtime window, used without an authorization.
    pub overtime_start: NaiveTime,
    /// Default end of the overtime window, used without an authorization.
    pub overtime_end: NaiveTime,
}

impl ShiftProfile {
    /// The night profile: 20:00 to 04:00 with overtime 04:40 to 08:10.
    pub fn night() -> Self {
        Self {
            work_start: hm(20, 0),
            late_after: hm(20, 1),
            work_end: hm(4, 0),
            overtime_start: hm(4, 40),
            overtime_end: hm(8, 10),
        }
    }

    /// The day profile: 08:00 to 16:40 with overtime 17:10 to 20:10.
    pub fn day() -> Self {
        Self {
            work_start: hm(8, 0),
            late_after: hm(8, 0),
            work_end: hm(16, 40),
            overtime_start: hm(17, 10),
            overtime_end: hm(20, 10),
        }
    }

    /// Returns true when the working window wraps past midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.work_end < self.work_start
    }
}

/// Rules for anchoring night-shift swipes to a shift date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightAnchoring {
    /// Swipes at or after this time anchor to their own date, earlier ones
    /// to the previous date.
    pub pivot: NaiveTime,
    /// Start of the excluded afternoon interval (exclusive).
    pub dead_zone_start: NaiveTime,
    /// End of the excluded afternoon interval (exclusive).
    pub dead_zone_end: NaiveTime,
}

impl Default for NightAnchoring {
    fn default() -> Self {
        Self {
            pivot: hm(12, 0),
            dead_zone_start: hm(12, 0),
            dead_zone_end: hm(18, 0),
        }
    }
}

/// Numeric thresholds shared by the collapser and the rule checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    /// Swipes this close to the first swipe of a burst belong to the burst.
    pub burst_window_seconds: i64,
    /// Outings this short are clock noise and never reported.
    pub outing_noise_minutes: i64,
    /// Outings longer than this are reported.
    pub outing_limit_minutes: i64,
    /// Required overtime when swipes show overtime without an authorization.
    pub minimum_overtime_hours: Decimal,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            burst_window_seconds: 120,
            outing_noise_minutes: 2,
            outing_limit_minutes: 15,
            minimum_overtime_hours: Decimal::new(3, 0),
        }
    }
}

/// Keywords used to classify the free-text shift label of a swipe.
///
/// Matching is case-insensitive substring matching, checked in the order
/// half-hour-linked, rest day, night, day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftLabelKeywords {
    /// Keywords of night-shift labels.
    pub night: Vec<String>,
    /// Keywords of rest-day labels.
    pub rest_day: Vec<String>,
    /// Keywords of half-hour-linked day labels.
    pub half_hour_linked: Vec<String>,
    /// Keywords of ordinary day labels.
    pub day: Vec<String>,
}

impl Default for ShiftLabelKeywords {
    fn default() -> Self {
        Self {
            night: strings(&["夜班", "night"]),
            rest_day: strings(&["休息白班", "rest"]),
            half_hour_linked: strings(&["连班半小时白班", "half-hour", "half hour"]),
            day: strings(&["白班", "day"]),
        }
    }
}

/// Markers that identify the direction of a swipe device label.
///
/// ASCII markers must appear as a whole word; other markers match as
/// substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionMarkers {
    /// Markers of entry devices.
    pub entry: Vec<String>,
    /// Markers of exit devices.
    pub exit: Vec<String>,
}

impl Default for DirectionMarkers {
    fn default() -> Self {
        Self {
            entry: strings(&["进", "in", "entry", "enter"]),
            exit: strings(&["出", "out", "exit"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The complete audit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Night-shift nominal times.
    pub night: ShiftProfile,
    /// Day-shift nominal times, shared by rest-day and half-hour-linked shifts.
    pub day: ShiftProfile,
    /// Night-shift anchoring rules.
    pub night_anchoring: NightAnchoring,
    /// Numeric thresholds.
    pub thresholds: RuleThresholds,
    /// Shift label keywords.
    pub shift_labels: ShiftLabelKeywords,
    /// Direction markers.
    pub directions: DirectionMarkers,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            night: ShiftProfile::night(),
            day: ShiftProfile::day(),
            night_anchoring: NightAnchoring::default(),
            thresholds: RuleThresholds::default(),
            shift_labels: ShiftLabelKeywords::default(),
            directions: DirectionMarkers::default(),
        }
    }
}

impl AuditConfig {
    /// Returns the profile that governs a shift type.
    ///
    /// `Unknown` shifts have no profile and are never evaluated.
    pub fn profile(&self, shift_type: ShiftType) -> Option<&ShiftProfile> {
        match shift_type {
            ShiftType::Night => Some(&self.night),
            ShiftType::Day | ShiftType::RestDay | ShiftType::HalfHourLinked => Some(&self.day),
            ShiftType::Unknown => None,
        }
    }
}
