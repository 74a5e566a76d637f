//! Shift window assignment.
//!
//! Groups each employee's swipes into shift instances. Night swipes anchor
//! across midnight around a noon pivot; every other swipe anchors to its own
//! calendar date. Grouping happens once, into a [`ShiftArena`].

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::config::{AuditConfig, NightAnchoring, ShiftLabelKeywords};
use crate::models::{ShiftArena, ShiftType, SwipeEvent};

/// Classifies a free-text shift label.
///
/// Keywords are checked as case-insensitive substrings in the order
/// half-hour-linked, rest day, night, day, so the more specific day labels
/// win over the plain day keyword.
///
/// # Example
///
/// ```
/// use swipe_audit::config::ShiftLabelKeywords;
/// use swipe_audit::detection::classify_label;
/// use swipe_audit::models::ShiftType;
///
/// let keywords = ShiftLabelKeywords::default();
/// assert_eq!(classify_label("休息白班", &keywords), ShiftType::RestDay);
/// assert_eq!(classify_label("Night A", &keywords), ShiftType::Night);
/// assert_eq!(classify_label("training", &keywords), ShiftType::Unknown);
/// ```
pub fn classify_label(label: &str, keywords: &ShiftLabelKeywords) -> ShiftType {
    let lowered = label.to_lowercase();
    let matches = |list: &[String]| {
        list.iter()
            .any(|keyword| !keyword.is_empty() && lowered.contains(&keyword.to_lowercase()))
    };

    if matches(&keywords.half_hour_linked) {
        ShiftType::HalfHourLinked
    } else if matches(&keywords.rest_day) {
        ShiftType::RestDay
    } else if matches(&keywords.night) {
        ShiftType::Night
    } else if matches(&keywords.day) {
        ShiftType::Day
    } else {
        ShiftType::Unknown
    }
}

/// Returns the anchor date of a night-shift swipe.
///
/// Swipes strictly inside the afternoon dead zone belong to no night shift
/// and yield `None`.
pub fn night_anchor(timestamp: NaiveDateTime, rules: &NightAnchoring) -> Option<NaiveDate> {
    let time = timestamp.time();
    if time > rules.dead_zone_start && time < rules.dead_zone_end {
        return None;
    }

    let date = timestamp.date();
    if time >= rules.pivot {
        Some(date)
    } else {
        Some(date - Duration::days(1))
    }
}

/// The output of shift assignment.
#[derive(Debug, Clone, Default)]
pub struct ShiftAssignment {
    /// Instances in report order.
    pub arena: ShiftArena,
    /// Night swipes dropped for falling in the dead zone.
    pub dead_zone_swipes: usize,
}

/// Groups swipes into shift instances.
///
/// Instances are ordered by the employee's first appearance in `events`,
/// then by anchor date, then by shift type. Events inside an instance are
/// sorted by timestamp, ties kept in source row order.
pub fn assign_shifts(events: Vec<SwipeEvent>, config: &AuditConfig) -> ShiftAssignment {
    let mut employee_order: Vec<String> = Vec::new();
    let mut by_employee: HashMap<String, Vec<SwipeEvent>> = HashMap::new();

    for event in events {
        if !by_employee.contains_key(&event.employee_id) {
            employee_order.push(event.employee_id.clone());
        }
        by_employee
            .entry(event.employee_id.clone())
            .or_default()
            .push(event);
    }

    let mut assignment = ShiftAssignment::default();

    for employee_id in employee_order {
        let Some(mut swipes) = by_employee.remove(&employee_id) else {
            continue;
        };
        swipes.sort_by_key(|event| (event.timestamp, event.source_row));

        let mut groups: BTreeMap<(NaiveDate, ShiftType), Vec<SwipeEvent>> = BTreeMap::new();
        for event in swipes {
            let shift_type = classify_label(&event.shift_label, &config.shift_labels);
            let anchor = if shift_type == ShiftType::Night {
                match night_anchor(event.timestamp, &config.night_anchoring) {
                    Some(anchor) => anchor,
                    None => {
                        debug!(
                            employee_id = %employee_id,
                            timestamp = %event.timestamp,
                            "Dropping night swipe inside the dead zone"
                        );
                        assignment.dead_zone_swipes += 1;
                        continue;
                    }
                }
            } else {
                event.timestamp.date()
            };
            groups.entry((anchor, shift_type)).or_default().push(event);
        }

        for ((anchor_date, shift_type), events) in groups {
            assignment
                .arena
                .push(employee_id.clone(), anchor_date, shift_type, events);
        }
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M")
            .unwrap()
    }

    fn make_event(employee: &str, date: &str, time: &str, label: &str, row: usize) -> SwipeEvent {
        SwipeEvent {
            employee_id: employee.to_string(),
            timestamp: make_datetime(date, time),
            direction: Direction::In,
            raw_source_tag: "gate in".to_string(),
            shift_label: label.to_string(),
            source_row: row,
        }
    }

    #[test]
    fn test_classify_specific_day_labels_first() {
        let keywords = ShiftLabelKeywords::default();
        assert_eq!(classify_label("连班半小时白班", &keywords), ShiftType::HalfHourLinked);
        assert_eq!(classify_label("白班", &keywords), ShiftType::Day);
        assert_eq!(classify_label("夜班", &keywords), ShiftType::Night);
        assert_eq!(classify_label("", &keywords), ShiftType::Unknown);
    }

    #[test]
    fn test_night_anchor_pivot_and_dead_zone() {
        let rules = NightAnchoring::default();
        let anchor = make_date("2026-01-15");

        assert_eq!(night_anchor(make_datetime("2026-01-15", "23:50"), &rules), Some(anchor));
        assert_eq!(night_anchor(make_datetime("2026-01-16", "03:50"), &rules), Some(anchor));
        assert_eq!(night_anchor(make_datetime("2026-01-15", "15:00"), &rules), None);
        assert_eq!(night_anchor(make_datetime("2026-01-15", "12:00"), &rules), Some(anchor));
        assert_eq!(night_anchor(make_datetime("2026-01-15", "18:00"), &rules), Some(anchor));
    }

    #[test]
    fn test_night_swipes_group_across_midnight() {
        let events = vec![
            make_event("E1", "2026-01-15", "19:58", "夜班", 0),
            make_event("E1", "2026-01-16", "04:02", "夜班", 1),
            make_event("E1", "2026-01-16", "15:00", "夜班", 2),
        ];
        let assignment = assign_shifts(events, &AuditConfig::default());

        assert_eq!(assignment.arena.len(), 1);
        assert_eq!(assignment.dead_zone_swipes, 1);
        let instance = assignment.arena.iter().next().unwrap();
        assert_eq!(instance.anchor_date, make_date("2026-01-15"));
        assert_eq!(instance.shift_type, ShiftType::Night);
        assert_eq!(instance.events.len(), 2);
    }

    #[test]
    fn test_instances_follow_employee_appearance_order() {
        let events = vec![
            make_event("E2", "2026-01-15", "08:00", "白班", 0),
            make_event("E1", "2026-01-16", "08:00", "白班", 1),
            make_event("E1", "2026-01-15", "08:00", "白班", 2),
            make_event("E2", "2026-01-15", "09:00", "unlabelled", 3),
        ];
        let assignment = assign_shifts(events, &AuditConfig::default());

        let keys: Vec<_> = assignment
            .arena
            .iter()
            .map(|i| (i.employee_id.as_str(), i.anchor_date, i.shift_type))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("E2", make_date("2026-01-15"), ShiftType::Day),
                ("E2", make_date("2026-01-15"), ShiftType::Unknown),
                ("E1", make_date("2026-01-15"), ShiftType::Day),
                ("E1", make_date("2026-01-16"), ShiftType::Day),
            ]
        );
    }

    #[test]
    fn test_events_sorted_with_stable_ties() {
        let events = vec![
            make_event("E1", "2026-01-15", "12:00", "白班", 0),
            make_event("E1", "2026-01-15", "08:00", "白班", 1),
            make_event("E1", "2026-01-15", "08:00", "白班", 2),
        ];
        let assignment = assign_shifts(events, &AuditConfig::default());
        let rows: Vec<_> = assignment.arena.iter().next().unwrap().events.iter().map(|e| e.source_row).collect();
        assert_eq!(rows, vec![1, 2, 0]);
    }
}
