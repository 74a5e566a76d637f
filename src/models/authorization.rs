//! Overtime authorizations, leave windows and their join tables.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An approved overtime form for one employee and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeAuthorization {
    /// The employee the form was issued to.
    pub employee_id: String,
    /// The shift date the form applies to.
    pub date: NaiveDate,
    /// Authorized overtime start.
    pub start_time: NaiveTime,
    /// Authorized overtime end.
    pub end_time: NaiveTime,
    /// Hours the employee is expected to work.
    pub authorized_hours: Decimal,
}

/// An approved absence for one employee and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveWindow {
    /// The employee on leave.
    pub employee_id: String,
    /// The shift date the leave applies to.
    pub date: NaiveDate,
    /// Leave start.
    pub start_time: NaiveTime,
    /// Leave end.
    pub end_time: NaiveTime,
    /// Approved leave hours, when known.
    #[serde(default)]
    pub leave_hours: Option<Decimal>,
}

type JoinKey = (String, NaiveDate);

/// Read-only lookup tables keyed by (employee id, date).
///
/// When two records share a key the first one inserted wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinTables {
    overtime: HashMap<JoinKey, OvertimeAuthorization>,
    leave: HashMap<JoinKey, LeaveWindow>,
}

impl JoinTables {
    /// Builds join tables from explicit records.
    pub fn new(
        overtime: impl IntoIterator<Item = OvertimeAuthorization>,
        leave: impl IntoIterator<Item = LeaveWindow>,
    ) -> Self {
        let mut tables = Self::default();
        tables.extend(overtime, leave);
        tables
    }

    /// Adds records whose keys are not present yet.
    pub fn extend(
        &mut self,
        overtime: impl IntoIterator<Item = OvertimeAuthorization>,
        leave: impl IntoIterator<Item = LeaveWindow>,
    ) {
        for form in overtime {
            self.overtime
                .entry((form.employee_id.clone(), form.date))
                .or_insert(form);
        }
        for window in leave {
            self.leave
                .entry((window.employee_id.clone(), window.date))
                .or_insert(window);
        }
    }

    /// Looks up the overtime authorization for an employee and date.
    pub fn overtime_for(&self, employee_id: &str, date: NaiveDate) -> Option<&OvertimeAuthorization> {
        self.overtime.get(&(employee_id.to_string(), date))
    }

    /// Looks up the leave window for an employee and date.
    pub fn leave_for(&self, employee_id: &str, date: NaiveDate) -> Option<&LeaveWindow> {
        self.leave.get(&(employee_id.to_string(), date))
    }

    /// Returns the number of overtime authorizations.
    pub fn overtime_len(&self) -> usize {
        self.overtime.len()
    }

    /// Returns the number of leave windows.
    pub fn leave_len(&self) -> usize {
        self.leave.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn make_form(employee_id: &str, hours: i64) -> OvertimeAuthorization {
        OvertimeAuthorization {
            employee_id: employee_id.to_string(),
            date: make_date("2026-01-15"),
            start_time: make_time("17:10"),
            end_time: make_time("20:10"),
            authorized_hours: Decimal::new(hours, 0),
        }
    }

    #[test]
    fn test_join_miss_is_none() {
        let tables = JoinTables::new(vec![make_form("E1", 3)], vec![]);
        assert!(tables.overtime_for("E2", make_date("2026-01-15")).is_none());
        assert!(tables.overtime_for("E1", make_date("2026-01-16")).is_none());
        assert!(tables.leave_for("E1", make_date("2026-01-15")).is_none());
    }

    #[test]
    fn test_first_record_per_key_wins() {
        let mut tables = JoinTables::new(vec![make_form("E1", 3)], vec![]);
        tables.extend(vec![make_form("E1", 5)], vec![]);

        let form = tables.overtime_for("E1", make_date("2026-01-15")).unwrap();
        assert_eq!(form.authorized_hours, Decimal::new(3, 0));
        assert_eq!(tables.overtime_len(), 1);
    }

    #[test]
    fn test_leave_deserializes_without_hours() {
        let json = r#"{
            "employee_id": "E1",
            "date": "2026-01-15",
            "start_time": "12:00:00",
            "end_time": "13:00:00"
        }"#;
        let window: LeaveWindow = serde_json::from_str(json).unwrap();
        assert_eq!(window.leave_hours, None);
        assert_eq!(window.start_time, make_time("12:00"));
    }
}
