//! Column resolution for raw swipe tables.
//!
//! Headers are matched against canonical names and the original Chinese
//! report headers. A missing required column stops the run before any row
//! is read.

use tracing::warn;

use crate::error::{AuditError, AuditResult};
use crate::models::{Cell, RawSwipeRecord, SwipeTable};

/// Canonical columns and the headers accepted for each.
const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    ("employee_id", &["employee_id", "工号"]),
    ("name", &["name", "姓名"]),
    ("department", &["department", "部门"]),
    ("swipe_date", &["swipe_date", "刷卡日期"]),
    ("swipe_time", &["swipe_time", "刷卡时间"]),
    ("swipe_device", &["swipe_device", "direction_tag", "刷卡机"]),
    ("shift_label", &["shift_label", "班别"]),
    ("overtime_start_time", &["overtime_start_time", "加班单开始时间"]),
    ("overtime_end_time", &["overtime_end_time", "加班单结束时间"]),
    ("overtime_hours", &["overtime_hours", "加班单时数"]),
    ("leave_start_time", &["leave_start_time", "请假开始时间"]),
    ("leave_end_time", &["leave_end_time", "请假结束时间"]),
    ("leave_hours", &["leave_hours", "请假时数"]),
];

/// Columns without which no shift can be evaluated.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "employee_id",
    "name",
    "swipe_date",
    "swipe_time",
    "swipe_device",
    "shift_label",
];

/// Positions of canonical columns within a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    positions: Vec<(&'static str, usize)>,
}

impl ColumnMap {
    /// Resolves table headers to canonical columns.
    ///
    /// Fails with [`AuditError::MissingColumn`] naming the first absent
    /// required column, or [`AuditError::DuplicateColumn`] when two headers
    /// resolve to the same column.
    pub fn resolve(columns: &[String]) -> AuditResult<Self> {
        let mut positions: Vec<(&'static str, usize)> = Vec::new();

        for (index, header) in columns.iter().enumerate() {
            let header = header.trim();
            let Some((canonical, _)) = COLUMN_ALIASES
                .iter()
                .find(|(_, aliases)| aliases.iter().any(|alias| alias.eq_ignore_ascii_case(header)))
            else {
                continue;
            };

            if positions.iter().any(|(name, _)| name == canonical) {
                warn!(column = %canonical, "Duplicate column in swipe table");
                return Err(AuditError::DuplicateColumn {
                    column: canonical.to_string(),
                });
            }
            positions.push((canonical, index));
        }

        for required in REQUIRED_COLUMNS {
            if !positions.iter().any(|(name, _)| name == required) {
                warn!(column = %required, "Swipe table is missing a required column");
                return Err(AuditError::MissingColumn {
                    column: required.to_string(),
                });
            }
        }

        Ok(Self { positions })
    }

    /// Returns the position of a canonical column, if present.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, index)| *index)
    }

    fn cell(&self, row: &[Cell], column: &str) -> Cell {
        self.position(column)
            .and_then(|index| row.get(index))
            .cloned()
            .unwrap_or_default()
    }

    /// Extracts the canonical cells of one row.
    pub fn record(&self, row_index: usize, row: &[Cell]) -> RawSwipeRecord {
        RawSwipeRecord {
            row_index,
            employee_id: self.cell(row, "employee_id"),
            name: self.cell(row, "name"),
            department: self.cell(row, "department"),
            swipe_date: self.cell(row, "swipe_date"),
            swipe_time: self.cell(row, "swipe_time"),
            swipe_device: self.cell(row, "swipe_device"),
            shift_label: self.cell(row, "shift_label"),
            overtime_start_time: self.cell(row, "overtime_start_time"),
            overtime_end_time: self.cell(row, "overtime_end_time"),
            overtime_hours: self.cell(row, "overtime_hours"),
            leave_start_time: self.cell(row, "leave_start_time"),
            leave_end_time: self.cell(row, "leave_end_time"),
            leave_hours: self.cell(row, "leave_hours"),
        }
    }
}

/// Resolves a table's schema and extracts every row.
pub fn read_records(table: &SwipeTable) -> AuditResult<Vec<RawSwipeRecord>> {
    let map = ColumnMap::resolve(&table.columns)?;
    Ok(table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| map.record(index, row))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn full_headers() -> Vec<String> {
        headers(&[
            "employee_id",
            "name",
            "department",
            "swipe_date",
            "swipe_time",
            "swipe_device",
            "shift_label",
        ])
    }

    #[test]
    fn test_resolves_canonical_headers() {
        let map = ColumnMap::resolve(&full_headers()).unwrap();
        assert_eq!(map.position("employee_id"), Some(0));
        assert_eq!(map.position("shift_label"), Some(6));
        assert_eq!(map.position("leave_hours"), None);
    }

    #[test]
    fn test_resolves_chinese_headers() {
        let map = ColumnMap::resolve(&headers(&[
            "工号", "姓名", "部门", "刷卡日期", "刷卡时间", "刷卡机", "班别", "请假开始时间",
        ]))
        .unwrap();
        assert_eq!(map.position("swipe_device"), Some(5));
        assert_eq!(map.position("leave_start_time"), Some(7));
    }

    #[test]
    fn test_missing_required_column_is_named() {
        let result = ColumnMap::resolve(&headers(&[
            "employee_id",
            "name",
            "swipe_date",
            "swipe_device",
            "shift_label",
        ]));

        match result {
            Err(AuditError::MissingColumn { column }) => assert_eq!(column, "swipe_time"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_department_is_optional() {
        let mut columns = full_headers();
        columns.remove(2);
        assert!(ColumnMap::resolve(&columns).is_ok());
    }

    #[test]
    fn test_duplicate_alias_is_rejected() {
        let mut columns = full_headers();
        columns.push("姓名".to_string());

        assert!(matches!(
            ColumnMap::resolve(&columns),
            Err(AuditError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let mut table = SwipeTable::new(full_headers());
        table.push_row(vec![Cell::from("E1"), Cell::from("Ann")]);

        let records = read_records(&table).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, Cell::from("Ann"));
        assert_eq!(records[0].swipe_time, Cell::Empty);
        assert_eq!(records[0].leave_hours, Cell::Empty);
    }
}
