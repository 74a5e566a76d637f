//! Raw swipe table as supplied by the upstream reader.
//!
//! The table is column-named and loosely typed: cells may be text, numbers
//! or empty. Nothing here interprets cell contents beyond rendering them as
//! text; parsing happens in the normalizer.

use serde::{Deserialize, Serialize};

/// A single table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// A numeric cell. Never accepted where a date or time is expected.
    Number(f64),
    /// A textual cell.
    Text(String),
    /// A null or absent cell.
    #[default]
    Empty,
}

impl Cell {
    /// Renders the cell as trimmed text, or `None` for empty cells.
    ///
    /// Integral numbers render without a fractional part so numeric
    /// employee ids survive as `"1001"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    /// Returns true for empty cells and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// A column-named table of raw swipe rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwipeTable {
    /// Header names, in column order.
    pub columns: Vec<String>,
    /// Data rows. Rows shorter than the header read as empty cells.
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl SwipeTable {
    /// Creates a table with the given headers and no rows.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row of cells.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

/// One source row with its cells resolved to canonical columns.
///
/// Optional columns that the table lacks are materialized as
/// [`Cell::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSwipeRecord {
    /// Index of the row in the input table.
    pub row_index: usize,
    /// Employee number.
    pub employee_id: Cell,
    /// Employee name.
    pub name: Cell,
    /// Department.
    pub department: Cell,
    /// Calendar date of the swipe.
    pub swipe_date: Cell,
    /// Time of the swipe.
    pub swipe_time: Cell,
    /// Device label carrying the direction marker.
    pub swipe_device: Cell,
    /// Declared shift label.
    pub shift_label: Cell,
    /// Authorized overtime start.
    pub overtime_start_time: Cell,
    /// Authorized overtime end.
    pub overtime_end_time: Cell,
    /// Authorized overtime hours.
    pub overtime_hours: Cell,
    /// Approved leave start.
    pub leave_start_time: Cell,
    /// Approved leave end.
    pub leave_end_time: Cell,
    /// Approved leave hours.
    pub leave_hours: Cell,
}
