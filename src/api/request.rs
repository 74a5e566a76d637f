//! Request types for the swipe audit API.
//!
//! This module defines the JSON request structure for the `/audit` endpoint.

use serde::{Deserialize, Serialize};

use crate::models::{JoinTables, LeaveWindow, OvertimeAuthorization, SwipeTable};

/// Request body for the `/audit` endpoint.
///
/// The swipe table is required. Overtime authorizations and leave windows
/// are optional; when several share an (employee, date) key the first wins,
/// and they take precedence over values carried on the swipe rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRequest {
    /// The raw swipe table.
    pub swipes: SwipeTable,
    /// Approved overtime forms.
    #[serde(default)]
    pub overtime: Vec<OvertimeAuthorization>,
    /// Approved leave.
    #[serde(default)]
    pub leave: Vec<LeaveWindow>,
}

impl AuditRequest {
    /// Splits the request into the swipe table and its join tables.
    pub fn into_parts(self) -> (SwipeTable, JoinTables) {
        let joins = JoinTables::new(self.overtime, self.leave);
        (self.swipes, joins)
    }
}
