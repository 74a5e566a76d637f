//! Core data models for the swipe audit engine.
//!
//! This module contains all the domain records used throughout the engine.

mod anomaly;
mod authorization;
mod report;
mod shift_instance;
mod swipe;
mod table;

pub use anomaly::{AnomalyCategory, AnomalyRecord, Evidence};
pub use authorization::{JoinTables, LeaveWindow, OvertimeAuthorization};
pub use report::{AnomalyFlag, AuditReport, AuditSummary, ReportRow};
pub use shift_instance::{ShiftArena, ShiftInstance, ShiftInstanceId, ShiftType};
pub use swipe::{Direction, SwipeEvent};
pub use table::{Cell, RawSwipeRecord, SwipeTable};
