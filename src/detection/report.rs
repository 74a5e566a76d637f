//! Report row assembly.

use std::collections::HashSet;

use crate::models::{
    AnomalyCategory, AnomalyFlag, AnomalyRecord, JoinTables, RawSwipeRecord, ReportRow,
    ShiftInstance, SwipeEvent,
};

/// Joins anomaly descriptions with `"; "`, dropping exact repeats and
/// keeping first-occurrence order.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use swipe_audit::detection::join_descriptions;
/// use swipe_audit::models::{AnomalyCategory, AnomalyRecord, Evidence, ShiftInstanceId};
///
/// let record = |description: &str| AnomalyRecord {
///     shift: ShiftInstanceId(0),
///     employee_id: "E1".to_string(),
///     anchor_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     category: AnomalyCategory::ExcessOuting,
///     description: description.to_string(),
///     evidence: Evidence::default(),
/// };
///
/// let joined = join_descriptions(&[record("a"), record("b"), record("a")]);
/// assert_eq!(joined, "a; b");
/// ```
pub fn join_descriptions(anomalies: &[AnomalyRecord]) -> String {
    let mut seen = HashSet::new();
    anomalies
        .iter()
        .map(|anomaly| anomaly.description.as_str())
        .filter(|description| seen.insert(*description))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Evidence columns shared by every row of one shift instance.
#[derive(Debug, Clone, Default)]
struct EvidenceColumns {
    outing: Option<(AnomalyRecord, i64)>,
    consecutive: Option<AnomalyRecord>,
    realized: Option<rust_decimal::Decimal>,
}

impl EvidenceColumns {
    fn collect(anomalies: &[AnomalyRecord]) -> Self {
        let mut columns = Self::default();
        for anomaly in anomalies {
            match anomaly.category {
                AnomalyCategory::ExcessOuting => {
                    let minutes = anomaly.evidence.duration_minutes.unwrap_or_default();
                    columns.outing = Some((anomaly.clone(), minutes));
                }
                AnomalyCategory::UnpairedEntry => columns.consecutive = Some(anomaly.clone()),
                AnomalyCategory::InsufficientOvertime => {
                    columns.realized = anomaly.evidence.realized_overtime_hours;
                }
                _ => {}
            }
        }
        columns
    }
}

/// Builds one report row per retained swipe of an anomalous instance.
///
/// `records` are the raw rows of the run, indexed by source row.
pub fn build_rows(
    instance: &ShiftInstance,
    events: &[SwipeEvent],
    anomalies: &[AnomalyRecord],
    joins: &JoinTables,
    records: &[RawSwipeRecord],
) -> Vec<ReportRow> {
    if anomalies.is_empty() {
        return Vec::new();
    }

    let description = join_descriptions(anomalies);
    let evidence = EvidenceColumns::collect(anomalies);
    let overtime = joins.overtime_for(&instance.employee_id, instance.anchor_date);
    let leave = joins.leave_for(&instance.employee_id, instance.anchor_date);

    let swipe_time = |record: Option<&AnomalyRecord>, index: usize| {
        record
            .and_then(|r| r.evidence.timestamps.get(index))
            .map(|ts| ts.time())
    };
    let outing = evidence.outing.as_ref().map(|(record, _)| record);

    events
        .iter()
        .map(|event| {
            let record = records.get(event.source_row);
            ReportRow {
                employee_id: event.employee_id.clone(),
                name: record.and_then(|r| r.name.as_text()).unwrap_or_default(),
                department: record.and_then(|r| r.department.as_text()),
                swipe_date: event.timestamp.date(),
                swipe_time: event.time(),
                swipe_device: event.raw_source_tag.clone(),
                shift_label: event.shift_label.clone(),
                anchor_date: instance.anchor_date,
                shift_type: instance.shift_type,
                overtime_start_time: overtime.map(|form| form.start_time),
                overtime_end_time: overtime.map(|form| form.end_time),
                overtime_hours: overtime.map(|form| form.authorized_hours),
                leave_start_time: leave.map(|window| window.start_time),
                leave_end_time: leave.map(|window| window.end_time),
                leave_hours: leave.and_then(|window| window.leave_hours),
                anomaly_flag: AnomalyFlag::Yes,
                anomaly_description: description.clone(),
                outing_start: swipe_time(outing, 0),
                outing_end: swipe_time(outing, 1),
                outing_duration: evidence.outing.as_ref().map(|(_, minutes)| *minutes),
                consecutive_entry_1: swipe_time(evidence.consecutive.as_ref(), 0),
                consecutive_entry_2: swipe_time(evidence.consecutive.as_ref(), 1),
                realized_overtime_hours: evidence.realized,
            }
        })
        .collect()
}
