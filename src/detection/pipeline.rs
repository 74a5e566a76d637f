//! The end-to-end audit run.

use std::time::Instant;
use tracing::{debug, info};

use crate::config::AuditConfig;
use crate::error::AuditResult;
use crate::models::{AuditReport, JoinTables, SwipeTable};

use super::burst::collapse_bursts;
use super::normalizer::{harvest_joins, normalize_records};
use super::report::build_rows;
use super::rules::evaluate_shift;
use super::schema::read_records;
use super::shift_window::assign_shifts;

/// Audits a swipe table.
///
/// `joins` holds explicitly supplied overtime and leave records. Values
/// carried on the swipe rows themselves are keyed by the anchor date of the
/// shift their swipe belongs to, and added for keys the explicit records do
/// not cover.
///
/// Fails only when the table lacks a required column; unreadable rows are
/// dropped and counted in the summary.
///
/// # Example
///
/// ```
/// use swipe_audit::config::AuditConfig;
/// use swipe_audit::detection::run_audit;
/// use swipe_audit::models::{Cell, JoinTables, SwipeTable};
///
/// let mut table = SwipeTable::new([
///     "employee_id",
///     "name",
///     "swipe_date",
///     "swipe_time",
///     "swipe_device",
///     "shift_label",
/// ]);
/// for (time, device) in [("08:30:00", "Gate IN"), ("16:45:00", "Gate OUT")] {
///     table.push_row(
///         ["E1", "Ann", "2026-01-15", time, device, "白班"]
///             .into_iter()
///             .map(Cell::from)
///             .collect(),
///     );
/// }
///
/// let report = run_audit(&table, JoinTables::default(), &AuditConfig::default()).unwrap();
/// assert_eq!(report.rows.len(), 2);
/// assert_eq!(report.rows[0].anomaly_description, "late arrival");
/// ```
pub fn run_audit(
    table: &SwipeTable,
    mut joins: JoinTables,
    config: &AuditConfig,
) -> AuditResult<AuditReport> {
    let started = Instant::now();
    let records = read_records(table)?;

    let normalized = normalize_records(&records, &config.directions);
    let mut report = AuditReport::default();
    report.summary.rows_read = records.len();
    report.summary.rows_skipped = normalized.skipped;
    report.summary.events_retained = normalized.events.len();

    let assignment = assign_shifts(normalized.events, config);
    report.summary.dead_zone_swipes = assignment.dead_zone_swipes;
    report.summary.shift_instances = assignment.arena.len();

    let (row_overtime, row_leave) = harvest_joins(&assignment.arena, &records);
    joins.extend(row_overtime, row_leave);

    for instance in assignment.arena.iter() {
        if !instance.shift_type.is_evaluated() {
            debug!(
                employee_id = %instance.employee_id,
                anchor_date = %instance.anchor_date,
                swipes = instance.events.len(),
                "Excluding unclassified shift instance"
            );
            report.summary.unclassified_instances += 1;
            continue;
        }

        let collapsed = collapse_bursts(&instance.events, config.thresholds.burst_window_seconds);
        let removed = instance.events.len() - collapsed.events.len();
        if removed > 0 {
            debug!(
                employee_id = %instance.employee_id,
                anchor_date = %instance.anchor_date,
                removed = removed,
                "Collapsed swipe bursts"
            );
        }
        report.summary.collapsed_swipes += removed;

        let anomalies = evaluate_shift(instance, &collapsed, &joins, config);
        if anomalies.is_empty() {
            continue;
        }

        report.summary.anomalous_instances += 1;
        report
            .rows
            .extend(build_rows(instance, &collapsed.events, &anomalies, &joins, &records));
        report.anomalies.extend(anomalies);
    }

    info!(
        rows_read = report.summary.rows_read,
        rows_skipped = report.summary.rows_skipped,
        events_retained = report.summary.events_retained,
        shift_instances = report.summary.shift_instances,
        anomalous_instances = report.summary.anomalous_instances,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Swipe audit complete"
    );

    Ok(report)
}
