//! Anomaly rule evaluation.
//!
//! Every check runs against the collapsed swipes of one shift instance and
//! appends zero or more anomalies. Checks never short-circuit each other and
//! run in the declaration order of [`AnomalyCategory`].

use chrono::{NaiveDateTime, Timelike};

use crate::config::{AuditConfig, RuleThresholds, ShiftProfile};
use crate::models::{
    AnomalyCategory, AnomalyRecord, Evidence, JoinTables, LeaveWindow, OvertimeAuthorization,
    ShiftInstance, ShiftType, SwipeEvent,
};

use super::burst::CollapsedEvents;
use super::overtime::{assess_overtime, is_standard_pattern};
use super::time_window::{same_minute, ClockWindow, ShiftClock};

fn phrase(category: AnomalyCategory, thresholds: &RuleThresholds) -> String {
    match category {
        AnomalyCategory::AmbiguousDirectionBurst => format!(
            "mixed directions within {} seconds",
            thresholds.burst_window_seconds
        ),
        AnomalyCategory::ExcessOuting => format!(
            "excess outing over {} minutes",
            thresholds.outing_limit_minutes
        ),
        AnomalyCategory::LeadingExit => "first swipe is an exit".to_string(),
        AnomalyCategory::TrailingEntry => "last swipe is an entry".to_string(),
        AnomalyCategory::PreOvertimeOutingNotReturned => {
            "left before overtime and did not return".to_string()
        }
        other => other.to_string(),
    }
}

/// Returns the description written for an anomaly.
///
/// The category phrase is followed by the swipe times and measures of the
/// incident, so two outings in one shift read as two descriptions. Late
/// arrival and a missed overtime entry happen at most once per shift and
/// carry the phrase alone.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use swipe_audit::config::RuleThresholds;
/// use swipe_audit::detection::describe;
/// use swipe_audit::models::{AnomalyCategory, Evidence};
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let evidence = Evidence {
///     duration_minutes: Some(20),
///     ..Evidence::swipes([
///         date.and_hms_opt(12, 5, 0).unwrap(),
///         date.and_hms_opt(12, 25, 0).unwrap(),
///     ])
/// };
/// assert_eq!(
///     describe(AnomalyCategory::ExcessOuting, &evidence, &RuleThresholds::default()),
///     "excess outing over 15 minutes (12:05:00, 12:25:00, 20 min)"
/// );
/// ```
pub fn describe(category: AnomalyCategory, evidence: &Evidence, thresholds: &RuleThresholds) -> String {
    let phrase = phrase(category, thresholds);
    if matches!(
        category,
        AnomalyCategory::LateArrival | AnomalyCategory::OvertimeNotEntered
    ) {
        return phrase;
    }

    let mut details: Vec<String> = evidence
        .timestamps
        .iter()
        .map(|ts| ts.format("%H:%M:%S").to_string())
        .collect();
    match category {
        AnomalyCategory::ExcessOuting => {
            details.extend(evidence.duration_minutes.map(|minutes| format!("{} min", minutes)));
        }
        AnomalyCategory::InsufficientOvertime => {
            if let (Some(realized), Some(required)) =
                (evidence.realized_overtime_hours, evidence.required_overtime_hours)
            {
                details.push(format!("{} of {} hours", realized, required));
            }
        }
        _ => {}
    }

    if details.is_empty() {
        phrase
    } else {
        format!("{} ({})", phrase, details.join(", "))
    }
}

fn minute_floor(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .with_second(0)
        .and_then(|ts| ts.with_nanosecond(0))
        .unwrap_or(timestamp)
}

struct ShiftRules<'a> {
    instance: &'a ShiftInstance,
    events: &'a [SwipeEvent],
    profile: &'a ShiftProfile,
    clock: ShiftClock,
    overtime: Option<&'a OvertimeAuthorization>,
    leave: Option<&'a LeaveWindow>,
    thresholds: &'a RuleThresholds,
    anomalies: Vec<AnomalyRecord>,
}

impl<'a> ShiftRules<'a> {
    fn raise(&mut self, category: AnomalyCategory, evidence: Evidence) {
        self.anomalies.push(AnomalyRecord {
            shift: self.instance.id,
            employee_id: self.instance.employee_id.clone(),
            anchor_date: self.instance.anchor_date,
            category,
            description: describe(category, &evidence, self.thresholds),
            evidence,
        });
    }

    /// True when the leave window covers `[from, to]` to the minute.
    fn leave_covers(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        let Some(leave) = self.leave else {
            return false;
        };
        let (leave_start, leave_end) = self.clock.interval(leave.start_time, leave.end_time);
        minute_floor(leave_start) <= minute_floor(from) && minute_floor(leave_end) >= minute_floor(to)
    }

    fn first_in(&self) -> Option<&'a SwipeEvent> {
        self.events.iter().find(|e| e.is_in())
    }

    fn last_out(&self) -> Option<&'a SwipeEvent> {
        self.events.iter().rev().find(|e| e.is_out())
    }

    fn duty_window(&self) -> ClockWindow {
        let end = self
            .overtime
            .map(|form| form.end_time)
            .unwrap_or(self.profile.overtime_end);
        ClockWindow::new(self.profile.work_start, end)
    }

    fn check_ambiguous_bursts(&mut self, bursts: &[Vec<NaiveDateTime>]) {
        for burst in bursts {
            self.raise(
                AnomalyCategory::AmbiguousDirectionBurst,
                Evidence::swipes(burst.iter().copied()),
            );
        }
    }

    fn check_late_arrival(&mut self) {
        let Some(first_in) = self.first_in() else {
            return;
        };
        if minute_floor(first_in.timestamp) <= self.clock.at(self.profile.late_after) {
            return;
        }
        if self.leave_covers(self.clock.at(self.profile.work_start), first_in.timestamp) {
            return;
        }
        self.raise(AnomalyCategory::LateArrival, Evidence::swipes([first_in.timestamp]));
    }

    fn check_early_departure(&mut self) {
        let Some(last_out) = self.last_out() else {
            return;
        };
        let nominal_end = self.clock.at(self.profile.work_end);
        if minute_floor(last_out.timestamp) >= nominal_end {
            return;
        }
        if self.leave_covers(last_out.timestamp, nominal_end) {
            return;
        }
        self.raise(AnomalyCategory::EarlyDeparture, Evidence::swipes([last_out.timestamp]));
    }

    fn check_excess_outings(&mut self) {
        let working = ClockWindow::new(self.profile.work_start, self.profile.work_end);
        for pair in self.events.windows(2) {
            let (out, back) = (&pair[0], &pair[1]);
            if !(out.is_out() && back.is_in()) {
                continue;
            }
            if !(working.contains(out.time()) && working.contains(back.time())) {
                continue;
            }

            let minutes = (back.timestamp - out.timestamp).num_minutes();
            // noise is always below the limit once the config validates
            if minutes <= self.thresholds.outing_limit_minutes {
                continue;
            }
            if self.leave_covers(out.timestamp, back.timestamp) {
                continue;
            }

            self.raise(
                AnomalyCategory::ExcessOuting,
                Evidence {
                    duration_minutes: Some(minutes),
                    ..Evidence::swipes([out.timestamp, back.timestamp])
                },
            );
        }
    }

    fn check_unpaired_entries(&mut self) {
        let duty = self.duty_window();
        let overtime_close = self.overtime.map(|form| self.clock.at(form.end_time));

        for pair in self.events.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            if !(first.is_in() && second.is_in()) {
                continue;
            }
            if !(duty.contains(first.time()) || duty.contains(second.time())) {
                continue;
            }
            if overtime_close.is_some_and(|close| first.timestamp >= close) {
                continue;
            }
            self.raise(
                AnomalyCategory::UnpairedEntry,
                Evidence::swipes([first.timestamp, second.timestamp]),
            );
        }
    }

    fn check_unpaired_exits(&mut self) {
        let duty = self.duty_window();
        for pair in self.events.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            if first.is_out()
                && second.is_out()
                && (duty.contains(first.time()) || duty.contains(second.time()))
            {
                self.raise(
                    AnomalyCategory::UnpairedExit,
                    Evidence::swipes([first.timestamp, second.timestamp]),
                );
            }
        }
    }

    fn check_boundaries(&mut self) {
        if let Some(first) = self.events.first().filter(|e| e.is_out()) {
            self.raise(AnomalyCategory::LeadingExit, Evidence::swipes([first.timestamp]));
        }
        if let Some(last) = self.events.last().filter(|e| e.is_in()) {
            self.raise(AnomalyCategory::TrailingEntry, Evidence::swipes([last.timestamp]));
        }
    }

    fn check_overtime_start(&mut self) {
        let Some(form) = self.overtime else {
            return;
        };
        let events = self.events;
        let work_end = self.profile.work_end;
        let Some(boundary) = events
            .iter()
            .find(|e| e.is_out() && same_minute(e.time(), work_end))
        else {
            return;
        };
        if self.instance.shift_type == ShiftType::RestDay && is_standard_pattern(events, self.profile) {
            return;
        }

        let overtime_start = self.clock.at(form.start_time);
        if overtime_start <= boundary.timestamp {
            return;
        }

        let later_outs: Vec<&SwipeEvent> = events
            .iter()
            .filter(|e| e.is_out() && e.timestamp > boundary.timestamp && e.timestamp < overtime_start)
            .collect();

        if later_outs.is_empty() {
            let entered = events
                .iter()
                .any(|e| e.is_in() && e.timestamp > boundary.timestamp && e.timestamp <= overtime_start);
            if !entered {
                self.raise(
                    AnomalyCategory::OvertimeNotEntered,
                    Evidence::swipes([boundary.timestamp]),
                );
            }
            return;
        }

        for out in later_outs {
            let returned = events
                .iter()
                .any(|e| e.is_in() && e.timestamp > out.timestamp && e.timestamp <= overtime_start);
            if !returned {
                self.raise(
                    AnomalyCategory::PreOvertimeOutingNotReturned,
                    Evidence::swipes([out.timestamp]),
                );
            }
        }
    }

    fn check_overtime_duration(&mut self) {
        let Some(assessment) = assess_overtime(
            self.instance.shift_type,
            self.events,
            self.profile,
            &self.clock,
            self.overtime,
            self.thresholds,
        ) else {
            return;
        };
        if !assessment.is_insufficient() {
            return;
        }
        self.raise(
            AnomalyCategory::InsufficientOvertime,
            Evidence {
                duration_minutes: Some(assessment.realized_minutes),
                realized_overtime_hours: Some(assessment.realized_hours().round_dp(2)),
                required_overtime_hours: Some(assessment.required_hours),
                ..Evidence::swipes([assessment.start, assessment.end])
            },
        );
    }
}

/// Evaluates every rule against one shift instance.
///
/// `collapsed` must hold the instance's swipes after burst collapsing.
/// Unknown shifts yield no anomalies. The result depends only on its
/// inputs, so evaluating the same sequence twice yields the same records.
pub fn evaluate_shift(
    instance: &ShiftInstance,
    collapsed: &CollapsedEvents,
    joins: &JoinTables,
    config: &AuditConfig,
) -> Vec<AnomalyRecord> {
    let Some(profile) = config.profile(instance.shift_type) else {
        return Vec::new();
    };

    let clock = if profile.crosses_midnight() {
        ShiftClock::overnight(instance.anchor_date, config.night_anchoring.pivot)
    } else {
        ShiftClock::same_day(instance.anchor_date)
    };

    let mut rules = ShiftRules {
        instance,
        events: &collapsed.events,
        profile,
        clock,
        overtime: joins.overtime_for(&instance.employee_id, instance.anchor_date),
        leave: joins.leave_for(&instance.employee_id, instance.anchor_date),
        thresholds: &config.thresholds,
        anomalies: Vec::new(),
    };

    rules.check_ambiguous_bursts(&collapsed.ambiguous_bursts);
    rules.check_late_arrival();
    rules.check_early_departure();
    rules.check_excess_outings();
    rules.check_unpaired_entries();
    rules.check_unpaired_exits();
    rules.check_boundaries();
    rules.check_overtime_start();
    rules.check_overtime_duration();

    rules.anomalies
}
