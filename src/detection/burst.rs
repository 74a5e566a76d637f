//! Burst collapsing.
//!
//! Badge readers often register one physical swipe several times. A burst
//! is a run of swipes that all fall within the burst window of the run's
//! first swipe.

use chrono::{Duration, NaiveDateTime};

use crate::models::SwipeEvent;

/// The swipes of one shift instance after burst collapsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapsedEvents {
    /// Retained swipes, still in time order.
    pub events: Vec<SwipeEvent>,
    /// Timestamps of every burst that mixed directions.
    pub ambiguous_bursts: Vec<Vec<NaiveDateTime>>,
}

impl CollapsedEvents {
    /// Wraps a sequence that needs no collapsing.
    pub fn from_events(events: Vec<SwipeEvent>) -> Self {
        Self {
            events,
            ambiguous_bursts: Vec::new(),
        }
    }
}

/// Collapses bursts in a time-ordered swipe sequence.
///
/// A burst whose swipes all share one direction keeps only its last swipe.
/// A burst that mixes directions keeps every swipe and is recorded in
/// [`CollapsedEvents::ambiguous_bursts`].
///
/// # Example
///
/// ```
/// use chrono::NaiveDateTime;
/// use swipe_audit::detection::collapse_bursts;
/// use swipe_audit::models::{Direction, SwipeEvent};
///
/// let swipe = |time: &str, row| SwipeEvent {
///     employee_id: "E1".to_string(),
///     timestamp: NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M:%S").unwrap(),
///     direction: Direction::In,
///     raw_source_tag: "in".to_string(),
///     shift_label: "day".to_string(),
///     source_row: row,
/// };
///
/// let collapsed = collapse_bursts(
///     &[swipe("2026-01-15 07:58:00", 0), swipe("2026-01-15 07:59:30", 1)],
///     120,
/// );
/// assert_eq!(collapsed.events.len(), 1);
/// assert_eq!(collapsed.events[0].source_row, 1);
/// ```
pub fn collapse_bursts(events: &[SwipeEvent], window_seconds: i64) -> CollapsedEvents {
    let window = Duration::seconds(window_seconds);
    let mut collapsed = CollapsedEvents::default();
    let mut start = 0;

    while start < events.len() {
        let first = events[start].timestamp;
        let mut end = start + 1;
        while end < events.len() && events[end].timestamp - first <= window {
            end += 1;
        }

        let burst = &events[start..end];
        let direction = burst[0].direction;
        if burst.iter().all(|event| event.direction == direction) {
            collapsed.events.push(burst[burst.len() - 1].clone());
        } else {
            collapsed.events.extend(burst.iter().cloned());
            collapsed
                .ambiguous_bursts
                .push(burst.iter().map(|event| event.timestamp).collect());
        }

        start = end;
    }

    collapsed
}
