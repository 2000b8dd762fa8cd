//! Fixed events: immovable blocks of time the solver must route tasks around.
//!
//! # Reference
//! Ported from `missminutes.events.Event`; the `RecurringEvent` subclass
//! (rrule-based expansion) is out of scope.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Interval, IntervalDomain};

/// A fixed block of time that already occupies the calendar: a meeting, a
/// commute, anything the solver must never schedule a session across.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub completed: bool,
}

impl Event {
    pub fn new(id: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Event {
            id: id.into(),
            title: String::new(),
            start_time,
            end_time,
            completed: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }

    pub fn conflicts_with(&self, other: &Event) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// This event expressed as a weight-1 domain, for subtraction from task
    /// eligibility domains during presolve.
    pub fn to_domain(&self) -> IntervalDomain {
        IntervalDomain::single(self.interval(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, h, m, 0).unwrap()
    }

    #[test]
    fn conflicts_with_detects_overlap_but_not_touching() {
        let a = Event::new("a", t(9, 0), t(10, 0));
        let b = Event::new("b", t(9, 30), t(11, 0));
        let c = Event::new("c", t(10, 0), t(11, 0));
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));
    }

    #[test]
    fn to_domain_is_a_single_weight_one_piece() {
        let e = Event::new("a", t(9, 0), t(10, 0));
        let d = e.to_domain();
        assert_eq!(d.iter_atomic().collect::<Vec<_>>(), vec![(e.interval(), 1)]);
    }
}
