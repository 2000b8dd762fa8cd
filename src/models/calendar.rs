//! `TimeProfile`: a recurring weekly eligibility pattern, projected onto a
//! concrete horizon as an [`IntervalDomain`].

use crate::domain::{Interval, IntervalDomain};
use crate::models::time::DayOfWeek;
use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Timelike, Utc};

/// A single eligible clock-time window on one or more days of the week,
/// e.g. "weekdays 09:00-12:00".
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        TimeWindow { start, end }
    }
}

/// A recurring weekly eligibility pattern: a set of clock-time windows per
/// day of week. Projected onto a horizon by [`TimeProfile::project`] to
/// produce the eligibility domain a task's other constraints are intersected
/// against.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeProfile {
    windows: Vec<(DayOfWeek, TimeWindow)>,
}

impl TimeProfile {
    pub fn new() -> Self {
        TimeProfile::default()
    }

    /// Add a window for a single day, builder-style.
    pub fn with_window(mut self, day: DayOfWeek, window: TimeWindow) -> Self {
        self.windows.push((day, window));
        self
    }

    /// Add the same window across several days at once, e.g.
    /// `profile.with_window_on_days(&DayOfWeek::ALL[0..5], TimeWindow::new(...))`
    /// for "every weekday".
    pub fn with_window_on_days(mut self, days: &[DayOfWeek], window: TimeWindow) -> Self {
        for &day in days {
            self.windows.push((day, window));
        }
        self
    }

    pub fn windows(&self) -> &[(DayOfWeek, TimeWindow)] {
        &self.windows
    }

    /// Project this weekly pattern onto `[horizon_start, horizon_end)` as a
    /// weight-1 domain. Each calendar day in range contributes the windows
    /// registered for its weekday, clipped to the horizon.
    pub fn project(&self, horizon_start: DateTime<Utc>, horizon_end: DateTime<Utc>) -> IntervalDomain {
        let mut result = IntervalDomain::empty();
        if horizon_start >= horizon_end {
            return result;
        }
        let mut day_cursor = horizon_start.date_naive();
        let last_day = horizon_end.date_naive();
        while day_cursor <= last_day {
            let weekday = DayOfWeek::from_chrono(day_cursor.weekday());
            for (d, window) in &self.windows {
                if *d != weekday {
                    continue;
                }
                let start = Utc.from_utc_datetime(&day_cursor.and_time(window.start)).max(horizon_start);
                let end = Utc.from_utc_datetime(&day_cursor.and_time(window.end)).min(horizon_end);
                if start < end {
                    result = result.union(&IntervalDomain::single(Interval::new(start, end), 1));
                }
            }
            day_cursor += Duration::days(1);
        }
        result
    }
}

/// Build a [`NaiveTime`] from an hour/minute pair, for constructing
/// [`TimeWindow`]s without pulling in a full clock-string parser (out of
/// scope per the solver's Non-goals).
pub fn time_of_day(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid hour/minute")
}

/// Minutes since local midnight for a `DateTime<Utc>`, used by the output
/// projection's day grouping.
pub fn minutes_since_midnight(instant: DateTime<Utc>) -> u32 {
    instant.hour() * 60 + instant.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(y: i32, mo: u32, d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, m, 0).unwrap()
    }

    #[test]
    fn projects_single_day_window() {
        // 2026-01-05 is a Monday.
        let profile = TimeProfile::new().with_window(DayOfWeek::Monday, TimeWindow::new(time_of_day(9, 0), time_of_day(12, 0)));
        let dt = profile.project(t(2026, 1, 5, 0, 0), t(2026, 1, 6, 0, 0));
        let pieces: Vec<_> = dt.iter_atomic().collect();
        assert_eq!(pieces, vec![(Interval::new(t(2026, 1, 5, 9, 0), t(2026, 1, 5, 12, 0)), 1)]);
    }

    #[test]
    fn projects_repeating_weekday_windows_across_horizon() {
        let weekdays = &DayOfWeek::ALL[0..5];
        let profile = TimeProfile::new().with_window_on_days(weekdays, TimeWindow::new(time_of_day(9, 0), time_of_day(17, 0)));
        // Mon 2026-01-05 through Sun 2026-01-11: 5 weekdays in range.
        let dt = profile.project(t(2026, 1, 5, 0, 0), t(2026, 1, 12, 0, 0));
        assert_eq!(dt.piece_count(), 5);
        assert_eq!(dt.total_time(), Duration::hours(8) * 5);
    }

    #[test]
    fn clips_windows_to_horizon_bounds() {
        let profile = TimeProfile::new().with_window(DayOfWeek::Monday, TimeWindow::new(time_of_day(9, 0), time_of_day(12, 0)));
        let dt = profile.project(t(2026, 1, 5, 10, 0), t(2026, 1, 5, 11, 0));
        assert_eq!(dt.total_time(), Duration::hours(1));
    }
}
