//! Input validation: structural checks that reject malformed `Task`/`Event`
//! data before any solving begins.
//!
//! # Reference
//! Follows the same duplicate-id / cycle-detection shape as the teacher
//! crate's validation module, narrowed to the invariants this solver's data
//! model actually has (no resources, no activity DAG — tasks and events are
//! the whole entity set, and the only structural graph is the `AFTER`
//! dependency graph, which the presolver's topological ranking checks for
//! cycles on its own since it needs the same traversal anyway).

use std::collections::HashSet;

use crate::error::SolveError;
use crate::models::{Event, Task};

/// Reject a `tasks`/`events` pair that cannot possibly be solved, before any
/// domain construction happens.
pub fn validate_inputs(tasks: &[Task], events: &[Event]) -> Result<(), SolveError> {
    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            return Err(invalid(format!("duplicate task id '{}'", task.id)));
        }
        if task.duration <= chrono::Duration::zero() {
            return Err(invalid(format!("task '{}' has non-positive duration", task.id)));
        }
        if task.remaining_duration < chrono::Duration::zero() {
            return Err(invalid(format!("task '{}' has negative remaining_duration", task.id)));
        }
        if task.remaining_duration > task.duration {
            return Err(invalid(format!(
                "task '{}' has remaining_duration greater than duration",
                task.id
            )));
        }
        if task.buffer_before < chrono::Duration::zero() || task.buffer_after < chrono::Duration::zero() {
            return Err(invalid(format!("task '{}' has a negative buffer", task.id)));
        }
        if let (Some(due), Some(starts_at)) = (task.due, task.starts_at) {
            if due < starts_at {
                return Err(invalid(format!("task '{}' has due before starts_at", task.id)));
            }
        }
        if task.min_session_length < chrono::Duration::minutes(1) {
            return Err(invalid(format!("task '{}' has min_session_length below one minute", task.id)));
        }
        if let Some(max) = task.max_session_length {
            if task.min_session_length > max {
                return Err(invalid(format!(
                    "task '{}' has min_session_length greater than max_session_length",
                    task.id
                )));
            }
        }
        for (dep_id, _) in &task.dependencies {
            if dep_id == &task.id {
                return Err(invalid(format!("task '{}' depends on itself", task.id)));
            }
        }
        for profile in &task.time_profiles {
            for (day, window) in profile.windows() {
                if window.end <= window.start {
                    return Err(invalid(format!(
                        "task '{}' has a time profile window on {:?} with end at or before start",
                        task.id, day
                    )));
                }
            }
        }
    }

    let mut event_ids = HashSet::new();
    for event in events {
        if !event_ids.insert(event.id.as_str()) {
            return Err(invalid(format!("duplicate event id '{}'", event.id)));
        }
        if event.end_time <= event.start_time {
            return Err(invalid(format!("event '{}' has end_time at or before start_time", event.id)));
        }
    }

    for task in tasks {
        for (dep_id, _) in &task.dependencies {
            if !task_ids.contains(dep_id.as_str()) && !event_ids.contains(dep_id.as_str()) {
                return Err(invalid(format!(
                    "task '{}' depends on unknown task or event '{}'",
                    task.id, dep_id
                )));
            }
        }
    }

    Ok(())
}

fn invalid(message: String) -> SolveError {
    SolveError::InvalidInput { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn t(h: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, h, 0, 0).unwrap()
    }

    #[test]
    fn accepts_well_formed_input() {
        let tasks = vec![Task::new("t1", Duration::hours(1))];
        assert!(validate_inputs(&tasks, &[]).is_ok());
    }

    #[test]
    fn rejects_duplicate_task_ids() {
        let tasks = vec![Task::new("t1", Duration::hours(1)), Task::new("t1", Duration::hours(1))];
        assert!(matches!(validate_inputs(&tasks, &[]), Err(SolveError::InvalidInput { .. })));
    }

    #[test]
    fn rejects_non_positive_duration() {
        let tasks = vec![Task::new("t1", Duration::zero())];
        assert!(validate_inputs(&tasks, &[]).is_err());
    }

    #[test]
    fn rejects_due_before_starts_at() {
        let tasks = vec![Task::new("t1", Duration::hours(1)).with_starts_at(t(10)).with_due(t(9))];
        assert!(validate_inputs(&tasks, &[]).is_err());
    }

    #[test]
    fn rejects_unknown_dependency_target() {
        let tasks = vec![Task::new("t1", Duration::hours(1)).with_dependency("ghost", crate::models::DependencyKind::After)];
        assert!(validate_inputs(&tasks, &[]).is_err());
    }

    #[test]
    fn rejects_event_with_non_positive_duration() {
        let events = vec![Event::new("e1", t(10), t(9))];
        assert!(validate_inputs(&[], &events).is_err());
    }

    #[test]
    fn rejects_time_profile_window_with_end_at_or_before_start() {
        use crate::models::calendar::{time_of_day, TimeProfile, TimeWindow};
        use crate::models::DayOfWeek;

        let profile = TimeProfile::new().with_window(DayOfWeek::Monday, TimeWindow::new(time_of_day(12, 0), time_of_day(9, 0)));
        let tasks = vec![Task::new("t1", Duration::hours(1)).with_time_profile(profile)];
        assert!(validate_inputs(&tasks, &[]).is_err());
    }

    #[test]
    fn accepts_dependency_on_an_event() {
        let tasks = vec![Task::new("t1", Duration::hours(1)).with_dependency("e1", crate::models::DependencyKind::Before)];
        let events = vec![Event::new("e1", t(10), t(11))];
        assert!(validate_inputs(&tasks, &events).is_ok());
    }
}
