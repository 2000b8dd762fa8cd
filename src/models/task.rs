//! Task model: a unit of work the solver places into the horizon.
//!
//! # Reference
//! Field set and dependency vocabulary are ported from `missminutes.tasks.Task`
//! (see `examples/original_source/`), collapsed to a single concrete struct —
//! the original's `RecurringTask(Task)` subclass is out of scope here, since
//! recurrence expansion is a caller concern this crate does not implement.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::calendar::TimeProfile;

/// The kind of ordering relationship a task can declare against another
/// task or event, by target id. Which ones actually constrain placement
/// depends on what the id resolves to:
///
/// - Against another **task**, only [`DependencyKind::After`] does
///   anything: it drives the topological rank used to seed the priority
///   heap. The remaining variants are accepted and round-tripped but
///   otherwise reserved — this greedy placement algorithm has no model for
///   task-to-task `DURING`/`CONTAINS`/`CONCURRENT`, and rejecting them at
///   validation would block callers from recording a hierarchy they still
///   want to query independently of solving.
/// - Against an **event**, `Before`/`After`/`During` each trim the
///   dependent's eligibility domain directly: end before the event starts,
///   start after the event ends, or lie entirely within it. `Contains` and
///   `Concurrent` are reserved here too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    Before,
    After,
    During,
    Contains,
    Concurrent,
}

/// A unit of work to be scheduled into one or more [`crate::models::Session`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    /// Total time this task needs, cumulative across all its sessions.
    pub duration: Duration,
    /// How much of `duration` has not yet been placed. Starts equal to
    /// `duration`; the solver decrements it on every committed session and
    /// never lets it go negative (a negative result is an
    /// [`crate::error::SolveError::InconsistentState`], not a clamp).
    pub remaining_duration: Duration,

    /// Latest instant by which the task must be fully placed. `None` means
    /// no deadline.
    pub due: Option<DateTime<Utc>>,
    /// Earliest instant the task may be placed. `None` means no constraint.
    pub starts_at: Option<DateTime<Utc>>,

    /// Recurring weekly eligibility windows. Intersected together (a task
    /// is only eligible where *every* assigned profile allows it); if empty,
    /// the task is eligible across the whole horizon subject to its other
    /// constraints.
    pub time_profiles: Vec<TimeProfile>,

    /// Ordering relationships by target id, against either another task or
    /// an event — the presolver resolves which at domain-construction time.
    pub dependencies: Vec<(String, DependencyKind)>,

    /// Floor on any single session's length. Must be at least one minute.
    pub min_session_length: Duration,
    /// Ceiling on any single session's length. Defaults to
    /// `remaining_duration` when `None`, i.e. the task may be placed in one
    /// sitting.
    pub max_session_length: Option<Duration>,

    /// Buffer reserved immediately before a placed session, subtracted from
    /// every task's eligibility domain (including this task's own) once
    /// committed.
    pub buffer_before: Duration,
    /// Buffer reserved immediately after a placed session.
    pub buffer_after: Duration,

    /// Reserved for callers that pin a task to a schedule they manage
    /// outside this solver. Not read by `presolve` or `solve`.
    pub fixed_schedule: bool,
}

impl Task {
    pub fn new(id: impl Into<String>, duration: Duration) -> Self {
        Task {
            id: id.into(),
            title: String::new(),
            duration,
            remaining_duration: duration,
            due: None,
            starts_at: None,
            time_profiles: Vec::new(),
            dependencies: Vec::new(),
            min_session_length: Duration::minutes(crate::models::time::MIN_SESSION_MINUTES),
            max_session_length: None,
            buffer_before: Duration::zero(),
            buffer_after: Duration::zero(),
            fixed_schedule: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_starts_at(mut self, starts_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    pub fn with_time_profile(mut self, profile: TimeProfile) -> Self {
        self.time_profiles.push(profile);
        self
    }

    pub fn with_dependency(mut self, target_id: impl Into<String>, kind: DependencyKind) -> Self {
        self.dependencies.push((target_id.into(), kind));
        self
    }

    pub fn with_min_session_length(mut self, min: Duration) -> Self {
        self.min_session_length = min;
        self
    }

    pub fn with_max_session_length(mut self, max: Duration) -> Self {
        self.max_session_length = Some(max);
        self
    }

    pub fn with_buffers(mut self, before: Duration, after: Duration) -> Self {
        self.buffer_before = before;
        self.buffer_after = after;
        self
    }

    /// `AFTER` dependencies only: candidate target ids this task must start
    /// after. The presolver resolves each against the task index to decide
    /// whether it contributes to topological rank (task target) or is
    /// handled separately as a domain trim (event target).
    pub fn after_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .filter(|(_, kind)| matches!(kind, DependencyKind::After))
            .map(|(id, _)| id.as_str())
    }

    pub fn is_fully_placed(&self) -> bool {
        self.remaining_duration <= Duration::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_starts_with_full_remaining_duration() {
        let t = Task::new("t1", Duration::hours(2));
        assert_eq!(t.remaining_duration, Duration::hours(2));
        assert!(!t.is_fully_placed());
    }

    #[test]
    fn new_task_defaults_min_session_length_to_the_grid_minimum() {
        let t = Task::new("t1", Duration::hours(2));
        assert_eq!(t.min_session_length, Duration::minutes(5));
    }

    #[test]
    fn after_dependencies_filters_other_kinds() {
        let t = Task::new("t1", Duration::hours(1))
            .with_dependency("t0", DependencyKind::After)
            .with_dependency("t2", DependencyKind::Concurrent);
        let after: Vec<_> = t.after_dependencies().collect();
        assert_eq!(after, vec!["t0"]);
    }

    #[test]
    fn builder_sets_all_fields() {
        let due = Utc::now();
        let t = Task::new("t1", Duration::hours(3))
            .with_title("Write report")
            .with_due(due)
            .with_min_session_length(Duration::minutes(15))
            .with_max_session_length(Duration::hours(1))
            .with_buffers(Duration::minutes(5), Duration::minutes(10));
        assert_eq!(t.title, "Write report");
        assert_eq!(t.due, Some(due));
        assert_eq!(t.min_session_length, Duration::minutes(15));
        assert_eq!(t.max_session_length, Some(Duration::hours(1)));
        assert_eq!(t.buffer_before, Duration::minutes(5));
        assert_eq!(t.buffer_after, Duration::minutes(10));
    }
}
