//! The presolver: turns raw `Task`/`Event` input into per-task eligibility
//! domains, a combined demand-overlap domain, and a priority heap ready for
//! the placement loop.
//!
//! # Reference
//! Domain construction mirrors `Task.project_time_domain` and
//! `ConstraintSolver.presolve` in `missminutes.constraint_solver`; the
//! topological ranking is `ConstraintSolver.topo_rank`, ported from its
//! recursive depth computation with Python's "raise on revisit" cycle check
//! replaced by an explicit three-state DFS.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::domain::{Interval, IntervalDomain};
use crate::error::SolveError;
use crate::models::{DependencyKind, Event, Task};
use crate::scheduler::scoring::pressure;
use crate::validation;

/// The wall-clock window the solver is allowed to place sessions within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Horizon {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Horizon { start, end }
    }

    fn full_domain(&self) -> IntervalDomain {
        IntervalDomain::single(Interval::new(self.start, self.end), 1)
    }
}

/// One task's entry in the priority heap: its working eligibility domain,
/// topological rank, and current pressure score.
#[derive(Debug, Clone)]
pub struct HeapEntry {
    pub task_id: String,
    pub(crate) task_idx: usize,
    pub rank: u32,
    pub pressure: f64,
    pub domain: IntervalDomain,
}

/// The result of presolving: the combined weighted-demand domain and the
/// initial heap, exposed read-only so a caller can inspect feasibility
/// without committing to a full `solve`.
#[derive(Debug, Clone)]
pub struct Presolved {
    pub overlap: IntervalDomain,
    pub heap: Vec<HeapEntry>,
}

/// Build eligibility domains for every task, validate feasibility, and seed
/// the priority heap. Does not place anything — see [`crate::scheduler::solve`]
/// for the placement loop.
pub fn presolve(tasks: &[Task], events: &[Event], horizon: Horizon) -> Result<Presolved, SolveError> {
    validation::validate_inputs(tasks, events)?;

    let index_of: HashMap<&str, usize> = tasks.iter().enumerate().map(|(i, t)| (t.id.as_str(), i)).collect();
    let event_by_id: HashMap<&str, &Event> = events.iter().map(|e| (e.id.as_str(), e)).collect();

    let event_domain = events.iter().fold(IntervalDomain::empty(), |acc, e| acc.add(&e.to_domain()));

    let mut domains = Vec::with_capacity(tasks.len());
    for task in tasks {
        // Eligibility within the horizon: every assigned time profile
        // intersected together, or the whole horizon at weight 1 if none.
        let mut dt = if task.time_profiles.is_empty() {
            horizon.full_domain()
        } else {
            let mut acc = horizon.full_domain();
            for profile in &task.time_profiles {
                acc = acc.intersection(&profile.project(horizon.start, horizon.end));
            }
            acc
        };

        // Clip to [max(horizon.start, starts_at), min(horizon.end, due)].
        if let Some(starts_at) = task.starts_at {
            dt = dt.trim_left(starts_at);
        }
        if let Some(due) = task.due {
            dt = dt.trim_right(due);
        }

        // Remove fixed events outright.
        dt = dt.difference(&event_domain);

        // Apply this task's event-targeted dependencies.
        for (dep_id, kind) in &task.dependencies {
            if let Some(event) = event_by_id.get(dep_id.as_str()) {
                dt = match kind {
                    DependencyKind::Before => dt.trim_right(event.start_time),
                    DependencyKind::After => dt.trim_left(event.end_time),
                    DependencyKind::During => dt.intersection(&IntervalDomain::single(event.interval(), 1)),
                    DependencyKind::Contains | DependencyKind::Concurrent => dt,
                };
            }
        }

        debug!(task = %task.id, pieces = dt.piece_count(), "built eligibility domain");
        domains.push(dt);
    }

    let overlap = domains.iter().fold(IntervalDomain::empty(), |acc, dt| acc.add(dt));

    // Per-task feasibility is asserted before any rank is computed, so an
    // input that is both infeasible and cyclic surfaces
    // `InfeasibleBeforeSearch` rather than `CyclicDependencies`.
    for (i, task) in tasks.iter().enumerate() {
        let dt = &domains[i];
        if dt.total_time() < task.remaining_duration {
            warn!(task = %task.id, "infeasible before search");
            return Err(SolveError::InfeasibleBeforeSearch {
                task_id: task.id.clone(),
                needed_minutes: task.remaining_duration.num_minutes(),
                available_minutes: dt.total_time().num_minutes(),
            });
        }
    }

    // Topological rank: depth in the task-to-task AFTER graph only. Event
    // targets are not part of this graph — they constrain a task's own
    // eligibility domain directly, above.
    let mut rank_cache: Vec<Option<u32>> = vec![None; tasks.len()];
    let mut state = vec![0u8; tasks.len()];
    for i in 0..tasks.len() {
        visit_rank(i, tasks, &index_of, &mut rank_cache, &mut state)?;
    }

    let mut heap = Vec::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        let dt = &domains[i];
        let rank = rank_cache[i].unwrap();
        let p = pressure(dt, &overlap, task.remaining_duration);
        heap.push(HeapEntry {
            task_id: task.id.clone(),
            task_idx: i,
            rank,
            pressure: p,
            domain: dt.clone(),
        });
    }
    sort_heap(&mut heap);

    Ok(Presolved { overlap, heap })
}

/// Sort heap entries so the next task to place is at the front: lowest
/// topological rank first, then highest pressure, then task id for
/// determinism.
pub(crate) fn sort_heap(heap: &mut [HeapEntry]) {
    heap.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| b.pressure.total_cmp(&a.pressure))
            .then_with(|| a.task_id.cmp(&b.task_id))
    });
}

/// Depth in the task-to-task `AFTER` graph: a task with no `AFTER`
/// dependency on another task has rank 0; a dependent's rank is one more
/// than the deepest prerequisite's. Event-targeted dependencies don't
/// participate — `index_of.get` simply misses them.
fn visit_rank(
    i: usize,
    tasks: &[Task],
    index_of: &HashMap<&str, usize>,
    cache: &mut Vec<Option<u32>>,
    state: &mut Vec<u8>,
) -> Result<u32, SolveError> {
    if let Some(rank) = cache[i] {
        return Ok(rank);
    }
    if state[i] == 1 {
        return Err(SolveError::CyclicDependencies { task_id: tasks[i].id.clone() });
    }
    state[i] = 1;

    let mut depth = 0u32;
    for dep_id in tasks[i].after_dependencies() {
        if let Some(&j) = index_of.get(dep_id) {
            let dep_rank = visit_rank(j, tasks, index_of, cache, state)?;
            depth = depth.max(dep_rank + 1);
        }
    }

    state[i] = 2;
    cache[i] = Some(depth);
    Ok(depth)
}

/// The greater of the solver's grid minimum and
/// `min(task.min_session_length, task.remaining_duration)`, rounded up to
/// the 5-minute grid.
pub(crate) fn effective_min_duration(task: &Task) -> Duration {
    let floor = Duration::minutes(crate::models::time::MIN_SESSION_MINUTES);
    let capped = task.min_session_length.min(task.remaining_duration);
    crate::models::time::ceil_duration_to_grid(floor.max(capped))
}

/// Effective maximum session length: the task's own cap, clamped to its
/// remaining duration (never worth placing more than what's left).
pub(crate) fn effective_max_duration(task: &Task) -> Duration {
    let cap = task.max_session_length.unwrap_or(task.remaining_duration);
    cap.min(task.remaining_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DependencyKind;
    use chrono::TimeZone;

    fn t(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, h, 0, 0).unwrap()
    }

    fn horizon() -> Horizon {
        Horizon::new(t(0), t(0) + Duration::days(1))
    }

    #[test]
    fn presolve_builds_full_horizon_domain_with_no_constraints() {
        let tasks = vec![Task::new("t1", Duration::hours(1))];
        let presolved = presolve(&tasks, &[], horizon()).unwrap();
        assert_eq!(presolved.heap.len(), 1);
        assert_eq!(presolved.heap[0].domain.total_time(), Duration::days(1));
    }

    #[test]
    fn presolve_subtracts_events_from_eligibility() {
        let tasks = vec![Task::new("t1", Duration::hours(1))];
        let events = vec![Event::new("e1", t(9), t(17))];
        let presolved = presolve(&tasks, &events, horizon()).unwrap();
        assert_eq!(presolved.heap[0].domain.total_time(), Duration::days(1) - Duration::hours(8));
    }

    #[test]
    fn presolve_detects_infeasible_task() {
        let tasks = vec![Task::new("t1", Duration::hours(1)).with_starts_at(t(23)).with_due(t(23) + Duration::minutes(30))];
        let result = presolve(&tasks, &[], horizon());
        assert!(matches!(result, Err(SolveError::InfeasibleBeforeSearch { .. })));
    }

    #[test]
    fn presolve_detects_cycles() {
        let tasks = vec![
            Task::new("a", Duration::hours(1)).with_dependency("b", DependencyKind::After),
            Task::new("b", Duration::hours(1)).with_dependency("a", DependencyKind::After),
        ];
        let result = presolve(&tasks, &[], horizon());
        assert!(matches!(result, Err(SolveError::CyclicDependencies { .. })));
    }

    #[test]
    fn infeasibility_is_reported_before_a_cycle_on_the_same_input() {
        // "a" is both infeasible on its own (needs 1h, only 30m eligible)
        // and part of an AFTER cycle with "b" — feasibility is step 2 of
        // the algorithm and the cycle check is step 3, so the infeasible
        // task must be reported first.
        let tasks = vec![
            Task::new("a", Duration::hours(1))
                .with_starts_at(t(23))
                .with_due(t(23) + Duration::minutes(30))
                .with_dependency("b", DependencyKind::After),
            Task::new("b", Duration::hours(1)).with_dependency("a", DependencyKind::After),
        ];
        let result = presolve(&tasks, &[], horizon());
        assert!(matches!(result, Err(SolveError::InfeasibleBeforeSearch { .. })));
    }

    #[test]
    fn presolve_ranks_dependent_tasks_after_prerequisites() {
        let tasks = vec![
            Task::new("a", Duration::hours(1)),
            Task::new("b", Duration::hours(1)).with_dependency("a", DependencyKind::After),
        ];
        let presolved = presolve(&tasks, &[], horizon()).unwrap();
        let rank_a = presolved.heap.iter().find(|e| e.task_id == "a").unwrap().rank;
        let rank_b = presolved.heap.iter().find(|e| e.task_id == "b").unwrap().rank;
        assert!(rank_b > rank_a);
    }

    #[test]
    fn before_event_dependency_trims_eligibility_to_end_before_the_event_starts() {
        let tasks = vec![Task::new("t1", Duration::hours(1)).with_dependency("e1", DependencyKind::Before)];
        let events = vec![Event::new("e1", t(10), t(11))];
        let presolved = presolve(&tasks, &events, horizon()).unwrap();
        let domain = &presolved.heap[0].domain;
        for (piece, _) in domain.iter_atomic() {
            assert!(piece.hi <= t(10));
        }
    }

    #[test]
    fn after_event_dependency_trims_eligibility_to_start_after_the_event_ends() {
        let tasks = vec![Task::new("t1", Duration::hours(1)).with_dependency("e1", DependencyKind::After)];
        let events = vec![Event::new("e1", t(10), t(11))];
        let presolved = presolve(&tasks, &events, horizon()).unwrap();
        let domain = &presolved.heap[0].domain;
        for (piece, _) in domain.iter_atomic() {
            assert!(piece.lo >= t(11));
        }
    }

    #[test]
    fn during_event_dependency_confines_eligibility_to_the_event_interval() {
        let tasks = vec![Task::new("t1", Duration::minutes(30)).with_dependency("e1", DependencyKind::During)];
        let events = vec![Event::new("e1", t(10), t(11))];
        let presolved = presolve(&tasks, &events, horizon()).unwrap();
        let domain = &presolved.heap[0].domain;
        assert_eq!(domain.total_time(), Duration::hours(1));
        for (piece, _) in domain.iter_atomic() {
            assert!(piece.lo >= t(10) && piece.hi <= t(11));
        }
    }

    #[test]
    fn task_to_task_after_dependency_does_not_trim_eligibility_directly() {
        // Ordering between tasks is enforced by rank-driven pop order, not
        // by a domain trim — unlike an event-targeted AFTER dependency.
        let tasks = vec![
            Task::new("a", Duration::hours(2)).with_starts_at(t(0)),
            Task::new("b", Duration::hours(1)).with_dependency("a", DependencyKind::After),
        ];
        let presolved = presolve(&tasks, &[], horizon()).unwrap();
        let b_domain = &presolved.heap.iter().find(|e| e.task_id == "b").unwrap().domain;
        assert_eq!(b_domain.total_time(), Duration::days(1));
    }

    #[test]
    fn effective_min_duration_is_capped_by_remaining_duration_and_rounded_up() {
        let mut task = Task::new("t1", Duration::minutes(23)).with_min_session_length(Duration::minutes(40));
        task.remaining_duration = Duration::minutes(23);
        // min(40m, 23m) = 23m, floored... no, ceil'd up to the next 5-minute mark: 25m.
        assert_eq!(effective_min_duration(&task), Duration::minutes(25));
    }

    #[test]
    fn effective_min_duration_floors_at_the_grid_minimum() {
        let task = Task::new("t1", Duration::hours(1)).with_min_session_length(Duration::minutes(1));
        assert_eq!(effective_min_duration(&task), Duration::minutes(5));
    }
}
