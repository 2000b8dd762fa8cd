//! The placement loop: repeatedly pop the highest-priority task, find the
//! best compatible atomic slot, binary-search the longest duration that
//! keeps every other task feasible, and commit a session.
//!
//! # Reference
//! Structurally a direct port of `ConstraintSolver.solve` in
//! `missminutes.constraint_solver` — pop highest pressure, score slots,
//! apply a min-session-length filter, commit, subtract the committed
//! interval (plus buffers) from every outstanding domain, recompute
//! pressures, and rebuild the heap. The binary search over candidate
//! durations and the composite three-term slot score are this crate's own
//! additions; the original always takes a slot's full remaining length.

use chrono::Duration;
use tracing::{debug, warn};

use crate::domain::Interval;
use crate::error::SolveError;
use crate::models::{time::GRID_MINUTES, Session, Task};
use crate::presolve::{effective_max_duration, effective_min_duration, sort_heap, HeapEntry};
use crate::scheduler::scoring;

use crate::domain::IntervalDomain;

/// Run one full pop-score-commit round. Returns `Ok(Some(session))` on a
/// successful commit, `Ok(None)` if the popped task could not be placed
/// this round (it remains a residual), or `Err` on an inconsistent state.
pub(crate) fn place_one(
    heap: &mut Vec<HeapEntry>,
    overlap: &mut IntervalDomain,
    tasks: &mut [Task],
) -> Result<Option<Session>, SolveError> {
    let mut entry = heap.remove(0);
    let idx = entry.task_idx;

    let eff_min = effective_min_duration(&tasks[idx]);
    entry.domain = entry.domain.prune_shorter_than(eff_min);
    if entry.domain.is_empty() {
        warn!(task = %entry.task_id, "no remaining slot meets the effective minimum session length");
        return Ok(None);
    }

    let eff_max = effective_max_duration(&tasks[idx]);
    let due = tasks[idx].due;
    // Ascending by composite score — the first slot that yields a compatible
    // duration wins, so the lowest-scored slots are tried first.
    let mut slots: Vec<Interval> = entry.domain.iter_atomic().map(|(iv, _)| iv).collect();
    slots.sort_by(|a, b| {
        scoring::composite(*a, overlap, eff_max, due).total_cmp(&scoring::composite(*b, overlap, eff_max, due))
    });

    let buffer_before = tasks[idx].buffer_before;
    let buffer_after = tasks[idx].buffer_after;

    let committed = slots
        .iter()
        .find_map(|slot| find_best_duration(*slot, eff_min, eff_max, buffer_before, buffer_after, heap, tasks).map(|d| (*slot, d)));

    let (slot, duration) = match committed {
        Some(x) => x,
        None => {
            warn!(task = %entry.task_id, "no candidate slot keeps the rest of the heap feasible; task becomes a residual");
            return Ok(None);
        }
    };

    let session = Session::new(tasks[idx].id.clone(), slot.lo, slot.lo + duration);
    debug!(task = %entry.task_id, start = %session.start_time, minutes = duration.num_minutes(), "committed session");

    let new_remaining = tasks[idx].remaining_duration - duration;
    if new_remaining < Duration::zero() {
        return Err(SolveError::InconsistentState {
            task_id: tasks[idx].id.clone(),
            message: "committed session duration exceeds remaining_duration".into(),
        });
    }
    tasks[idx].remaining_duration = new_remaining;

    let reserved = Interval::new(slot.lo - buffer_before, slot.lo + duration + buffer_after);

    if new_remaining > Duration::zero() {
        entry.domain = entry.domain.remove(reserved);
        entry.pressure = scoring::pressure(&entry.domain, overlap, new_remaining);
        heap.push(entry);
    } else {
        *overlap = overlap.subtract(&entry.domain);
    }

    for other in heap.iter_mut() {
        other.domain = other.domain.remove(reserved);
        let other_task = &tasks[other.task_idx];
        if other.domain.total_time() < other_task.remaining_duration {
            return Err(SolveError::InconsistentState {
                task_id: other_task.id.clone(),
                message: "committing a session left another task without enough eligible time for its remaining duration".into(),
            });
        }
        other.pressure = scoring::pressure(&other.domain, overlap, other_task.remaining_duration);
    }

    sort_heap(heap);
    Ok(Some(session))
}

/// Binary-search the grid for the longest duration in `[eff_min, eff_max]`
/// (also capped to the slot's own length) for which reserving
/// `[slot.lo - buffer_before, slot.lo + d + buffer_after)` leaves every
/// other heap entry with at least as much eligible time as its remaining
/// duration. Returns `None` if even the minimum duration is incompatible.
fn find_best_duration(
    slot: Interval,
    eff_min: Duration,
    eff_max: Duration,
    buffer_before: Duration,
    buffer_after: Duration,
    heap: &[HeapEntry],
    tasks: &[Task],
) -> Option<Duration> {
    let max_fit = crate::models::time::floor_duration_to_grid(eff_max.min(slot.duration()));
    let min_needed = crate::models::time::ceil_duration_to_grid(eff_min);
    if max_fit < min_needed {
        return None;
    }

    let reserved_for = |units: i64| -> Interval {
        let d = Duration::minutes(units * GRID_MINUTES);
        Interval::new(slot.lo - buffer_before, slot.lo + d + buffer_after)
    };

    let min_units = min_needed.num_minutes() / GRID_MINUTES;
    let max_units = max_fit.num_minutes() / GRID_MINUTES;

    if !is_compatible(reserved_for(min_units), heap, tasks) {
        return None;
    }

    let mut lo = min_units;
    let mut hi = max_units;
    let mut best = lo;
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        if is_compatible(reserved_for(mid), heap, tasks) {
            best = mid;
            lo = mid + 1;
        } else if mid == 0 {
            break;
        } else {
            hi = mid - 1;
        }
    }
    Some(Duration::minutes(best * GRID_MINUTES))
}

fn is_compatible(reserved: Interval, heap: &[HeapEntry], tasks: &[Task]) -> bool {
    heap.iter().all(|other| {
        let remaining_after = other.domain.remove(reserved).total_time();
        remaining_after >= tasks[other.task_idx].remaining_duration
    })
}
