//! The placement loop's public entry point: `solve`.
//!
//! # Reference
//! `solve` is `ConstraintSolver.solve` in `missminutes.constraint_solver`,
//! decomposed into `presolve` (see [`crate::presolve`]) plus a per-iteration
//! [`placement::place_one`].

mod placement;
pub(crate) mod scoring;

use std::collections::HashMap;

use chrono::Duration;
use tracing::info;

use crate::error::SolveError;
use crate::models::{Event, Session, Task};
use crate::presolve::{presolve, Horizon};

/// The outcome of a `solve` run: every committed session, plus any task
/// that still has unplaced duration left over (under-scheduling is data,
/// never an error — see [`SolveError`]).
#[derive(Debug, Clone, Default)]
pub struct SolveReport {
    pub sessions: Vec<Session>,
    pub residuals: HashMap<String, Duration>,
}

/// Place as much of `tasks` as possible into `horizon` without conflicting
/// with `events`, mutating each task's `remaining_duration` as sessions are
/// committed.
///
/// This is a deterministic greedy heuristic, not an optimal solver: once a
/// session is committed it is never moved or reconsidered, even if a later
/// decision would have produced a better overall packing.
pub fn solve(tasks: &mut [Task], events: &[Event], horizon: Horizon) -> Result<SolveReport, SolveError> {
    let presolved = presolve(tasks, events, horizon)?;
    let mut overlap = presolved.overlap;
    let mut heap = presolved.heap;

    info!(tasks = tasks.len(), events = events.len(), "starting placement loop");

    let mut sessions = Vec::new();
    while !heap.is_empty() {
        if let Some(session) = placement::place_one(&mut heap, &mut overlap, tasks)? {
            sessions.push(session);
        }
    }

    let residuals: HashMap<String, Duration> = tasks
        .iter()
        .filter(|t| t.remaining_duration > Duration::zero())
        .map(|t| (t.id.clone(), t.remaining_duration))
        .collect();

    info!(sessions = sessions.len(), residuals = residuals.len(), "placement loop finished");

    Ok(SolveReport { sessions, residuals })
}
