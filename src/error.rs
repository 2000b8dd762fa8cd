//! Error taxonomy for the scheduling solver.
//!
//! Mirrors the failure modes in the design: invalid caller input is rejected
//! before any solving begins, infeasibility and cycles are detected during
//! presolve, and an inconsistent post-commit state aborts an in-progress run.
//! Under-scheduling is never an error — it is reported as data via
//! [`crate::SolveReport::residuals`].

use thiserror::Error;

/// Failure kinds the solver can report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    /// Caller-supplied data violates a structural invariant (negative
    /// duration, `end <= start`, negative buffer, `due < starts_at`, ...).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A task's constructed eligibility domain has less total time than the
    /// task's remaining duration, discovered before any placement is
    /// attempted.
    #[error("task '{task_id}' is infeasible before search: needs {needed_minutes}m but only {available_minutes}m of eligible time remain after constraints")]
    InfeasibleBeforeSearch {
        task_id: String,
        needed_minutes: i64,
        available_minutes: i64,
    },

    /// The task-dependency graph contains a cycle.
    #[error("cyclic task dependency detected involving task '{task_id}'")]
    CyclicDependencies { task_id: String },

    /// A post-commit invariant failed. This should be unreachable if the
    /// compatibility check in the placement loop is correct; its presence
    /// signals a solver bug rather than bad input.
    #[error("inconsistent state after committing a session for task '{task_id}': {message}")]
    InconsistentState { task_id: String, message: String },
}
