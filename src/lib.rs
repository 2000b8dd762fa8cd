//! A personal time-block scheduler.
//!
//! Places [`Task`]s into a wall-clock [`Horizon`] around fixed [`Event`]s, a
//! deterministic greedy heuristic in the lineage of classic list-scheduling
//! algorithms rather than an optimal solver. See [`solve`] for the
//! placement loop and [`presolve`] for the feasibility-checking phase that
//! runs before it.
//!
//! # Modules
//!
//! - **`domain`**: `IntervalDomain`, the weighted interval algebra every
//!   other component is built on.
//! - **`models`**: `Task`, `Event`, `Session`, `TimeProfile`, `DayOfWeek`.
//! - **`validation`**: structural input checks.
//! - **`presolve`**: eligibility domain construction, topological ranking,
//!   priority heap seeding.
//! - **`scheduler`**: the placement loop and its slot-scoring functions.
//! - **`output`**: day-grouped agenda projection.
//!
//! # Non-goals
//!
//! This crate does not implement a CLI/TUI, persistent storage, calendar
//! sync, recurrence expansion, configuration loading, or date/time string
//! parsing and pretty-printing. Callers that need those build them on top.

pub mod domain;
pub mod error;
pub mod models;
pub mod output;
pub mod presolve;
pub mod scheduler;
pub mod validation;

pub use domain::{Interval, IntervalDomain};
pub use error::SolveError;
pub use models::{DayOfWeek, DependencyKind, Event, Session, Task, TimeProfile, TimeWindow};
pub use output::{project_by_day, AgendaItem};
pub use presolve::{presolve, Horizon, Presolved};
pub use scheduler::{solve, SolveReport};
