//! Scheduling domain models: the concrete types `presolve`/`solve` operate on.

pub mod calendar;
pub mod event;
pub mod session;
pub mod task;
pub mod time;

pub use calendar::{time_of_day, TimeProfile, TimeWindow};
pub use event::Event;
pub use session::Session;
pub use task::{DependencyKind, Task};
pub use time::DayOfWeek;
