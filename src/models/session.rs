//! `Session`: a solver-committed time block for a task.
//!
//! # Reference
//! Ported from `missminutes.tasks.Session`, with the original's
//! caller-supplied `session_id: str` replaced by a solver-minted
//! [`uuid::Uuid`] — sessions are created only by [`crate::scheduler::solve`],
//! never by a caller, so there is no external id to preserve.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Interval;

/// A committed, non-overlapping block of time placed for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub task_id: String,
    pub session_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub completed: bool,
}

impl Session {
    pub fn new(task_id: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Session {
            task_id: task_id.into(),
            session_id: Uuid::new_v4(),
            start_time,
            end_time,
            completed: false,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }

    pub fn mark_complete(&mut self) {
        self.completed = true;
    }
}
