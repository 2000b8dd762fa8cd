//! Output projection: group committed sessions and fixed events by calendar
//! day, for a caller that wants to render or iterate a schedule day by day.
//! This is the only shape-for-display concern this crate implements;
//! anything resembling pretty-printing or a rendered calendar view is out
//! of scope.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Event, Session};

/// One placed session or fixed event, tagged with its kind and completion
/// flag, for a single day's agenda.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgendaItem {
    Session { task_id: String, start: DateTime<Utc>, end: DateTime<Utc>, completed: bool },
    Event { event_id: String, title: String, start: DateTime<Utc>, end: DateTime<Utc>, completed: bool },
}

impl AgendaItem {
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            AgendaItem::Session { start, .. } => *start,
            AgendaItem::Event { start, .. } => *start,
        }
    }
}

/// Group sessions and events by the calendar day (UTC) their start instant
/// falls on, with each day's items ordered by start time.
pub fn project_by_day(sessions: &[Session], events: &[Event]) -> BTreeMap<NaiveDate, Vec<AgendaItem>> {
    let mut days: BTreeMap<NaiveDate, Vec<AgendaItem>> = BTreeMap::new();

    for session in sessions {
        let item = AgendaItem::Session {
            task_id: session.task_id.clone(),
            start: session.start_time,
            end: session.end_time,
            completed: session.completed,
        };
        days.entry(session.start_time.date_naive()).or_default().push(item);
    }

    for event in events {
        let item = AgendaItem::Event {
            event_id: event.id.clone(),
            title: event.title.clone(),
            start: event.start_time,
            end: event.end_time,
            completed: event.completed,
        };
        days.entry(event.start_time.date_naive()).or_default().push(item);
    }

    for items in days.values_mut() {
        items.sort_by_key(|item| item.start());
    }

    days
}
