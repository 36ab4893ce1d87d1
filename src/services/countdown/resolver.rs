//! Next-event resolution.
//!
//! Works out which sahur or iftar comes next for a given local instant.
//! Only events strictly after `now` count; an event whose instant equals `now`
//! has already passed.

use chrono::NaiveDateTime;

use crate::models::next_event::{EventKind, NextEvent};
use crate::models::schedule::Schedule;

/// Resolve the next upcoming event, or `None` when the schedule has nothing
/// left after `now`.
pub fn resolve(schedule: &Schedule, now: NaiveDateTime) -> Option<NextEvent> {
    let today = now.date();

    if let Some(entry) = schedule.entry_for(today) {
        let next_today = [
            (EventKind::Sahur, entry.sahur_at()),
            (EventKind::Iftar, entry.iftar_at()),
        ]
        .into_iter()
        .filter(|(_, at)| *at > now)
        .min_by_key(|(kind, at)| (*at, *kind));

        if let Some((kind, at)) = next_today {
            return Some(NextEvent::new(kind, at));
        }
    }

    schedule
        .next_after(today)
        .map(|entry| NextEvent::new(EventKind::Sahur, entry.sahur_at()))
}
