use std::sync::Arc;

use chrono::NaiveDateTime;

use super::format::format_countdown;
use super::resolver::resolve;
use crate::models::next_event::NextEvent;
use crate::models::schedule::Schedule;

/// What the render sink receives on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownView {
    pub next_event: Option<NextEvent>,
    /// `HH:MM:SS` until `next_event`, absent when there is no next event.
    pub remaining: Option<String>,
}

impl CountdownView {
    /// Derive the view for `now` from scratch.
    pub fn compute(schedule: &Schedule, now: NaiveDateTime) -> Self {
        let next_event = resolve(schedule, now);
        let remaining = next_event
            .as_ref()
            .map(|event| format_countdown(event.remaining(now)));
        Self {
            next_event,
            remaining,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.next_event.is_none()
    }
}

/// Fired when the event being counted down to has been reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTransition {
    pub reached: NextEvent,
    pub upcoming: Option<NextEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub view: CountdownView,
    pub transition: Option<EventTransition>,
}

/// Holds the current schedule and recomputes the countdown on each tick.
pub struct CountdownService {
    schedule: Arc<Schedule>,
    last_event: Option<NextEvent>,
}

impl CountdownService {
    pub fn new(schedule: Arc<Schedule>) -> Self {
        Self {
            schedule,
            last_event: None,
        }
    }

    pub fn schedule(&self) -> &Arc<Schedule> {
        &self.schedule
    }

    /// Swap in a freshly fetched schedule. The old one is never patched.
    pub fn replace_schedule(&mut self, schedule: Arc<Schedule>) {
        log::info!(
            "Countdown schedule replaced ({} -> {} entries)",
            self.schedule.len(),
            schedule.len()
        );
        self.schedule = schedule;
    }

    /// Recompute the view for `now` and report whether the previously awaited
    /// event has just been reached.
    pub fn tick(&mut self, now: NaiveDateTime) -> TickOutcome {
        let view = CountdownView::compute(&self.schedule, now);

        let transition = match self.last_event.take() {
            Some(previous) if previous.at <= now && view.next_event.as_ref() != Some(&previous) => {
                log::debug!("{} reached at {}", previous.kind, previous.at);
                Some(EventTransition {
                    reached: previous,
                    upcoming: view.next_event.clone(),
                })
            }
            _ => None,
        };

        self.last_event = view.next_event.clone();

        TickOutcome { view, transition }
    }
}
