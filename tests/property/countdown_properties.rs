// Property-based tests for next-event resolution and countdown formatting

#[path = "../fixtures/mod.rs"]
mod fixtures;

use chrono::{Duration, NaiveDateTime};
use fixtures::{date, entry};
use proptest::prelude::*;
use ramadan_countdown::models::next_event::{EventKind, NextEvent};
use ramadan_countdown::models::schedule::Schedule;
use ramadan_countdown::services::countdown::{format_countdown, format_countdown_millis, resolve};

/// A schedule of `len` days starting 1 March 2025, with sahur before iftar,
/// shuffled by `rotate` so array order never matches date order.
fn schedule_strategy() -> impl Strategy<Value = Schedule> {
    (1usize..31, 0usize..31, 3u32..6, 0u32..60, 17u32..20, 0u32..60).prop_map(
        |(len, rotate, sahur_h, sahur_m, iftar_h, iftar_m)| {
            let mut entries = (0..len)
                .map(|offset| {
                    let day = date(2025, 3, 1) + Duration::days(offset as i64);
                    entry(day, (sahur_h, sahur_m), (iftar_h, iftar_m))
                })
                .collect::<Vec<_>>();
            entries.rotate_left(rotate % len);
            Schedule::new(entries)
        },
    )
}

fn instant_in_march(day: u32, seconds: u32) -> NaiveDateTime {
    date(2025, 3, day).and_hms_opt(0, 0, 0).unwrap() + Duration::seconds(seconds as i64)
}

proptest! {
    /// Any resolved event lies strictly in the future.
    #[test]
    fn prop_resolved_event_is_strictly_after_now(
        schedule in schedule_strategy(),
        day in 1u32..=31,
        seconds in 0u32..86_400,
    ) {
        let now = instant_in_march(day, seconds);
        if let Some(next) = resolve(&schedule, now) {
            prop_assert!(next.at > now);
        }
    }

    /// No event in the schedule falls strictly between now and the resolved event.
    #[test]
    fn prop_resolved_event_is_earliest_upcoming(
        schedule in schedule_strategy(),
        day in 1u32..=31,
        seconds in 0u32..86_400,
    ) {
        let now = instant_in_march(day, seconds);
        let earliest = schedule
            .entries()
            .iter()
            .flat_map(|e| [e.sahur_at(), e.iftar_at()])
            .filter(|at| *at > now)
            .min();

        prop_assert_eq!(resolve(&schedule, now).map(|e| e.at), earliest);
    }

    /// After both of today's events, the next event is a sahur on a later day.
    #[test]
    fn prop_after_iftar_next_is_later_sahur(
        schedule in schedule_strategy(),
        day_index in 0usize..30,
        extra in 0i64..240,
    ) {
        let entries = schedule.sorted();
        let today = entries[day_index % entries.len()];
        let now = today.iftar_at() + Duration::minutes(extra);
        prop_assume!(now.date() == today.date);

        if let Some(next) = resolve(&schedule, now) {
            prop_assert_eq!(next.kind, EventKind::Sahur);
            prop_assert!(next.at.date() > today.date);
        }
    }

    /// Resolving twice gives the same answer.
    #[test]
    fn prop_resolve_is_idempotent(
        schedule in schedule_strategy(),
        day in 1u32..=31,
        seconds in 0u32..86_400,
    ) {
        let now = instant_in_march(day, seconds);
        prop_assert_eq!(resolve(&schedule, now), resolve(&schedule, now));
    }

    /// Empty schedules never produce an event.
    #[test]
    fn prop_empty_schedule_is_absent(day in 1u32..=31, seconds in 0u32..86_400) {
        prop_assert!(resolve(&Schedule::default(), instant_in_march(day, seconds)).is_none());
    }

    /// Formatting then reading back the parts recovers the whole seconds.
    #[test]
    fn prop_format_matches_truncated_seconds(millis in 0i64..1_000_000_000_000) {
        let rendered = format_countdown_millis(millis);
        let parts = rendered.split(':').map(|p| p.parse::<i64>().unwrap()).collect::<Vec<_>>();

        prop_assert_eq!(parts.len(), 3);
        prop_assert!(parts[1] < 60 && parts[2] < 60);
        prop_assert_eq!(parts[0] * 3600 + parts[1] * 60 + parts[2], millis / 1000);
    }

    /// Negative durations always clamp to zero.
    #[test]
    fn prop_negative_clamps_to_zero(millis in i64::MIN / 2..0) {
        prop_assert_eq!(format_countdown_millis(millis), "00:00:00");
    }

    /// As now advances toward a fixed event the countdown never increases.
    #[test]
    fn prop_countdown_is_monotonic(
        lead_ms in 0i64..200_000_000,
        step_ms in 1i64..5_000,
    ) {
        let target = date(2025, 3, 10).and_hms_opt(18, 30, 0).unwrap();
        let event = NextEvent::new(EventKind::Iftar, target);
        let first = target - Duration::milliseconds(lead_ms);
        let second = first + Duration::milliseconds(step_ms);

        let a = format_countdown(event.remaining(first));
        let b = format_countdown(event.remaining(second));
        // Zero padded to the same width, so string order is numeric order.
        if a.len() == b.len() {
            prop_assert!(b <= a);
        } else {
            prop_assert!(b.len() < a.len());
        }
    }
}

#[cfg(test)]
mod additional_tests {
    use super::*;

    #[test]
    fn test_before_first_day_returns_first_sahur() {
        let schedule = Schedule::new(vec![
            entry(date(2025, 3, 2), (5, 41), (17, 49)),
            entry(date(2025, 3, 1), (5, 42), (17, 48)),
        ]);
        let next = resolve(&schedule, date(2025, 3, 1).and_hms_opt(0, 0, 1).unwrap()).unwrap();
        assert_eq!(next.kind, EventKind::Sahur);
        assert_eq!(next.at, date(2025, 3, 1).and_hms_opt(5, 42, 0).unwrap());
    }
}
