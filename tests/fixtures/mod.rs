// Test fixtures - reusable schedules
// Provides consistent test data across all test files
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ramadan_countdown::models::schedule::{Schedule, ScheduleEntry};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, s).unwrap()
}

pub fn entry(day: NaiveDate, sahur: (u32, u32), iftar: (u32, u32)) -> ScheduleEntry {
    ScheduleEntry::new(
        day,
        NaiveTime::from_hms_opt(sahur.0, sahur.1, 0).unwrap(),
        NaiveTime::from_hms_opt(iftar.0, iftar.1, 0).unwrap(),
    )
}

/// Two consecutive days, 10-11 March 2025.
pub fn day_boundary_schedule() -> Schedule {
    Schedule::new(vec![
        entry(date(2025, 3, 10), (5, 0), (18, 30)),
        entry(date(2025, 3, 11), (5, 2), (18, 31)),
    ])
}

/// 10 and 12 March 2025 with the 11th missing.
pub fn sparse_schedule() -> Schedule {
    Schedule::new(vec![
        entry(date(2025, 3, 10), (5, 0), (18, 30)),
        entry(date(2025, 3, 12), (4, 58), (18, 32)),
    ])
}

/// A thirty day Ramadan starting 1 March 2025, listed newest first.
pub fn ramadan_2025() -> Schedule {
    let entries = (0..30u32)
        .rev()
        .map(|offset| {
            let day = date(2025, 3, 1) + chrono::Duration::days(offset as i64);
            let sahur_minute = 42 - (offset * 40 / 30);
            let iftar_minute = 48 + (offset * 10 / 30);
            entry(day, (5, sahur_minute), (17, iftar_minute))
        })
        .collect();
    Schedule::new(entries)
}
