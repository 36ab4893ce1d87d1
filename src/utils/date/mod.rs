// Date utility functions
// Parsing helpers for schedule dates and times of day

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse a time of day in 24-hour `H:MM` / `HH:MM` form, or 12-hour
/// `H:MM AM` / `HH:MM PM` form. Seconds are always zero.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    parse_24h(trimmed).or_else(|| parse_12h(trimmed))
}

/// Normalise a time string to zero-padded 24-hour `HH:MM`.
pub fn to_24h_hhmm(value: &str) -> Option<String> {
    parse_time_of_day(value).map(|time| time.format("%H:%M").to_string())
}

/// Combine a calendar date and a time of day into a local instant.
pub fn at_time(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

fn parse_24h(value: &str) -> Option<NaiveTime> {
    let (hours, minutes) = value.split_once(':')?;
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
        return None;
    }

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

fn parse_12h(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%I:%M %p").ok()
}
