use chrono::Duration;

/// Format a remaining duration as `HH:MM:SS`.
///
/// Negative durations render as zero. Hours are not wrapped at 24 and the
/// sub-second remainder is truncated.
pub fn format_countdown(remaining: Duration) -> String {
    format_countdown_millis(remaining.num_milliseconds())
}

pub fn format_countdown_millis(millis: i64) -> String {
    let total_seconds = millis.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
