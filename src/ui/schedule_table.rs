use std::io::{self, Write};

use chrono::NaiveDate;

use crate::models::schedule::Schedule;

/// Print the schedule as a table in date order, marking `today`.
pub fn write_schedule_table<W: Write>(out: &mut W, schedule: &Schedule, today: NaiveDate) -> io::Result<()> {
    if schedule.is_empty() {
        return writeln!(out, "Schedule is empty");
    }

    writeln!(
        out,
        "  {:<10}  {:<10}  {:<6}  {:<6}  {}",
        "Date", "Day", "Sahur", "Iftar", "Hijri"
    )?;

    for entry in schedule.sorted() {
        let marker = if entry.date == today { '>' } else { ' ' };
        writeln!(
            out,
            "{} {:<10}  {:<10}  {:<6}  {:<6}  {}",
            marker,
            entry.date.format("%Y-%m-%d").to_string(),
            entry.label.as_deref().unwrap_or("-"),
            entry.sahur_time.format("%H:%M").to_string(),
            entry.iftar_time.format("%H:%M").to_string(),
            entry.readable_date.as_deref().unwrap_or("")
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::ScheduleEntry;
    use chrono::NaiveTime;

    #[test]
    fn test_table_is_sorted_and_marks_today() {
        let mut second = ScheduleEntry::new(
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            NaiveTime::from_hms_opt(5, 41, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 49, 0).unwrap(),
        );
        second.label = Some("Sunday".to_string());
        let first = ScheduleEntry::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveTime::from_hms_opt(5, 42, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 48, 0).unwrap(),
        );
        let schedule = Schedule::new(vec![second, first]);

        let mut out = Vec::new();
        write_schedule_table(&mut out, &schedule, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("  2025-03-01"));
        assert!(lines[2].starts_with("> 2025-03-02"));
        assert!(lines[2].contains("Sunday"));
        assert!(lines[2].contains("05:41"));
    }

    #[test]
    fn test_empty_schedule() {
        let mut out = Vec::new();
        write_schedule_table(&mut out, &Schedule::default(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Schedule is empty\n");
    }
}
