use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::utils::date::{at_time, parse_calendar_date, parse_time_of_day};

/// One day of the fasting schedule, already parsed into calendar types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub sahur_time: NaiveTime,
    pub iftar_time: NaiveTime,
    pub label: Option<String>,
    pub readable_date: Option<String>,
}

impl ScheduleEntry {
    pub fn new(date: NaiveDate, sahur_time: NaiveTime, iftar_time: NaiveTime) -> Self {
        Self {
            date,
            sahur_time,
            iftar_time,
            label: None,
            readable_date: None,
        }
    }

    pub fn sahur_at(&self) -> NaiveDateTime {
        at_time(self.date, self.sahur_time)
    }

    pub fn iftar_at(&self) -> NaiveDateTime {
        at_time(self.date, self.iftar_time)
    }
}

/// Wire representation of a day as served by the schedule backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub date: String,
    pub sahur: String,
    pub iftar: String,
    #[serde(default)]
    pub hijri_readable: Option<String>,
    #[serde(default)]
    pub day: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryParseError {
    #[error("invalid calendar date '{0}'")]
    InvalidDate(String),
    #[error("invalid {field} time '{value}'")]
    InvalidTime { field: &'static str, value: String },
}

impl TryFrom<ScheduleRecord> for ScheduleEntry {
    type Error = EntryParseError;

    fn try_from(record: ScheduleRecord) -> Result<Self, Self::Error> {
        let date = parse_calendar_date(&record.date)
            .ok_or_else(|| EntryParseError::InvalidDate(record.date.clone()))?;
        let sahur_time =
            parse_time_of_day(&record.sahur).ok_or_else(|| EntryParseError::InvalidTime {
                field: "sahur",
                value: record.sahur.clone(),
            })?;
        let iftar_time =
            parse_time_of_day(&record.iftar).ok_or_else(|| EntryParseError::InvalidTime {
                field: "iftar",
                value: record.iftar.clone(),
            })?;

        Ok(Self {
            date,
            sahur_time,
            iftar_time,
            label: record.day.and_then(value_to_label),
            readable_date: record.hijri_readable.filter(|s| !s.trim().is_empty()),
        })
    }
}

fn value_to_label(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// The fasting schedule for a bounded window of days.
///
/// Entries are kept in the order they were received; lookups compare dates
/// chronologically and never rely on that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ScheduleEntry>", into = "Vec<ScheduleEntry>")]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl From<Vec<ScheduleEntry>> for Schedule {
    fn from(entries: Vec<ScheduleEntry>) -> Self {
        Self::new(entries)
    }
}

impl From<Schedule> for Vec<ScheduleEntry> {
    fn from(schedule: Schedule) -> Self {
        schedule.entries
    }
}

impl Schedule {
    /// Build a schedule, dropping any entry whose date is already present.
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        let mut unique: Vec<ScheduleEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if unique.iter().any(|existing| existing.date == entry.date) {
                log::warn!("Dropping duplicate schedule entry for {}", entry.date);
                continue;
            }
            unique.push(entry);
        }
        Self { entries: unique }
    }

    /// Build a schedule from wire records, skipping records that do not parse.
    pub fn from_records(records: Vec<ScheduleRecord>) -> Self {
        let total = records.len();
        let entries = records
            .into_iter()
            .filter_map(|record| match ScheduleEntry::try_from(record) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("Skipping schedule entry: {}", err);
                    None
                }
            })
            .collect::<Vec<_>>();

        if entries.len() < total {
            log::warn!(
                "Schedule kept {} of {} entries after parsing",
                entries.len(),
                total
            );
        }

        Self::new(entries)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_for(&self, date: NaiveDate) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|entry| entry.date == date)
    }

    /// The entry with the smallest date strictly after `date`.
    pub fn next_after(&self, date: NaiveDate) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.date > date)
            .min_by_key(|entry| entry.date)
    }

    /// Entries sorted chronologically, for display.
    pub fn sorted(&self) -> Vec<&ScheduleEntry> {
        let mut sorted = self.entries.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|entry| entry.date);
        sorted
    }

    /// First and last dates covered by the schedule.
    pub fn horizon(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.entries.iter().map(|entry| entry.date).min()?;
        let last = self.entries.iter().map(|entry| entry.date).max()?;
        Some((first, last))
    }
}
