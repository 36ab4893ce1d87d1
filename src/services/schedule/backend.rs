use anyhow::{Context, Result};

use super::fetcher::HttpFetcher;
use super::ScheduleProvider;
use crate::models::location::Coordinates;
use crate::models::schedule::{Schedule, ScheduleRecord};

/// Requests the schedule from the backend's `/ramadan` endpoint.
pub struct BackendScheduleProvider {
    base_url: String,
    fetcher: HttpFetcher,
}

impl BackendScheduleProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            fetcher: HttpFetcher::new()?,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/ramadan", self.base_url)
    }
}

impl ScheduleProvider for BackendScheduleProvider {
    fn fetch(&self, coordinates: &Coordinates) -> Result<Schedule> {
        let body = self
            .fetcher
            .fetch_text(&self.endpoint(), &coordinates.query_pairs(), None)?;
        parse_backend_response(&body)
    }
}

/// Parse the backend's JSON array of days.
pub fn parse_backend_response(body: &str) -> Result<Schedule> {
    let records: Vec<ScheduleRecord> =
        serde_json::from_str(body).context("Unexpected schedule response shape")?;
    Ok(Schedule::from_records(records))
}
