//! Direct IslamicAPI provider.
//!
//! IslamicAPI reports times in 12-hour form (`"5:42 AM"`). Days are
//! normalised to the same records the backend serves, and days with missing
//! or unreadable fields are dropped.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::fetcher::HttpFetcher;
use super::ScheduleProvider;
use crate::models::location::Coordinates;
use crate::models::schedule::{Schedule, ScheduleRecord};
use crate::utils::date::to_24h_hhmm;

pub const ISLAMIC_API_BASE: &str = "https://islamicapi.com/api/v1/ramadan/";
pub const API_KEY_ENV: &str = "ISLAMIC_API_KEY";

#[derive(Debug, Deserialize)]
struct UpstreamPayload {
    data: UpstreamData,
}

#[derive(Debug, Deserialize)]
struct UpstreamData {
    fasting: Vec<UpstreamDay>,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamDay {
    date: Option<String>,
    #[serde(default)]
    time: UpstreamTimes,
    hijri_readable: Option<String>,
    day: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamTimes {
    sahur: Option<String>,
    iftar: Option<String>,
}

pub struct IslamicApiProvider {
    api_key: String,
    base_url: String,
    fetcher: HttpFetcher,
}

impl IslamicApiProvider {
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            bail!("IslamicAPI key cannot be empty");
        }

        Ok(Self {
            api_key,
            base_url: ISLAMIC_API_BASE.to_string(),
            fetcher: HttpFetcher::new()?,
        })
    }

    /// Use the configured key, falling back to `ISLAMIC_API_KEY`.
    pub fn from_config_or_env(configured: Option<&str>) -> Result<Self> {
        let key = resolve_api_key(configured)
            .ok_or_else(|| anyhow!("Missing {}. Set it in the environment or config", API_KEY_ENV))?;
        Self::new(key)
    }
}

impl ScheduleProvider for IslamicApiProvider {
    fn fetch(&self, coordinates: &Coordinates) -> Result<Schedule> {
        let [lat, lon] = coordinates.query_pairs();
        let query = [lat, lon, ("api_key", self.api_key.clone())];

        let body = self
            .fetcher
            .fetch_text(&self.base_url, &query, Some(&self.api_key))?;
        let records = normalize_fasting_days(&body)?;
        Ok(Schedule::from_records(records))
    }
}

pub(crate) fn resolve_api_key(configured: Option<&str>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var(API_KEY_ENV)
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
        })
}

/// Convert an IslamicAPI payload into backend-shaped records.
pub fn normalize_fasting_days(body: &str) -> Result<Vec<ScheduleRecord>> {
    let payload: UpstreamPayload = serde_json::from_str(body)
        .context("Unexpected IslamicAPI response shape (missing data.fasting)")?;

    let total = payload.data.fasting.len();
    let records = payload
        .data
        .fasting
        .into_iter()
        .filter_map(normalize_day)
        .collect::<Vec<_>>();

    if records.is_empty() {
        bail!("No fasting days returned from IslamicAPI");
    }

    if records.len() < total {
        log::warn!(
            "Dropped {} malformed fasting day(s) from IslamicAPI response",
            total - records.len()
        );
    }

    Ok(records)
}

fn normalize_day(day: UpstreamDay) -> Option<ScheduleRecord> {
    let date = day.date.filter(|d| !d.trim().is_empty())?;
    let sahur = day.time.sahur.as_deref().and_then(to_24h_hhmm)?;
    let iftar = day.time.iftar.as_deref().and_then(to_24h_hhmm)?;

    Some(ScheduleRecord {
        date,
        sahur,
        iftar,
        hijri_readable: day.hijri_readable,
        day: day.day,
    })
}
