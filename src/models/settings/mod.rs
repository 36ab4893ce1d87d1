// Settings module
// Application configuration persisted as TOML

use serde::{Deserialize, Serialize};

use crate::models::location::Coordinates;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 250;
pub const DEFAULT_REFRESH_INTERVAL_MINUTES: u64 = 360;

/// Which collaborator supplies the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// The schedule backend's `/ramadan` endpoint.
    #[default]
    Backend,
    /// IslamicAPI directly, normalised locally.
    IslamicApi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tick_interval_ms: u64,
    /// Minutes between schedule refreshes; 0 disables refreshing.
    pub refresh_interval_minutes: u64,
    pub notifications: bool,
    pub cache_schedule: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            provider: ProviderKind::Backend,
            api_key: None,
            latitude: None,
            longitude: None,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            refresh_interval_minutes: DEFAULT_REFRESH_INTERVAL_MINUTES,
            notifications: true,
            cache_schedule: true,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms == 0 {
            return Err("Tick interval must be greater than 0 ms".to_string());
        }

        if self.tick_interval_ms > 1000 {
            return Err("Tick interval must be at most 1000 ms to keep the countdown accurate to the second".to_string());
        }

        let url = self.backend_url.trim();
        if self.provider == ProviderKind::Backend
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err("Backend URL must start with http:// or https://".to_string());
        }

        match (self.latitude, self.longitude) {
            (Some(_), None) | (None, Some(_)) => {
                return Err("Latitude and longitude must be set together".to_string());
            }
            _ => {}
        }

        if let Some(coordinates) = self.coordinates() {
            coordinates.validate()?;
        }

        Ok(())
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}
