use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{self, Error as SerdeError};

use crate::models::location::Coordinates;
use crate::models::schedule::Schedule;

/// Last successfully fetched schedule, kept for offline use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSchedule {
    pub coordinates: Coordinates,
    pub fetched_at: NaiveDateTime,
    pub schedule: Schedule,
}

pub struct ScheduleCache {
    path: PathBuf,
}

impl ScheduleCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<CachedSchedule>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read schedule cache from {}", self.path.display()))?;
        let cached = serde_json::from_str(&data).map_err(|err| map_deser_error(err, &self.path))?;
        Ok(Some(cached))
    }

    /// Cached schedule for `coordinates`, if one exists for a nearby location.
    pub fn load_for(&self, coordinates: &Coordinates) -> Result<Option<CachedSchedule>> {
        Ok(self
            .load()?
            .filter(|cached| cached.coordinates.is_near(coordinates)))
    }

    pub fn save(&self, cached: &CachedSchedule) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let data = serde_json::to_string_pretty(cached)?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write schedule cache to {}", self.path.display()))?;
        Ok(())
    }
}

fn map_deser_error(err: SerdeError, path: &Path) -> anyhow::Error {
    anyhow::Error::new(err).context(format!(
        "failed to deserialize schedule cache from {}",
        path.display()
    ))
}
