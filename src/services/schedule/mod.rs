pub mod backend;
pub mod cache;
pub mod fetcher;
pub mod islamic_api;

use anyhow::Result;

use crate::models::location::Coordinates;
use crate::models::schedule::Schedule;

pub use backend::BackendScheduleProvider;
pub use cache::{CachedSchedule, ScheduleCache};
pub use islamic_api::IslamicApiProvider;

/// Supplies a schedule for a location. Implementations may block.
#[cfg_attr(test, mockall::automock)]
pub trait ScheduleProvider: Send + Sync {
    fn fetch(&self, coordinates: &Coordinates) -> Result<Schedule>;
}

/// Fetch a schedule, falling back to the cache when the provider fails.
///
/// Successful fetches are written back to the cache. Returns the schedule and
/// whether it came from the cache.
pub fn fetch_with_cache(
    provider: &dyn ScheduleProvider,
    cache: Option<&ScheduleCache>,
    coordinates: &Coordinates,
    now: chrono::NaiveDateTime,
) -> Result<(Schedule, bool)> {
    match provider.fetch(coordinates) {
        Ok(schedule) => {
            log::info!("Fetched schedule with {} entries", schedule.len());
            if let Some(cache) = cache {
                let cached = CachedSchedule {
                    coordinates: *coordinates,
                    fetched_at: now,
                    schedule: schedule.clone(),
                };
                if let Err(err) = cache.save(&cached) {
                    log::warn!("Failed to cache schedule: {:#}", err);
                }
            }
            Ok((schedule, false))
        }
        Err(err) => {
            let Some(cache) = cache else {
                return Err(err);
            };

            match cache.load_for(coordinates) {
                Ok(Some(cached)) => {
                    log::warn!(
                        "Schedule fetch failed ({:#}); using cached schedule from {}",
                        err,
                        cached.fetched_at
                    );
                    Ok((cached.schedule, true))
                }
                Ok(None) => Err(err),
                Err(cache_err) => {
                    log::warn!("Schedule cache unusable: {:#}", cache_err);
                    Err(err)
                }
            }
        }
    }
}
