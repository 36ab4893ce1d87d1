// Ramadan Countdown
// Main entry point

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration as StdDuration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::sync::watch;

use ramadan_countdown::models::location::Coordinates;
use ramadan_countdown::models::schedule::Schedule;
use ramadan_countdown::models::settings::{AppConfig, ProviderKind};
use ramadan_countdown::services::countdown::{ClockDriver, CountdownService};
use ramadan_countdown::services::notification::NotificationService;
use ramadan_countdown::services::schedule::{
    fetch_with_cache, BackendScheduleProvider, IslamicApiProvider, ScheduleCache, ScheduleProvider,
};
use ramadan_countdown::services::settings::{default_cache_path, default_config_path, SettingsService};
use ramadan_countdown::ui::{write_schedule_table, RenderSink, TerminalRenderer};

/// How long Ctrl+C waits for in-flight blocking work before abandoning it.
const SHUTDOWN_GRACE: StdDuration = StdDuration::from_secs(1);

#[derive(Debug, Parser)]
#[command(name = "ramadan-countdown", version, about = "Live countdown to the next sahur or iftar")]
struct Cli {
    /// Latitude of the viewer, e.g. 40.7128
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the viewer, e.g. -74.0060
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Base URL of the schedule backend
    #[arg(long)]
    backend_url: Option<String>,

    /// Where to request the schedule from
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,

    /// Path to a config file (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Countdown refresh cadence in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Print the schedule table and exit
    #[arg(long)]
    schedule: bool,

    /// Use the cached schedule without contacting any provider
    #[arg(long)]
    offline: bool,

    /// Disable desktop notifications
    #[arg(long)]
    no_notify: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(lat) = self.lat {
            config.latitude = Some(lat);
        }
        if let Some(lon) = self.lon {
            config.longitude = Some(lon);
        }
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.no_notify {
            config.notifications = false;
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = SettingsService::new(&config_path).get()?;
    cli.apply_to(&mut config);
    config.validate().map_err(|e| anyhow!("Invalid settings: {}", e))?;

    let coordinates = config
        .coordinates()
        .context("No location configured; pass --lat and --lon or set them in the config file")?;

    log::info!(
        "Starting Ramadan Countdown for ({}, {}) via {:?}",
        coordinates.latitude,
        coordinates.longitude,
        config.provider
    );

    let cache = config
        .cache_schedule
        .then(|| ScheduleCache::new(default_cache_path()));

    let (schedule, provider) = if cli.offline {
        (load_offline(cache.as_ref(), &coordinates)?, None)
    } else {
        let provider = build_provider(&config)?;
        let (schedule, _) = fetch_with_cache(
            provider.as_ref(),
            cache.as_ref(),
            &coordinates,
            Local::now().naive_local(),
        )?;
        (schedule, Some(provider))
    };

    if cli.schedule {
        let mut stdout = std::io::stdout();
        write_schedule_table(&mut stdout, &schedule, Local::now().date_naive())?;
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    let result = runtime.block_on(run_countdown(config, coordinates, schedule, provider, cache));
    shutdown_runtime(runtime);
    result
}

/// A refresh fetch running on the blocking pool cannot be aborted, and it may
/// sit in retries for a while. Give it a short grace period, then leave it.
fn shutdown_runtime(runtime: tokio::runtime::Runtime) {
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}

fn build_provider(config: &AppConfig) -> Result<Arc<dyn ScheduleProvider>> {
    Ok(match config.provider {
        ProviderKind::Backend => Arc::new(BackendScheduleProvider::new(&config.backend_url)?),
        ProviderKind::IslamicApi => {
            Arc::new(IslamicApiProvider::from_config_or_env(config.api_key.as_deref())?)
        }
    })
}

fn load_offline(cache: Option<&ScheduleCache>, coordinates: &Coordinates) -> Result<Schedule> {
    let Some(cache) = cache else {
        bail!("--offline needs the schedule cache, but caching is disabled in the config");
    };

    let cached = cache
        .load_for(coordinates)?
        .with_context(|| format!("No cached schedule for this location at {}", cache.path().display()))?;

    log::info!("Using cached schedule fetched at {}", cached.fetched_at);
    Ok(cached.schedule)
}

async fn run_countdown(
    config: AppConfig,
    coordinates: Coordinates,
    schedule: Schedule,
    provider: Option<Arc<dyn ScheduleProvider>>,
    cache: Option<ScheduleCache>,
) -> Result<()> {
    let (schedule_tx, mut schedule_rx) = watch::channel(Arc::new(schedule));

    let mut service = CountdownService::new(Arc::clone(&schedule_rx.borrow_and_update()));
    let renderer = Arc::new(Mutex::new(TerminalRenderer::stdout()));
    let tick_renderer = Arc::clone(&renderer);
    let mut notifier = NotificationService::new();
    notifier.set_enabled(config.notifications);

    let driver = ClockDriver::with_system_clock(StdDuration::from_millis(config.tick_interval_ms));
    let handle = driver.start(move |now| {
        if schedule_rx.has_changed().unwrap_or(false) {
            service.replace_schedule(Arc::clone(&schedule_rx.borrow_and_update()));
        }

        let outcome = service.tick(now);

        if let Some(transition) = outcome.transition {
            log::info!("{} reached", transition.reached.kind);
            if notifier.is_enabled() {
                let notifier = notifier.clone();
                tokio::task::spawn_blocking(move || {
                    if let Err(err) = notifier.show_event_alert(&transition) {
                        log::warn!("{:#}", err);
                    }
                });
            }
        }

        let mut renderer = tick_renderer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = renderer.render(&outcome.view) {
            log::warn!("Failed to render countdown: {}", err);
        }
    });

    let refresh = match (provider, config.refresh_interval_minutes) {
        (Some(provider), minutes) if minutes > 0 => Some(tokio::spawn(refresh_schedule(
            provider,
            cache,
            coordinates,
            StdDuration::from_secs(minutes * 60),
            schedule_tx,
        ))),
        _ => None,
    };

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    handle.shutdown().await;
    if let Some(refresh) = refresh {
        refresh.abort();
    }

    if let Err(err) = renderer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .finish()
    {
        log::warn!("Failed to finish countdown line: {}", err);
    }
    log::info!("Ramadan Countdown stopped");
    Ok(())
}

async fn refresh_schedule(
    provider: Arc<dyn ScheduleProvider>,
    cache: Option<ScheduleCache>,
    coordinates: Coordinates,
    every: StdDuration,
    schedule_tx: watch::Sender<Arc<Schedule>>,
) {
    let cache = cache.map(Arc::new);
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately; the schedule was fetched at startup.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let provider = Arc::clone(&provider);
        let cache = cache.clone();
        let fetched = tokio::task::spawn_blocking(move || {
            fetch_with_cache(
                provider.as_ref(),
                cache.as_deref(),
                &coordinates,
                Local::now().naive_local(),
            )
        })
        .await;

        match fetched {
            Ok(Ok((schedule, false))) => {
                if schedule_tx.send(Arc::new(schedule)).is_err() {
                    break;
                }
            }
            Ok(Ok((_, true))) => log::warn!("Schedule refresh failed; keeping current schedule"),
            Ok(Err(err)) => log::warn!("Schedule refresh failed: {:#}", err),
            Err(err) => log::error!("Schedule refresh task panicked: {}", err),
        }
    }
}
