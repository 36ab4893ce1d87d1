//! Periodic clock driver for the live countdown.
//!
//! The driver ticks on a fixed cadence and hands the callback a fresh local
//! instant. Stopping is immediate: once [`ClockHandle::stop`] has returned,
//! the callback is never invoked again, even for a tick that was already due.
//! This holds on both runtime flavors. The stopped check and the callback run
//! under one gate, so `stop` called from another worker waits out a tick that
//! is already in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration as StdDuration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
}

#[derive(Default)]
struct Shared {
    stopped: AtomicBool,
    gate: Mutex<()>,
    wake: Notify,
}

impl Shared {
    /// Runs `f` unless the driver has been stopped. Returns false once stopped.
    fn run_unless_stopped(&self, f: impl FnOnce()) -> bool {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if self.stopped.load(Ordering::Acquire) {
            return false;
        }
        f();
        true
    }
}

pub struct ClockDriver {
    interval: StdDuration,
    clock: Arc<dyn Clock>,
}

impl ClockDriver {
    pub fn new(interval: StdDuration, clock: Arc<dyn Clock>) -> Self {
        // tokio intervals reject a zero period
        let interval = interval.max(StdDuration::from_millis(1));
        Self { interval, clock }
    }

    pub fn with_system_clock(interval: StdDuration) -> Self {
        Self::new(interval, Arc::new(SystemClock))
    }

    pub fn interval(&self) -> StdDuration {
        self.interval
    }

    /// Start ticking. The first tick fires immediately.
    ///
    /// Must be called from within a tokio runtime. Each callback runs to
    /// completion before the next tick is awaited, so ticks never overlap.
    pub fn start<F>(&self, mut on_tick: F) -> ClockHandle
    where
        F: FnMut(NaiveDateTime) + Send + 'static,
    {
        let shared = Arc::new(Shared::default());
        let task_shared = Arc::clone(&shared);
        let clock = Arc::clone(&self.clock);
        let period = self.interval;

        log::debug!("Clock driver starting with {:?} interval", period);

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = task_shared.wake.notified() => break,
                    _ = ticker.tick() => {
                        if !task_shared.run_unless_stopped(|| on_tick(clock.now())) {
                            break;
                        }
                    }
                }
            }

            log::debug!("Clock driver stopped");
        });

        ClockHandle {
            shared,
            task: Some(task),
        }
    }
}

/// Handle to a running driver. Dropping the handle stops the driver.
pub struct ClockHandle {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl ClockHandle {
    pub fn state(&self) -> DriverState {
        let finished = self.task.as_ref().map_or(true, |task| task.is_finished());
        if self.shared.stopped.load(Ordering::Acquire) || finished {
            DriverState::Stopped
        } else {
            DriverState::Running
        }
    }

    /// Stop ticking. Safe to call more than once.
    ///
    /// Blocks until a callback already in progress has returned, so it must
    /// not be called from inside the callback itself.
    pub fn stop(&self) {
        if !self.shared.stopped.swap(true, Ordering::AcqRel) {
            drop(self.shared.gate.lock().unwrap_or_else(PoisonError::into_inner));
            self.shared.wake.notify_one();
        }
    }

    /// Stop ticking and wait for the tick task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                log::warn!("Clock driver task ended abnormally: {}", err);
            }
        }
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn fixed_instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn counting_driver(interval_ms: u64) -> (ClockDriver, Arc<AtomicUsize>) {
        let driver = ClockDriver::new(
            StdDuration::from_millis(interval_ms),
            Arc::new(FixedClock(fixed_instant())),
        );
        (driver, Arc::new(AtomicUsize::new(0)))
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_on_fixed_cadence() {
        let (driver, count) = counting_driver(250);
        let counter = Arc::clone(&count);
        let handle = driver.start(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(StdDuration::from_millis(1_100)).await;
        let ticks = count.load(Ordering::SeqCst);
        assert!((4..=6).contains(&ticks), "unexpected tick count {}", ticks);
        assert_eq!(handle.state(), DriverState::Running);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_stop() {
        let (driver, count) = counting_driver(250);
        let counter = Arc::clone(&count);
        let handle = driver.start(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(StdDuration::from_millis(600)).await;
        handle.stop();
        assert_eq!(handle.state(), DriverState::Stopped);
        let at_stop = count.load(Ordering::SeqCst);

        time::sleep(StdDuration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_first_tick_fires_nothing() {
        let (driver, count) = counting_driver(250);
        let counter = Arc::clone(&count);
        let handle = driver.start(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        handle.stop();
        handle.shutdown().await;
        time::sleep(StdDuration::from_secs(5)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_driver() {
        let (driver, count) = counting_driver(100);
        let counter = Arc::clone(&count);
        let handle = driver.start(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(StdDuration::from_millis(250)).await;
        drop(handle);
        let at_drop = count.load(Ordering::SeqCst);

        time::sleep(StdDuration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_drop);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_receives_clock_time() {
        let (driver, _) = counting_driver(250);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handle = driver.start(move |now| {
            sink.lock().unwrap().push(now);
        });

        time::sleep(StdDuration::from_millis(300)).await;
        handle.shutdown().await;

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|now| *now == fixed_instant()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stop_waits_for_in_flight_tick() {
        let (driver, count) = counting_driver(10);
        let entered = Arc::new(AtomicBool::new(false));
        let counter = Arc::clone(&count);
        let flag = Arc::clone(&entered);
        let handle = driver.start(move |_| {
            flag.store(true, Ordering::SeqCst);
            std::thread::sleep(StdDuration::from_millis(50));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        while !entered.load(Ordering::SeqCst) {
            time::sleep(StdDuration::from_millis(1)).await;
        }
        handle.stop();
        let at_stop = count.load(Ordering::SeqCst);
        assert!(at_stop >= 1, "stop returned while a tick was still running");

        time::sleep(StdDuration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_stop);
        handle.shutdown().await;
    }

    #[test]
    fn zero_interval_is_clamped() {
        let driver = ClockDriver::with_system_clock(StdDuration::ZERO);
        assert_eq!(driver.interval(), StdDuration::from_millis(1));
    }
}
