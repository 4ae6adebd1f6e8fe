//! Fixed-tick scheduler with a live-read interval
//!
//! The interval lives in the settings table and may be changed by the CLI at
//! any time. It is read again on every tick, so a shorter interval takes
//! effect without restarting the daemon.

use crate::monitor::{CycleReport, PriceMonitor};
use async_trait::async_trait;
use farewatch_core::Result;
use farewatch_db::SettingsRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Something that runs a full check cycle
#[async_trait]
pub trait CheckCycle: Send + Sync {
    async fn run_cycle(&self) -> Result<CycleReport>;
}

#[async_trait]
impl CheckCycle for PriceMonitor {
    async fn run_cycle(&self) -> Result<CycleReport> {
        PriceMonitor::run_cycle(self).await
    }
}

/// Where the scheduler reads the time between cycles from
#[async_trait]
pub trait IntervalSource: Send + Sync {
    async fn check_interval(&self) -> Result<Duration>;
}

#[async_trait]
impl IntervalSource for SettingsRepository {
    async fn check_interval(&self) -> Result<Duration> {
        let minutes = self.check_frequency_minutes().await?;
        Ok(Duration::from_secs(minutes.saturating_mul(60)))
    }
}

/// Runs check cycles whenever the configured interval has elapsed
pub struct Scheduler {
    cycle: Arc<dyn CheckCycle>,
    interval: Arc<dyn IntervalSource>,
    tick: Duration,
    last_run: Option<Instant>,
}

impl Scheduler {
    pub fn new(
        cycle: Arc<dyn CheckCycle>,
        interval: Arc<dyn IntervalSource>,
        tick: Duration,
    ) -> Self {
        Self {
            cycle,
            interval,
            tick,
            last_run: None,
        }
    }

    /// When the last cycle started
    pub fn last_run(&self) -> Option<Instant> {
        self.last_run
    }

    /// Run one cycle now, then poll every tick. Never returns; the caller
    /// stops it by dropping the future.
    pub async fn run(&mut self) {
        info!("Scheduler started (tick {}s)", self.tick.as_secs());
        self.run_cycle_at(Instant::now()).await;

        loop {
            tokio::time::sleep(self.tick).await;
            if let Err(e) = self.poll(Instant::now()).await {
                warn!("Failed to read check interval: {}", e);
            }
        }
    }

    /// Run a cycle if the interval (read fresh) has elapsed since the last
    /// one. Returns whether a cycle ran.
    pub async fn poll(&mut self, now: Instant) -> Result<bool> {
        let interval = self.interval.check_interval().await?;

        let due = match self.last_run {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= interval,
        };

        if !due {
            debug!("Next check not due yet (interval {}m)", interval.as_secs() / 60);
            return Ok(false);
        }

        info!("Interval of {} minutes elapsed, running check", interval.as_secs() / 60);
        self.run_cycle_at(now).await;
        Ok(true)
    }

    async fn run_cycle_at(&mut self, now: Instant) {
        if let Err(e) = self.cycle.run_cycle().await {
            error!("Price check cycle failed: {}", e);
        }
        self.last_run = Some(now);
    }
}
