//! Daemon wiring: store, gateways, monitor and scheduler

use farewatch_core::{constants, Config, Result};
use farewatch_db::Database;
use farewatch_monitor::{CycleReport, PriceMonitor, Scheduler};
use farewatch_notify::NotificationManager;
use farewatch_pricing::{AmadeusClient, PriceSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Main daemon struct
pub struct Daemon {
    monitor: Arc<PriceMonitor>,
    scheduler: Scheduler,
}

impl Daemon {
    /// Open the store and build the gateways from `config`
    pub async fn new(config: &Config) -> Result<Self> {
        let db_path = config.db_path();
        let db = Database::new(&db_path).await?;
        info!("Database initialized at {}", db_path.display());

        log_credential_status(config);

        let amadeus = config.amadeus.clone().unwrap_or_default();
        let prices: Arc<dyn PriceSource> = Arc::new(AmadeusClient::new(&amadeus));
        let notifications = Arc::new(NotificationManager::from_config(config));

        let monitor = Arc::new(
            PriceMonitor::new(db.clone(), prices, notifications).with_config(&config.monitor),
        );
        info!("Notification policy: {}", monitor.policy());

        let tick = Duration::from_secs(config.monitor.tick_secs.max(1));
        let scheduler = Scheduler::new(monitor.clone(), Arc::new(db.settings()), tick);

        let minutes = db.settings().check_frequency_minutes().await?;
        info!(
            "Checking every {} minutes (read from the database on every tick)",
            minutes
        );

        Ok(Self { monitor, scheduler })
    }

    /// Run the scheduler until the future is dropped
    pub async fn run(mut self) {
        self.scheduler.run().await;
    }

    /// Run one check cycle right away
    pub async fn run_once(&self) -> Result<CycleReport> {
        self.monitor.run_cycle().await
    }
}

fn log_credential_status(config: &Config) {
    if config.amadeus_configured() {
        let base_url = config
            .amadeus
            .as_ref()
            .map(|a| a.base_url.as_str())
            .unwrap_or(constants::AMADEUS_TEST_BASE_URL);
        info!("Amadeus API: {}", base_url);
    } else {
        warn!(
            "Amadeus credentials missing: set AMADEUS_API_KEY and AMADEUS_API_SECRET; \
             every price lookup will fail until then"
        );
    }

    if config.telegram_configured() {
        info!("Telegram notifications enabled");
    } else {
        warn!(
            "Telegram credentials missing: set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID; \
             alerts will be logged but not delivered"
        );
    }
}
