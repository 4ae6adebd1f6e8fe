//! Check command - one price check cycle in the foreground

use anyhow::Result;
use farewatch_monitor::PriceMonitor;
use farewatch_notify::NotificationManager;
use farewatch_pricing::{AmadeusClient, PriceSource};
use std::sync::Arc;

use super::Context;
use crate::output::{print_report, print_warning};

pub async fn execute(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    if !config.amadeus_configured() {
        print_warning("Amadeus credentials missing, every lookup will fail");
    }
    if !config.telegram_configured() {
        print_warning("Telegram credentials missing, alerts will not be delivered");
    }

    let db = ctx.open_db().await?;
    let amadeus = config.amadeus.clone().unwrap_or_default();
    let prices: Arc<dyn PriceSource> = Arc::new(AmadeusClient::new(&amadeus));
    let notifications = Arc::new(NotificationManager::from_config(config));

    let monitor = PriceMonitor::new(db, prices, notifications).with_config(&config.monitor);
    let report = monitor.run_cycle().await?;

    print_report(&report);
    Ok(())
}
