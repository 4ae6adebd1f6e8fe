//! One check cycle over every tracked route

use farewatch_core::constants::DEFAULT_ROUTE_DELAY_MS;
use farewatch_core::dates::{resolve_search_date, today, window_closed};
use farewatch_core::policy::evaluate;
use farewatch_core::{MonitorConfig, NotifyPolicy, NotifyReason, Result, TrackedRoute};
use farewatch_db::Database;
use farewatch_notify::{AlertKind, NotificationManager, PriceAlert};
use farewatch_pricing::PriceSource;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Tally of one check cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Routes considered
    pub checked: usize,
    pub found: usize,
    pub not_found: usize,
    /// Lookup or store failures
    pub errors: usize,
    /// Travel window already closed
    pub skipped: usize,
    pub notified: usize,
    pub notify_failed: usize,
    pub watermarks_lowered: usize,
}

/// What happened to a single route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteOutcome {
    Skipped,
    NotFound,
    LookupFailed,
    Priced {
        lowered: bool,
        /// `None` when the policy stayed quiet
        delivered: Option<bool>,
    },
}

impl CycleReport {
    fn record(&mut self, outcome: RouteOutcome) {
        self.checked += 1;
        match outcome {
            RouteOutcome::Skipped => self.skipped += 1,
            RouteOutcome::NotFound => self.not_found += 1,
            RouteOutcome::LookupFailed => self.errors += 1,
            RouteOutcome::Priced { lowered, delivered } => {
                self.found += 1;
                if lowered {
                    self.watermarks_lowered += 1;
                }
                match delivered {
                    Some(true) => self.notified += 1,
                    Some(false) => self.notify_failed += 1,
                    None => {}
                }
            }
        }
    }
}

impl std::fmt::Display for CycleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} checked, {} priced, {} without offers, {} errors, {} skipped, {} notified",
            self.checked, self.found, self.not_found, self.errors, self.skipped, self.notified
        )?;
        if self.notify_failed > 0 {
            write!(f, " ({} failed)", self.notify_failed)?;
        }
        Ok(())
    }
}

/// Queries prices for tracked routes and applies the notification policy
pub struct PriceMonitor {
    db: Database,
    prices: Arc<dyn PriceSource>,
    notifications: Arc<NotificationManager>,
    policy: NotifyPolicy,
    route_delay: Duration,
}

impl PriceMonitor {
    pub fn new(
        db: Database,
        prices: Arc<dyn PriceSource>,
        notifications: Arc<NotificationManager>,
    ) -> Self {
        Self {
            db,
            prices,
            notifications,
            policy: NotifyPolicy::default(),
            route_delay: Duration::from_millis(DEFAULT_ROUTE_DELAY_MS),
        }
    }

    /// Apply `[monitor]` settings
    pub fn with_config(self, config: &MonitorConfig) -> Self {
        self.with_policy(config.notify_policy)
            .with_route_delay(Duration::from_millis(config.route_delay_ms))
    }

    pub fn with_policy(mut self, policy: NotifyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Pause between consecutive routes within a cycle
    pub fn with_route_delay(mut self, delay: Duration) -> Self {
        self.route_delay = delay;
        self
    }

    pub fn policy(&self) -> NotifyPolicy {
        self.policy
    }

    /// Check every tracked route once, in id order.
    ///
    /// Only a failure to list routes fails the cycle; per-route problems are
    /// logged and counted.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let routes = self.db.routes().get_all().await?;
        let mut report = CycleReport::default();

        if routes.is_empty() {
            info!("No tracked routes, nothing to check");
            return Ok(report);
        }

        info!("Checking prices for {} tracked routes", routes.len());

        for (i, route) in routes.iter().enumerate() {
            if i > 0 && !self.route_delay.is_zero() {
                tokio::time::sleep(self.route_delay).await;
            }

            let outcome = match self.check_route(route).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Failed to process route {} ({}): {}", route.id, route.label(), e);
                    RouteOutcome::LookupFailed
                }
            };
            report.record(outcome);
        }

        info!("Price check cycle complete: {}", report);
        Ok(report)
    }

    async fn check_route(&self, route: &TrackedRoute) -> Result<RouteOutcome> {
        let search_date = resolve_search_date(route.date_from, today());
        if window_closed(search_date, route.date_to) {
            info!(
                "Skipping route {} ({}): travel window closed",
                route.id,
                route.label()
            );
            return Ok(RouteOutcome::Skipped);
        }

        info!("Checking route {}: {}", route.id, route.label());

        let offer = match self
            .prices
            .find_cheapest(&route.origin_code, &route.destination_code, route.date_from)
            .await
        {
            Ok(Some(offer)) => offer,
            Ok(None) => {
                info!("No offers for route {} ({})", route.id, route.label());
                return Ok(RouteOutcome::NotFound);
            }
            Err(e) => {
                warn!("Price lookup failed for route {} ({}): {}", route.id, route.label(), e);
                return Ok(RouteOutcome::LookupFailed);
            }
        };

        let current = offer.price;
        info!(
            "Route {}: current {:.2} {}, target {:.2}, lowest {}",
            route.id,
            current,
            offer.currency,
            route.target_price,
            route
                .lowest_price_seen
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "none".to_string())
        );

        self.db.history().insert(route.id, current).await?;

        let evaluation = evaluate(route, current, self.policy);

        let lowered = match evaluation.new_watermark {
            Some(price) => {
                let lowered = self.db.routes().lower_watermark(route.id, price).await?;
                if lowered {
                    info!("Route {}: new lowest price {:.2}", route.id, price);
                }
                lowered
            }
            None => false,
        };

        let Some(mut reason) = evaluation.notify else {
            debug!("Route {}: no notification", route.id);
            return Ok(RouteOutcome::Priced {
                lowered,
                delivered: None,
            });
        };

        // Another writer stored an equal or lower price first
        if evaluation.new_watermark.is_some() && !lowered {
            match self.policy {
                NotifyPolicy::NewLow => {
                    debug!("Route {}: watermark already at or below {:.2}", route.id, current);
                    return Ok(RouteOutcome::Priced {
                        lowered,
                        delivered: None,
                    });
                }
                NotifyPolicy::EveryCycle => reason = NotifyReason::AtOrBelowTarget,
            }
        }

        let kind = match reason {
            NotifyReason::NewLow => AlertKind::PriceDrop,
            NotifyReason::AtOrBelowTarget => AlertKind::Update,
        };
        let alert = PriceAlert::new(kind, route, &offer);
        let delivered = self.notifications.deliver(&alert).await;
        if delivered {
            info!("Route {}: {} notification sent", route.id, alert.event_type());
        }

        Ok(RouteOutcome::Priced {
            lowered,
            delivered: Some(delivered),
        })
    }
}
