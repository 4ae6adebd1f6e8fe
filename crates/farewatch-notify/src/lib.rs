//! farewatch notification system
//!
//! Delivers price alerts to a single preconfigured chat. Delivery failures
//! never propagate past [`NotificationManager`]: callers get a `bool`.

mod error;
mod event;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(test)]
mod stub_http;
mod telegram;

pub use error::{NotifyError, Result};
pub use event::{escape_html, AlertKind, PriceAlert};
pub use telegram::{strip_markup, TelegramNotifier};

use async_trait::async_trait;
use farewatch_core::{Config, TelegramConfig};
use std::sync::Arc;
use tracing::warn;

/// Trait for notification backends
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a preformatted message
    async fn send(&self, message: &str) -> Result<()>;

    /// Send a formatted price alert
    async fn send_price_alert(&self, alert: &PriceAlert) -> Result<()>;

    /// Check if the notifier is configured and ready
    fn is_configured(&self) -> bool;
}

/// Front door for notifications
pub struct NotificationManager {
    notifier: Option<Arc<dyn Notifier>>,
}

impl NotificationManager {
    /// Build from Telegram settings; `None` yields a manager that reports
    /// every delivery as failed
    pub fn new(telegram: Option<&TelegramConfig>) -> Self {
        let notifier = telegram.map(|tc| {
            let mut telegram = TelegramNotifier::new(tc.bot_token.clone(), tc.chat_id.clone());
            if let Some(base) = &tc.api_base {
                telegram = telegram.with_api_base(base.as_str());
            }
            Arc::new(telegram) as Arc<dyn Notifier>
        });

        Self { notifier }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.telegram.as_ref())
    }

    /// Use an arbitrary backend
    pub fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    /// Deliver a price alert; `true` on success
    pub async fn deliver(&self, alert: &PriceAlert) -> bool {
        let Some(notifier) = self.ready_notifier() else {
            return false;
        };

        match notifier.send_price_alert(alert).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Failed to send {} notification for route {}: {}",
                    alert.event_type(),
                    alert.route_id,
                    e
                );
                false
            }
        }
    }

    /// Deliver a plain message; `true` on success
    pub async fn send_message(&self, message: &str) -> bool {
        let Some(notifier) = self.ready_notifier() else {
            return false;
        };

        match notifier.send(message).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send notification: {}", e);
                false
            }
        }
    }

    /// Check if a notification channel is configured
    pub fn is_configured(&self) -> bool {
        self.notifier
            .as_ref()
            .map(|n| n.is_configured())
            .unwrap_or(false)
    }

    fn ready_notifier(&self) -> Option<&Arc<dyn Notifier>> {
        match &self.notifier {
            Some(notifier) if notifier.is_configured() => Some(notifier),
            _ => {
                warn!("Missing Telegram credentials, notification not sent");
                None
            }
        }
    }
}
