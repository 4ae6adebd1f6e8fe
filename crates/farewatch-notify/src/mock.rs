//! Mock implementations for testing

use crate::error::{NotifyError, Result};
use crate::event::PriceAlert;
use crate::Notifier;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A mock notifier that records everything it is asked to send
pub struct MockNotifier {
    /// Rendered messages that have been sent
    messages: Arc<Mutex<Vec<String>>>,
    /// Alerts that have been sent
    alerts: Arc<Mutex<Vec<PriceAlert>>>,
    /// Number of send calls
    call_count: AtomicUsize,
    /// Whether to simulate failures
    should_fail: bool,
    configured: bool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self {
            messages: Arc::default(),
            alerts: Arc::default(),
            call_count: AtomicUsize::new(0),
            should_fail: false,
            configured: true,
        }
    }
}

impl MockNotifier {
    /// Create a new mock notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock notifier that always fails
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Create a mock notifier that reports missing credentials
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Default::default()
        }
    }

    /// Get the number of times send was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get all sent messages
    pub async fn messages(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }

    /// Get all sent alerts
    pub async fn alerts(&self) -> Vec<PriceAlert> {
        self.alerts.lock().await.clone()
    }

    /// Check if a message containing `needle` was sent
    pub async fn was_message_sent(&self, needle: &str) -> bool {
        self.messages.lock().await.iter().any(|m| m.contains(needle))
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(NotifyError::TelegramError("Mock failure".to_string()));
        }

        self.messages.lock().await.push(message.to_string());
        Ok(())
    }

    async fn send_price_alert(&self, alert: &PriceAlert) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(NotifyError::TelegramError("Mock failure".to_string()));
        }

        self.messages.lock().await.push(alert.format_message());
        self.alerts.lock().await.push(alert.clone());
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
