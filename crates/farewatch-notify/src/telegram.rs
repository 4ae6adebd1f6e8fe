//! Telegram notification backend

use crate::error::{NotifyError, Result};
use crate::event::PriceAlert;
use crate::Notifier;
use async_trait::async_trait;
use farewatch_core::config::is_placeholder;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const TELEGRAM_TIMEOUT_SECS: u64 = 10;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("Invalid tag regex"));

/// Telegram API response
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

/// Request body for sendMessage
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
    disable_web_page_preview: bool,
}

/// Drop HTML tags and undo the entity escaping our formatter applies
pub fn strip_markup(text: &str) -> String {
    TAG_REGEX
        .replace_all(text, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Telegram notification backend
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier
    pub fn new(bot_token: String, chat_id: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TELEGRAM_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self::with_client(bot_token, chat_id, client)
    }

    /// Create with a custom HTTP client
    pub fn with_client(bot_token: String, chat_id: String, client: reqwest::Client) -> Self {
        Self {
            bot_token,
            chat_id,
            api_base: TELEGRAM_API_BASE.to_string(),
            client,
        }
    }

    /// Point at another Bot API server (self-hosted, or a local stand-in)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the Telegram API URL for sendMessage
    fn api_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }

    async fn post(&self, text: &str, parse_mode: Option<&str>) -> Result<reqwest::Response> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode,
            disable_web_page_preview: false,
        };

        let response = self
            .client
            .post(self.api_url())
            .json(&request)
            .send()
            .await?;

        Ok(response)
    }

    /// Send an HTML message, retrying once as plain text if Telegram
    /// rejects the markup
    async fn send_telegram_message(&self, text: &str) -> Result<()> {
        if !self.is_configured() {
            return Err(NotifyError::NotConfigured);
        }

        debug!("Sending Telegram message to chat {}", self.chat_id);

        let response = self.post(text, Some("HTML")).await?;

        let response = if response.status() == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            warn!("Telegram HTML parse error: {}", body);
            warn!("Retrying without HTML formatting");
            self.post(&strip_markup(text), None).await?
        } else {
            response
        };

        let status = response.status();
        let body: TelegramResponse = response.json().await?;

        if body.ok && status.is_success() {
            info!("Telegram notification sent successfully");
            Ok(())
        } else {
            let error_msg = body
                .description
                .unwrap_or_else(|| format!("HTTP {}", status));
            error!("Telegram API error: {}", error_msg);
            Err(NotifyError::telegram(error_msg))
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        self.send_telegram_message(message).await
    }

    async fn send_price_alert(&self, alert: &PriceAlert) -> Result<()> {
        let message = alert.format_message();
        self.send_telegram_message(&message).await
    }

    fn is_configured(&self) -> bool {
        !is_placeholder(&self.bot_token) && !is_placeholder(&self.chat_id)
    }
}
