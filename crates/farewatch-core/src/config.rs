//! Configuration file and environment overrides
//!
//! The config lives in `~/.farewatch/config.toml` and is optional. Values
//! from the environment (including a `.env` file the binaries load first)
//! take precedence over the file:
//!
//! - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, `TELEGRAM_API_BASE`
//! - `AMADEUS_API_KEY`, `AMADEUS_API_SECRET`, `AMADEUS_BASE_URL`
//! - `FAREWATCH_DB`, `FAREWATCH_NOTIFY_POLICY`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::*;
use crate::error::Result;
use crate::policy::NotifyPolicy;

/// Whether a credential is effectively missing.
///
/// Template values such as `your_telegram_bot_token_here` count as missing.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || (value.starts_with("your_") && value.ends_with("_here"))
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Database file (defaults to `~/.farewatch/farewatch.db`)
    pub db_path: Option<PathBuf>,

    /// Telegram notification settings
    pub telegram: Option<TelegramConfig>,

    /// Amadeus flight search credentials
    pub amadeus: Option<AmadeusConfig>,

    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather
    pub bot_token: String,

    /// Chat ID to send messages to (user, group, or channel)
    pub chat_id: String,

    /// Bot API server; the public one when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        !is_placeholder(&self.bot_token) && !is_placeholder(&self.chat_id)
    }
}

/// Amadeus Self-Service API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmadeusConfig {
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            base_url: default_base_url(),
            currency: default_currency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AmadeusConfig {
    pub fn is_configured(&self) -> bool {
        !is_placeholder(&self.api_key) && !is_placeholder(&self.api_secret)
    }
}

/// Check cycle tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub notify_policy: NotifyPolicy,
    /// Pause between routes within a cycle
    #[serde(default = "default_route_delay_ms")]
    pub route_delay_ms: u64,
    /// Scheduler wake-up period
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            notify_policy: NotifyPolicy::default(),
            route_delay_ms: default_route_delay_ms(),
            tick_secs: default_tick_secs(),
        }
    }
}

fn default_base_url() -> String {
    AMADEUS_TEST_BASE_URL.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_route_delay_ms() -> u64 {
    DEFAULT_ROUTE_DELAY_MS
}

fn default_tick_secs() -> u64 {
    DEFAULT_TICK_SECS
}

impl Config {
    /// Load config from `path` (or the default location), then apply the
    /// process environment on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_path = config_path();
        let path = path.unwrap_or(&default_path);
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load config from a specific path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, &content)?;

        // Config holds API tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
                tracing::warn!("Failed to set config file permissions: {}", e);
            }
        }

        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("TELEGRAM_BOT_TOKEN") {
            self.telegram.get_or_insert_with(Default::default).bot_token = token;
        }
        if let Some(chat) = get("TELEGRAM_CHAT_ID") {
            self.telegram.get_or_insert_with(Default::default).chat_id = chat;
        }
        if let Some(base) = get("TELEGRAM_API_BASE") {
            self.telegram.get_or_insert_with(Default::default).api_base = Some(base);
        }
        if let Some(key) = get("AMADEUS_API_KEY") {
            self.amadeus.get_or_insert_with(Default::default).api_key = key;
        }
        if let Some(secret) = get("AMADEUS_API_SECRET") {
            self.amadeus.get_or_insert_with(Default::default).api_secret = secret;
        }
        if let Some(url) = get("AMADEUS_BASE_URL") {
            self.amadeus.get_or_insert_with(Default::default).base_url = url;
        }
        if let Some(db) = get("FAREWATCH_DB") {
            self.db_path = Some(PathBuf::from(db));
        }
        if let Some(policy) = get("FAREWATCH_NOTIFY_POLICY") {
            self.monitor.notify_policy = policy.parse()?;
        }

        Ok(())
    }

    /// Database file to open
    pub fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(db_path)
    }

    pub fn telegram_configured(&self) -> bool {
        self.telegram
            .as_ref()
            .map(|t| t.is_configured())
            .unwrap_or(false)
    }

    pub fn amadeus_configured(&self) -> bool {
        self.amadeus
            .as_ref()
            .map(|a| a.is_configured())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.telegram.is_none());
        assert!(config.amadeus.is_none());
        assert!(!config.telegram_configured());
        assert!(!config.amadeus_configured());
        assert_eq!(config.monitor.notify_policy, NotifyPolicy::NewLow);
        assert_eq!(config.monitor.tick_secs, DEFAULT_TICK_SECS);
        assert_eq!(config.monitor.route_delay_ms, DEFAULT_ROUTE_DELAY_MS);
    }

    #[test]
    fn test_load_missing_config() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(config.telegram.is_none());
    }

    #[test]
    fn test_load_config() {
        let content = r#"
db_path = "/tmp/flights.db"

[telegram]
bot_token = "123456:ABC-DEF"
chat_id = "-100123456789"

[amadeus]
api_key = "key"
api_secret = "secret"

[monitor]
notify_policy = "every_cycle"
route_delay_ms = 0
"#;
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.db_path(), PathBuf::from("/tmp/flights.db"));
        assert!(config.telegram_configured());
        assert!(config.amadeus_configured());

        let amadeus = config.amadeus.unwrap();
        assert_eq!(amadeus.base_url, AMADEUS_TEST_BASE_URL);
        assert_eq!(amadeus.currency, "USD");
        assert_eq!(amadeus.timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);

        assert_eq!(config.monitor.notify_policy, NotifyPolicy::EveryCycle);
        assert_eq!(config.monitor.route_delay_ms, 0);
        assert_eq!(config.monitor.tick_secs, DEFAULT_TICK_SECS);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = Config::default();
        config.telegram = Some(TelegramConfig {
            bot_token: "test_token".to_string(),
            chat_id: "test_chat".to_string(),
            ..Default::default()
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        let telegram = loaded.telegram.unwrap();
        assert_eq!(telegram.bot_token, "test_token");
        assert_eq!(telegram.chat_id, "test_chat");
        assert_eq!(telegram.api_base, None);
        assert!(!std::fs::read_to_string(&path).unwrap().contains("api_base"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config.telegram = Some(TelegramConfig {
            bot_token: "from_file".to_string(),
            chat_id: "1".to_string(),
            ..Default::default()
        });

        let env: HashMap<&str, &str> = HashMap::from([
            ("TELEGRAM_BOT_TOKEN", "from_env"),
            ("TELEGRAM_API_BASE", "http://localhost:8081"),
            ("AMADEUS_API_KEY", "k"),
            ("AMADEUS_API_SECRET", "s"),
            ("FAREWATCH_DB", "/data/flights.db"),
            ("FAREWATCH_NOTIFY_POLICY", "every_cycle"),
        ]);
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        let telegram = config.telegram.as_ref().unwrap();
        assert_eq!(telegram.bot_token, "from_env");
        assert_eq!(telegram.chat_id, "1");
        assert_eq!(telegram.api_base.as_deref(), Some("http://localhost:8081"));
        assert!(config.amadeus_configured());
        assert_eq!(config.db_path(), PathBuf::from("/data/flights.db"));
        assert_eq!(config.monitor.notify_policy, NotifyPolicy::EveryCycle);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|_| Some("  ".to_string())).unwrap();
        assert!(config.telegram.is_none());
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_bad_policy_override_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(|k| {
            (k == "FAREWATCH_NOTIFY_POLICY").then(|| "loud".to_string())
        });
        assert!(matches!(result, Err(Error::InvalidPolicy(_))));
    }

    #[test]
    fn test_placeholders_count_as_missing() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("your_telegram_bot_token_here"));
        assert!(is_placeholder("your_amadeus_api_key_here"));
        assert!(!is_placeholder("123456:ABC"));

        let telegram = TelegramConfig {
            bot_token: "your_telegram_bot_token_here".to_string(),
            chat_id: "42".to_string(),
            ..Default::default()
        };
        assert!(!telegram.is_configured());
    }
}
