//! Constants and default values for farewatch

use std::path::PathBuf;

/// Default farewatch home directory name
pub const FAREWATCH_DIR: &str = ".farewatch";

/// Default database file name
pub const DB_FILE: &str = "farewatch.db";

/// Default config file name
pub const CONFIG_FILE: &str = "config.toml";

/// Default log directory name
pub const LOGS_DIR: &str = "logs";

/// Daemon log file name (inside the log directory)
pub const LOG_FILE: &str = "farewatch.log";

/// Settings key holding the poll interval in minutes
pub const CHECK_FREQUENCY_KEY: &str = "check_frequency_minutes";

/// Poll interval used when the setting is missing or unreadable
pub const DEFAULT_CHECK_FREQUENCY_MINUTES: u64 = 60;

/// Longest accepted poll interval (one year)
pub const MAX_CHECK_FREQUENCY_MINUTES: u64 = 525_600;

/// How often the scheduler wakes up to re-read the interval
pub const DEFAULT_TICK_SECS: u64 = 30;

/// Pause between two routes inside one check cycle
pub const DEFAULT_ROUTE_DELAY_MS: u64 = 2000;

/// Currency requested from the pricing API
pub const DEFAULT_CURRENCY: &str = "USD";

/// Transport timeout for outbound HTTP requests
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Amadeus self-service test environment
pub const AMADEUS_TEST_BASE_URL: &str = "https://test.api.amadeus.com";

/// Get the farewatch home directory
pub fn farewatch_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(FAREWATCH_DIR))
        .unwrap_or_else(|| PathBuf::from(FAREWATCH_DIR))
}

/// Get the default database path
pub fn db_path() -> PathBuf {
    farewatch_home().join(DB_FILE)
}

/// Get the default config file path
pub fn config_path() -> PathBuf {
    farewatch_home().join(CONFIG_FILE)
}

/// Get the logs directory
pub fn logs_dir() -> PathBuf {
    farewatch_home().join(LOGS_DIR)
}
