//! Settings repository - small key/value table

use farewatch_core::constants::{
    CHECK_FREQUENCY_KEY, DEFAULT_CHECK_FREQUENCY_MINUTES, MAX_CHECK_FREQUENCY_MINUTES,
};
use farewatch_core::{Error, Result};
use sqlx::sqlite::SqlitePool;
use tracing::warn;

/// Repository for settings
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a setting value by key
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        Ok(row.map(|r| r.0))
    }

    /// Create or replace a setting
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        Ok(())
    }

    /// Poll interval in minutes, falling back to the default when the stored
    /// value is missing, not a positive integer, or above a year
    pub async fn check_frequency_minutes(&self) -> Result<u64> {
        let raw = self.get(CHECK_FREQUENCY_KEY).await?;

        let minutes = match raw.as_deref().map(|v| v.trim().parse::<u64>()) {
            Some(Ok(minutes)) if (1..=MAX_CHECK_FREQUENCY_MINUTES).contains(&minutes) => minutes,
            Some(_) => {
                warn!(
                    "Ignoring invalid {} value {:?}, using {}",
                    CHECK_FREQUENCY_KEY, raw, DEFAULT_CHECK_FREQUENCY_MINUTES
                );
                DEFAULT_CHECK_FREQUENCY_MINUTES
            }
            None => DEFAULT_CHECK_FREQUENCY_MINUTES,
        };

        Ok(minutes)
    }

    /// Change the poll interval; picked up by the scheduler on its next tick
    pub async fn set_check_frequency_minutes(&self, minutes: u64) -> Result<()> {
        if minutes == 0 {
            return Err(Error::InvalidSetting(format!(
                "{} must be at least 1",
                CHECK_FREQUENCY_KEY
            )));
        }
        if minutes > MAX_CHECK_FREQUENCY_MINUTES {
            return Err(Error::InvalidSetting(format!(
                "{} must be at most {} (one year)",
                CHECK_FREQUENCY_KEY, MAX_CHECK_FREQUENCY_MINUTES
            )));
        }
        self.set(CHECK_FREQUENCY_KEY, &minutes.to_string()).await
    }
}
