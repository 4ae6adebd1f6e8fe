//! Error types for farewatch

use std::path::PathBuf;

/// farewatch error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Route not found: {0}")]
    RouteNotFound(u32),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Invalid notify policy: {0}")]
    InvalidPolicy(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Database error: {0}")]
    DbError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Result type alias for farewatch
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn db<S: Into<String>>(msg: S) -> Self {
        Error::DbError(msg.into())
    }

    pub fn invalid_route<S: Into<String>>(msg: S) -> Self {
        Error::InvalidRoute(msg.into())
    }
}
