//! farewatch core - shared types, notification policy, configuration and errors

pub mod config;
pub mod constants;
pub mod dates;
pub mod error;
pub mod policy;
pub mod types;

pub use config::{AmadeusConfig, Config, MonitorConfig, TelegramConfig};
pub use error::{Error, Result};
pub use policy::{Evaluation, NotifyPolicy, NotifyReason};
pub use types::*;
