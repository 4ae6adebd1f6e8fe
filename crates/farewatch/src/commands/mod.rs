//! Command implementations

pub mod add;
pub mod check;
pub mod frequency;
pub mod history;
pub mod list;
pub mod notify;
pub mod remove;
pub mod search;
pub mod status;

use anyhow::Result;
use farewatch_core::{constants, Config};
use farewatch_db::Database;
use std::path::PathBuf;

use crate::cli::Cli;

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
}

impl Context {
    /// Load config (file, then environment) and apply command line overrides
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.clone().unwrap_or_else(constants::config_path);
        let mut config = Config::load(Some(&config_path))?;

        if let Some(db) = &cli.db {
            config.db_path = Some(db.clone());
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    pub async fn open_db(&self) -> Result<Database> {
        Ok(Database::new(&self.config.db_path()).await?)
    }
}
