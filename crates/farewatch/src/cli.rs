//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "farewatch")]
#[command(version, about = "Track flight prices and get alerted on new lows")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Database file (default: ~/.farewatch/farewatch.db)
    #[arg(long, global = true, env = "FAREWATCH_DB")]
    pub db: Option<PathBuf>,

    /// Config file (default: ~/.farewatch/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start tracking a route
    Add(AddArgs),

    /// List tracked routes
    #[command(alias = "ls")]
    List,

    /// Stop tracking a route and drop its price history
    #[command(alias = "rm")]
    Remove {
        /// Route id
        id: u32,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or change how often the daemon checks prices
    Frequency {
        /// New interval in minutes
        minutes: Option<u64>,
    },

    /// Show recorded prices for a route
    History {
        /// Route id
        id: u32,

        /// Maximum number of entries
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show configuration and credential status
    Status,

    /// Run one price check over all routes now
    Check,

    /// Look up the cheapest offer for a route without tracking it
    Search(SearchArgs),

    /// Notification settings
    Notify(NotifyArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Origin IATA code (e.g. LON)
    pub from: String,

    /// Destination IATA code (e.g. PAR)
    pub to: String,

    /// Alert when the price is at or below this amount
    #[arg(short, long)]
    pub target: f64,

    /// Earliest departure date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub from_date: Option<String>,

    /// Latest departure date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub to_date: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Origin IATA code
    pub from: String,

    /// Destination IATA code
    pub to: String,

    /// Departure date (default: tomorrow)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct NotifyArgs {
    #[command(subcommand)]
    pub command: NotifyCommand,
}

#[derive(Subcommand)]
pub enum NotifyCommand {
    /// Save Telegram credentials to the config file
    Telegram {
        /// Bot token from @BotFather
        #[arg(long)]
        token: String,

        /// Chat ID to send messages to
        #[arg(long)]
        chat: String,
    },

    /// Send a test notification
    Test,
}
