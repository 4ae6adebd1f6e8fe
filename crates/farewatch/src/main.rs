//! farewatch CLI - manage tracked routes and run price checks

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;
use output::print_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    output::set_json_mode(cli.json);

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(log_level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    // A .env file is optional; real environment variables win
    dotenvy::dotenv().ok();

    let result = match Context::load(&cli) {
        Ok(ctx) => run(&ctx, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        print_error(&format!("Error: {}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn default_filter(level: &str) -> String {
    ["farewatch", "farewatch_monitor", "farewatch_db", "farewatch_pricing", "farewatch_notify"]
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

async fn run(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Add(args) => add::execute(ctx, args).await,
        Commands::List => list::execute(ctx).await,
        Commands::Remove { id, yes } => remove::execute(ctx, id, yes).await,
        Commands::Frequency { minutes } => frequency::execute(ctx, minutes).await,
        Commands::History { id, limit } => history::execute(ctx, id, limit).await,
        Commands::Status => status::execute(ctx).await,
        Commands::Check => check::execute(ctx).await,
        Commands::Search(args) => search::execute(ctx, args).await,
        Commands::Notify(args) => notify::execute(ctx, args).await,
    }
}
