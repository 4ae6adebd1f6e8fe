//! Status command - configuration and credential overview

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::Context;
use crate::output::is_json_mode;

#[derive(Serialize)]
struct StatusJson {
    config_path: String,
    db_path: String,
    routes: u64,
    check_frequency_minutes: u64,
    notify_policy: String,
    amadeus_configured: bool,
    telegram_configured: bool,
}

fn flag(configured: bool) -> String {
    if configured {
        "configured".green().to_string()
    } else {
        "missing".red().to_string()
    }
}

pub async fn execute(ctx: &Context) -> Result<()> {
    let db = ctx.open_db().await?;
    let config = &ctx.config;

    let status = StatusJson {
        config_path: ctx.config_path.display().to_string(),
        db_path: config.db_path().display().to_string(),
        routes: db.routes().count().await?,
        check_frequency_minutes: db.settings().check_frequency_minutes().await?,
        notify_policy: config.monitor.notify_policy.to_string(),
        amadeus_configured: config.amadeus_configured(),
        telegram_configured: config.telegram_configured(),
    };

    if is_json_mode() {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("farewatch status");
    println!("{}", "=".repeat(40));
    println!("Config file:     {}", status.config_path);
    println!("Database:        {}", status.db_path);
    println!("Tracked routes:  {}", status.routes);
    println!("Check every:     {} minutes", status.check_frequency_minutes);
    println!("Notify policy:   {}", status.notify_policy);
    println!();
    println!("Amadeus API:     {}", flag(status.amadeus_configured));
    println!("Telegram:        {}", flag(status.telegram_configured));

    if !status.amadeus_configured || !status.telegram_configured {
        println!();
        println!(
            "Credentials are read from {} or the environment (a .env file works too).",
            status.config_path
        );
    }

    Ok(())
}
