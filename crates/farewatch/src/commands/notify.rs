//! Notification commands

use anyhow::{bail, Result};
use farewatch_core::{Config, TelegramConfig};
use farewatch_notify::NotificationManager;

use super::Context;
use crate::cli::{NotifyArgs, NotifyCommand};
use crate::output::{print_info, print_success};

const TEST_MESSAGE: &str = "\u{1F916} <b>Test message</b> from your farewatch flight tracker!";

pub async fn execute(ctx: &Context, args: NotifyArgs) -> Result<()> {
    match args.command {
        NotifyCommand::Telegram { token, chat } => configure_telegram(ctx, token, chat),
        NotifyCommand::Test => test_notification(ctx).await,
    }
}

fn configure_telegram(ctx: &Context, token: String, chat: String) -> Result<()> {
    // Environment overrides stay out of the saved file
    let mut config = Config::load_from(&ctx.config_path)?;
    let api_base = config.telegram.as_ref().and_then(|tc| tc.api_base.clone());
    config.telegram = Some(TelegramConfig {
        bot_token: token,
        chat_id: chat,
        api_base,
    });
    config.save_to(&ctx.config_path)?;

    print_success("Telegram notifications configured");
    print_info(&format!("Config saved to: {}", ctx.config_path.display()));
    Ok(())
}

async fn test_notification(ctx: &Context) -> Result<()> {
    let manager = NotificationManager::from_config(&ctx.config);

    if !manager.is_configured() {
        bail!("Telegram credentials missing: set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID");
    }

    if !manager.send_message(TEST_MESSAGE).await {
        bail!("Failed to send test notification (see log output above, rerun with -v)");
    }

    print_success("Test notification sent");
    Ok(())
}
