//! Frequency command - show or change the check interval

use anyhow::Result;
use serde::Serialize;

use super::Context;
use crate::output::{is_json_mode, print_info, print_success, print_success_json};

#[derive(Serialize)]
struct FrequencyJson {
    check_frequency_minutes: u64,
}

pub async fn execute(ctx: &Context, minutes: Option<u64>) -> Result<()> {
    let db = ctx.open_db().await?;
    let settings = db.settings();

    let Some(minutes) = minutes else {
        let current = settings.check_frequency_minutes().await?;
        if is_json_mode() {
            print_success_json(
                "Current check frequency",
                Some(FrequencyJson {
                    check_frequency_minutes: current,
                }),
            );
        } else {
            println!("Checking prices every {} minutes", current);
        }
        return Ok(());
    };

    settings.set_check_frequency_minutes(minutes).await?;
    print_success(&format!("Check frequency set to {} minutes", minutes));
    print_info("A running daemon picks this up on its next tick");
    Ok(())
}
