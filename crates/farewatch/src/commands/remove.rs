//! Remove command - stop tracking a route

use anyhow::{bail, Result};
use dialoguer::Confirm;
use farewatch_core::Error;

use super::Context;
use crate::output::print_success;

pub async fn execute(ctx: &Context, id: u32, yes: bool) -> Result<()> {
    let db = ctx.open_db().await?;

    let Some(route) = db.routes().get_by_id(id).await? else {
        return Err(Error::RouteNotFound(id).into());
    };

    if !yes {
        if !atty::is(atty::Stream::Stdin) {
            bail!("Refusing to remove route {} without --yes in a non-interactive shell", id);
        }

        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove route {} ({}) and its price history?",
                id,
                route.label()
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    if !db.routes().delete(id).await? {
        return Err(Error::RouteNotFound(id).into());
    }

    print_success(&format!("Removed route {} ({})", id, route.label()));
    Ok(())
}
