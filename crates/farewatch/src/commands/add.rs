//! Add command - start tracking a route

use anyhow::Result;
use farewatch_core::dates::parse_date;
use farewatch_core::NewRoute;

use super::Context;
use crate::cli::AddArgs;
use crate::output::{format_price, is_json_mode, print_success, print_success_json};

pub async fn execute(ctx: &Context, args: AddArgs) -> Result<()> {
    let date_from = args.from_date.as_deref().map(parse_date).transpose()?;
    let date_to = args.to_date.as_deref().map(parse_date).transpose()?;

    let route = NewRoute::new(&args.from, &args.to, args.target)?.with_dates(date_from, date_to)?;

    let db = ctx.open_db().await?;
    let id = db.routes().insert(&route).await?;

    let message = format!(
        "Tracking route {}: {} -> {} (target {})",
        id,
        route.origin_code,
        route.destination_code,
        format_price(route.target_price)
    );

    if is_json_mode() {
        let saved = db.routes().get_by_id(id).await?;
        print_success_json(&message, saved);
    } else {
        print_success(&message);
    }

    Ok(())
}
