//! List command - show tracked routes

use anyhow::Result;

use super::Context;
use crate::output::print_routes_table;

pub async fn execute(ctx: &Context) -> Result<()> {
    let db = ctx.open_db().await?;
    let routes = db.routes().get_all().await?;
    print_routes_table(&routes);
    Ok(())
}
