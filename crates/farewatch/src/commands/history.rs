//! History command - recorded prices for one route

use anyhow::Result;
use farewatch_core::Error;

use super::Context;
use crate::output::print_history;

pub async fn execute(ctx: &Context, id: u32, limit: usize) -> Result<()> {
    let db = ctx.open_db().await?;

    let Some(route) = db.routes().get_by_id(id).await? else {
        return Err(Error::RouteNotFound(id).into());
    };

    let points = db.history().get_by_route(id, limit).await?;
    print_history(&route, &points);
    Ok(())
}
