//! Search command - one-off cheapest offer lookup

use anyhow::{bail, Result};
use farewatch_core::dates::parse_date;
use farewatch_core::normalize_location_code;
use farewatch_pricing::{AmadeusClient, PriceSource};

use super::Context;
use crate::cli::SearchArgs;
use crate::output::{is_json_mode, print_info, print_offer};

pub async fn execute(ctx: &Context, args: SearchArgs) -> Result<()> {
    let origin = normalize_location_code(&args.from)?;
    let destination = normalize_location_code(&args.to)?;
    let date = args.date.as_deref().map(parse_date).transpose()?;

    let amadeus = ctx.config.amadeus.clone().unwrap_or_default();
    let client = AmadeusClient::new(&amadeus);
    if !client.is_configured() {
        bail!("Amadeus credentials missing: set AMADEUS_API_KEY and AMADEUS_API_SECRET");
    }

    match client.find_cheapest(&origin, &destination, date).await? {
        Some(offer) => print_offer(&offer),
        None if is_json_mode() => println!("null"),
        None => print_info(&format!("No offers found for {} -> {}", origin, destination)),
    }

    Ok(())
}
