//! farewatch pricing - cheapest-offer lookups
//!
//! A [`PriceSource`] answers one question: what is the cheapest offer for a
//! route departing on (or after) a date. "No offers" is `Ok(None)`; transport
//! failures, API errors and unreadable payloads are `Err`. Callers that do
//! not care about the difference can treat both as "nothing found".

mod amadeus;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(test)]
mod stub_http;

pub use amadeus::AmadeusClient;
pub use error::{PricingError, Result};

use async_trait::async_trait;
use chrono::NaiveDate;
use farewatch_core::dates::format_api_date;
use farewatch_core::Offer;

/// Source of flight prices
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Cheapest offer from `origin` to `destination`.
    ///
    /// `earliest` is resolved with
    /// [`farewatch_core::dates::resolve_search_date`]: no date or a past date
    /// means tomorrow.
    async fn find_cheapest(
        &self,
        origin: &str,
        destination: &str,
        earliest: Option<NaiveDate>,
    ) -> Result<Option<Offer>>;

    /// Check if credentials are present
    fn is_configured(&self) -> bool;
}

/// Google Flights search link for a one-way trip
pub fn google_flights_link(origin: &str, destination: &str, date: NaiveDate) -> String {
    format!(
        "https://www.google.com/flights?hl=en#flt={}.{}.{}",
        origin,
        destination,
        format_api_date(date)
    )
}
