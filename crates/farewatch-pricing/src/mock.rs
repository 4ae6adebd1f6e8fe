//! Mock price source for testing

use crate::error::{PricingError, Result};
use crate::{google_flights_link, PriceSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use farewatch_core::dates::{resolve_search_date, today};
use farewatch_core::Offer;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// One scripted answer
#[derive(Debug, Clone, PartialEq)]
pub enum MockQuote {
    Price(f64),
    NotFound,
    Error(String),
}

/// A lookup the mock was asked to perform
#[derive(Debug, Clone, PartialEq)]
pub struct MockLookup {
    pub origin: String,
    pub destination: String,
    pub earliest: Option<NaiveDate>,
}

/// Replays scripted quotes in order; once the script runs out every
/// lookup answers `Ok(None)`
pub struct MockPriceSource {
    quotes: Mutex<VecDeque<MockQuote>>,
    lookups: Mutex<Vec<MockLookup>>,
    call_count: AtomicUsize,
    currency: String,
}

impl Default for MockPriceSource {
    fn default() -> Self {
        Self {
            quotes: Mutex::default(),
            lookups: Mutex::default(),
            call_count: AtomicUsize::new(0),
            currency: "USD".to_string(),
        }
    }
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a sequence of quotes
    pub fn with_quotes<I: IntoIterator<Item = MockQuote>>(quotes: I) -> Self {
        Self {
            quotes: Mutex::new(quotes.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Script a sequence of prices
    pub fn with_prices<I: IntoIterator<Item = f64>>(prices: I) -> Self {
        Self::with_quotes(prices.into_iter().map(MockQuote::Price))
    }

    /// Append a quote to the script
    pub async fn push(&self, quote: MockQuote) {
        self.quotes.lock().await.push_back(quote);
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub async fn lookups(&self) -> Vec<MockLookup> {
        self.lookups.lock().await.clone()
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn find_cheapest(
        &self,
        origin: &str,
        destination: &str,
        earliest: Option<NaiveDate>,
    ) -> Result<Option<Offer>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.lookups.lock().await.push(MockLookup {
            origin: origin.to_string(),
            destination: destination.to_string(),
            earliest,
        });

        let quote = self
            .quotes
            .lock()
            .await
            .pop_front()
            .unwrap_or(MockQuote::NotFound);

        let departure = resolve_search_date(earliest, today());

        match quote {
            MockQuote::Price(price) => Ok(Some(Offer {
                price,
                currency: self.currency.clone(),
                origin_code: origin.to_string(),
                destination_code: destination.to_string(),
                outbound_date: departure,
                inbound_date: None,
                carrier: Some("ZZ".to_string()),
                booking_link: google_flights_link(origin, destination, departure),
            })),
            MockQuote::NotFound => Ok(None),
            MockQuote::Error(msg) => Err(PricingError::ApiError {
                status: 500,
                body: msg,
            }),
        }
    }

    fn is_configured(&self) -> bool {
        true
    }
}
