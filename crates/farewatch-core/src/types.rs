//! Core types for farewatch

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// IATA city or airport code, already uppercased
static LOCATION_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("Invalid location code regex"));

/// Normalize and validate a 3-letter location code
pub fn normalize_location_code(code: &str) -> Result<String> {
    let upper = code.trim().to_uppercase();
    if LOCATION_CODE_REGEX.is_match(&upper) {
        Ok(upper)
    } else {
        Err(Error::invalid_route(format!(
            "'{}' is not a 3-letter location code",
            code.trim()
        )))
    }
}

/// A route the user asked us to watch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedRoute {
    pub id: u32,
    pub origin_code: String,
    pub destination_code: String,
    /// Notify threshold
    pub target_price: f64,
    /// Lowest price observed so far; only ever goes down
    pub lowest_price_seen: Option<f64>,
    /// Earliest acceptable departure
    pub date_from: Option<NaiveDate>,
    /// Latest acceptable departure
    pub date_to: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl TrackedRoute {
    /// Short human label, e.g. `LON -> PAR`
    pub fn label(&self) -> String {
        format!("{} -> {}", self.origin_code, self.destination_code)
    }
}

/// Validated request to start tracking a route
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoute {
    pub origin_code: String,
    pub destination_code: String,
    pub target_price: f64,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl NewRoute {
    pub fn new(origin: &str, destination: &str, target_price: f64) -> Result<Self> {
        let origin_code = normalize_location_code(origin)?;
        let destination_code = normalize_location_code(destination)?;

        if origin_code == destination_code {
            return Err(Error::invalid_route(
                "origin and destination must differ",
            ));
        }
        if !target_price.is_finite() || target_price <= 0.0 {
            return Err(Error::invalid_route(format!(
                "target price must be a positive number, got {}",
                target_price
            )));
        }

        Ok(Self {
            origin_code,
            destination_code,
            target_price,
            date_from: None,
            date_to: None,
        })
    }

    /// Restrict the departure window
    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(Error::invalid_route(format!(
                    "earliest departure {} is after latest departure {}",
                    from, to
                )));
            }
        }
        self.date_from = from;
        self.date_to = to;
        Ok(self)
    }
}

/// The cheapest itinerary found for a route on one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub price: f64,
    pub currency: String,
    /// Departure code of the first segment
    pub origin_code: String,
    /// Arrival code of the last segment
    pub destination_code: String,
    pub outbound_date: NaiveDate,
    pub inbound_date: Option<NaiveDate>,
    pub carrier: Option<String>,
    pub booking_link: String,
}

/// One row of the per-route price log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub id: u32,
    pub route_id: u32,
    pub price: f64,
    pub checked_at: DateTime<Utc>,
}
