//! Amadeus Flight Offers Search client

use crate::error::{PricingError, Result};
use crate::{google_flights_link, PriceSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use farewatch_core::config::is_placeholder;
use farewatch_core::dates::{format_api_date, resolve_search_date, today};
use farewatch_core::{AmadeusConfig, Offer};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Refresh tokens this long before Amadeus says they expire
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// Amadeus tokens live for 30 minutes unless told otherwise
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 1799;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct FlightOffersResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
}

#[derive(Debug, Deserialize)]
struct FlightOffer {
    price: OfferPrice,
    #[serde(default)]
    itineraries: Vec<Itinerary>,
    #[serde(default, rename = "validatingAirlineCodes")]
    validating_airline_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OfferPrice {
    total: String,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Itinerary {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    departure: SegmentEndpoint,
    arrival: SegmentEndpoint,
    #[serde(default, rename = "carrierCode")]
    carrier_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SegmentEndpoint {
    #[serde(rename = "iataCode")]
    iata_code: String,
    #[serde(default)]
    at: Option<String>,
}

/// Amadeus self-service API client
pub struct AmadeusClient {
    api_key: String,
    api_secret: String,
    base_url: String,
    currency: String,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    /// Create a client from config
    pub fn new(config: &AmadeusConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self::with_client(config, client)
    }

    /// Create with a custom HTTP client
    pub fn with_client(config: &AmadeusConfig, client: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            currency: config.currency.clone(),
            client,
            token: Mutex::new(None),
        }
    }

    fn token_url(&self) -> String {
        format!("{}/v1/security/oauth2/token", self.base_url)
    }

    fn search_url(&self) -> String {
        format!("{}/v2/shopping/flight-offers", self.base_url)
    }

    /// Get a bearer token, reusing the cached one while it is still fresh
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
            debug!("Amadeus access token expired, refreshing");
        }

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.api_key.as_str()),
            ("client_secret", self.api_secret.as_str()),
        ];

        let response = self
            .client
            .post(self.token_url())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PricingError::AuthError(format!("HTTP {}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PricingError::AuthError(format!("unreadable token response: {}", e)))?;

        let lifetime = token
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });

        info!("Obtained Amadeus access token");
        Ok(token.access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    async fn search(
        &self,
        origin: &str,
        destination: &str,
        departure: NaiveDate,
    ) -> Result<Option<Offer>> {
        let token = self.access_token().await?;
        let departure_date = format_api_date(departure);

        let response = self
            .client
            .get(self.search_url())
            .bearer_auth(&token)
            .query(&[
                ("originLocationCode", origin),
                ("destinationLocationCode", destination),
                ("departureDate", departure_date.as_str()),
                ("adults", "1"),
                ("max", "1"),
                ("currencyCode", self.currency.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
        }

        if !status.is_success() {
            return Err(PricingError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let link = google_flights_link(origin, destination, departure);
        parse_offer(&body, &self.currency, departure, &link)
    }
}

#[async_trait]
impl PriceSource for AmadeusClient {
    async fn find_cheapest(
        &self,
        origin: &str,
        destination: &str,
        earliest: Option<NaiveDate>,
    ) -> Result<Option<Offer>> {
        if !self.is_configured() {
            return Err(PricingError::NotConfigured);
        }

        let departure = resolve_search_date(earliest, today());
        debug!(
            "Searching flights {} -> {} departing {}",
            origin, destination, departure
        );

        match self.search(origin, destination, departure).await {
            Ok(Some(offer)) => {
                debug!(
                    "Cheapest {} -> {}: {:.2} {}",
                    origin, destination, offer.price, offer.currency
                );
                Ok(Some(offer))
            }
            Ok(None) => {
                info!("No flights found for {} -> {}", origin, destination);
                Ok(None)
            }
            Err(e) => {
                warn!("Flight search {} -> {} failed: {}", origin, destination, e);
                Err(e)
            }
        }
    }

    fn is_configured(&self) -> bool {
        !is_placeholder(&self.api_key) && !is_placeholder(&self.api_secret)
    }
}

fn date_part(timestamp: &str) -> Option<NaiveDate> {
    let date = timestamp.split('T').next()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Turn a Flight Offers Search payload into the cheapest offer.
///
/// Amadeus sorts offers by price, so the first one wins. An empty result
/// set, or an offer without itineraries or segments, is `Ok(None)`.
fn parse_offer(
    body: &str,
    currency: &str,
    departure: NaiveDate,
    booking_link: &str,
) -> Result<Option<Offer>> {
    let response: FlightOffersResponse = serde_json::from_str(body)
        .map_err(|e| PricingError::malformed(format!("invalid JSON: {}", e)))?;

    let Some(offer) = response.data.into_iter().next() else {
        return Ok(None);
    };

    let price: f64 = offer
        .price
        .total
        .trim()
        .parse()
        .map_err(|_| PricingError::malformed(format!("price '{}'", offer.price.total)))?;

    if !price.is_finite() || price <= 0.0 {
        return Err(PricingError::malformed(format!("price {}", price)));
    }

    let mut itineraries = offer.itineraries.into_iter();
    let Some(outbound) = itineraries.next() else {
        return Ok(None);
    };
    let (Some(first), Some(last)) = (outbound.segments.first(), outbound.segments.last()) else {
        return Ok(None);
    };

    let outbound_date = first
        .departure
        .at
        .as_deref()
        .and_then(date_part)
        .unwrap_or(departure);

    let inbound_date = itineraries
        .next()
        .and_then(|it| it.segments.into_iter().next())
        .and_then(|seg| seg.departure.at)
        .and_then(|at| date_part(&at));

    let carrier = offer
        .validating_airline_codes
        .into_iter()
        .next()
        .or_else(|| first.carrier_code.clone());

    Ok(Some(Offer {
        price,
        currency: offer.price.currency.unwrap_or_else(|| currency.to_string()),
        origin_code: first.departure.iata_code.clone(),
        destination_code: last.arrival.iata_code.clone(),
        outbound_date,
        inbound_date,
        carrier,
        booking_link: booking_link.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub_http::{direct_client, StubServer};

    const LINK: &str = "https://www.google.com/flights?hl=en#flt=LON.NYC.2026-11-02";

    fn departure() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()
    }

    fn config(key: &str, secret: &str) -> AmadeusConfig {
        AmadeusConfig {
            api_key: key.to_string(),
            api_secret: secret.to_string(),
            ..Default::default()
        }
    }

    const ONE_STOP: &str = r#"{
        "meta": {"count": 1},
        "data": [{
            "type": "flight-offer",
            "id": "1",
            "itineraries": [{
                "duration": "PT11H",
                "segments": [
                    {"departure": {"iataCode": "LHR", "at": "2026-11-02T08:15:00"},
                     "arrival": {"iataCode": "DUB", "at": "2026-11-02T09:40:00"},
                     "carrierCode": "EI"},
                    {"departure": {"iataCode": "DUB", "at": "2026-11-02T11:00:00"},
                     "arrival": {"iataCode": "JFK", "at": "2026-11-02T13:30:00"},
                     "carrierCode": "EI"}
                ]
            }],
            "price": {"currency": "EUR", "total": "412.37", "base": "300.00"},
            "validatingAirlineCodes": ["EI"]
        }]
    }"#;

    #[test]
    fn test_parse_offer_multi_segment() {
        let offer = parse_offer(ONE_STOP, "USD", departure(), LINK)
            .unwrap()
            .unwrap();

        assert_eq!(offer.price, 412.37);
        assert_eq!(offer.currency, "EUR");
        assert_eq!(offer.origin_code, "LHR");
        assert_eq!(offer.destination_code, "JFK");
        assert_eq!(offer.outbound_date, departure());
        assert_eq!(offer.inbound_date, None);
        assert_eq!(offer.carrier.as_deref(), Some("EI"));
        assert_eq!(offer.booking_link, LINK);
    }

    #[test]
    fn test_parse_offer_round_trip_itinerary() {
        let body = r#"{"data": [{
            "itineraries": [
                {"segments": [{"departure": {"iataCode": "LGW", "at": "2026-11-02T07:00:00"},
                               "arrival": {"iataCode": "CDG", "at": "2026-11-02T09:15:00"},
                               "carrierCode": "AF"}]},
                {"segments": [{"departure": {"iataCode": "CDG", "at": "2026-11-09T18:00:00"},
                               "arrival": {"iataCode": "LGW", "at": "2026-11-09T18:20:00"},
                               "carrierCode": "AF"}]}
            ],
            "price": {"total": "150"}
        }]}"#;

        let offer = parse_offer(body, "USD", departure(), LINK).unwrap().unwrap();
        assert_eq!(offer.currency, "USD");
        assert_eq!(offer.inbound_date, NaiveDate::from_ymd_opt(2026, 11, 9));
        assert_eq!(offer.carrier.as_deref(), Some("AF"));
    }

    #[test]
    fn test_parse_offer_empty_is_none() {
        assert!(parse_offer(r#"{"data": []}"#, "USD", departure(), LINK)
            .unwrap()
            .is_none());
        assert!(parse_offer(r#"{"meta": {"count": 0}}"#, "USD", departure(), LINK)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_parse_offer_without_segments_is_none() {
        let no_itineraries = r#"{"data": [{"price": {"total": "99.00"}, "itineraries": []}]}"#;
        assert!(parse_offer(no_itineraries, "USD", departure(), LINK)
            .unwrap()
            .is_none());

        let no_segments =
            r#"{"data": [{"price": {"total": "99.00"}, "itineraries": [{"segments": []}]}]}"#;
        assert!(parse_offer(no_segments, "USD", departure(), LINK)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_parse_offer_malformed() {
        let cases = [
            "not json",
            r#"{"data": [{"itineraries": []}]}"#,
            r#"{"data": [{"price": {"total": "cheap"}}]}"#,
            r#"{"data": [{"price": {"total": "0"}}]}"#,
            r#"{"data": [{"price": {"total": "-12.5"}}]}"#,
            r#"{"data": [{"price": {"total": "NaN"}}]}"#,
        ];

        for body in cases {
            let result = parse_offer(body, "USD", departure(), LINK);
            assert!(
                matches!(result, Err(PricingError::MalformedResponse(_))),
                "expected malformed for {}",
                body
            );
        }
    }

    #[test]
    fn test_parse_offer_missing_departure_time_uses_search_date() {
        let body = r#"{"data": [{
            "itineraries": [{"segments": [{"departure": {"iataCode": "LHR"},
                                           "arrival": {"iataCode": "JFK"}}]}],
            "price": {"total": "300.10"}
        }]}"#;

        let offer = parse_offer(body, "USD", departure(), LINK).unwrap().unwrap();
        assert_eq!(offer.outbound_date, departure());
        assert_eq!(offer.carrier, None);
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let mut cfg = config("key", "secret");
        cfg.base_url = "https://api.amadeus.com/".to_string();
        let client = AmadeusClient::new(&cfg);

        assert_eq!(client.token_url(), "https://api.amadeus.com/v1/security/oauth2/token");
        assert_eq!(client.search_url(), "https://api.amadeus.com/v2/shopping/flight-offers");
    }

    #[test]
    fn test_is_configured() {
        assert!(AmadeusClient::new(&config("key", "secret")).is_configured());
        assert!(!AmadeusClient::new(&config("", "secret")).is_configured());
        assert!(!AmadeusClient::new(&config("your_amadeus_api_key_here", "secret")).is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_client_does_not_search() {
        let client = AmadeusClient::new(&config("", ""));
        let result = client.find_cheapest("LON", "PAR", None).await;
        assert!(matches!(result, Err(PricingError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let client = AmadeusClient::new(&config("key", "secret"));
        *client.token.lock().await = Some(CachedToken {
            value: "cached".to_string(),
            expires_at: Instant::now() + Duration::from_secs(600),
        });

        assert_eq!(client.access_token().await.unwrap(), "cached");

        client.invalidate_token().await;
        assert!(client.token.lock().await.is_none());
    }

    const TOKEN_T1: &str = r#"{"type":"amadeusOAuth2Token","access_token":"t1","expires_in":1799}"#;
    const TOKEN_T2: &str = r#"{"type":"amadeusOAuth2Token","access_token":"t2","expires_in":1799}"#;
    const EXPIRED: &str = r#"{"errors":[{"status":401,"code":38192,"title":"Access token expired"}]}"#;

    fn stub_client(server: &StubServer) -> AmadeusClient {
        let mut cfg = config("key", "secret");
        cfg.base_url = server.base_url.clone();
        AmadeusClient::with_client(&cfg, direct_client())
    }

    #[tokio::test]
    async fn test_token_fetched_once_for_two_searches() {
        let server =
            StubServer::start(vec![(200, TOKEN_T1), (200, ONE_STOP), (200, ONE_STOP)]).await;
        let client = stub_client(&server);

        let first = client.search("LON", "NYC", departure()).await.unwrap().unwrap();
        let second = client.search("LON", "NYC", departure()).await.unwrap().unwrap();
        assert_eq!(first.price, 412.37);
        assert_eq!(second, first);

        let requests = server.requests();
        let paths: Vec<&str> = requests.iter().map(|r| r.path()).collect();
        assert_eq!(
            paths,
            [
                "/v1/security/oauth2/token",
                "/v2/shopping/flight-offers",
                "/v2/shopping/flight-offers"
            ]
        );

        let token = &requests[0];
        assert!(token.request_line().starts_with("POST "));
        assert_eq!(
            token.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert!(token.body.contains("grant_type=client_credentials"));
        assert!(token.body.contains("client_id=key"));
        assert!(token.body.contains("client_secret=secret"));

        for search in &requests[1..] {
            assert!(search.request_line().starts_with("GET "));
            assert_eq!(search.header("authorization"), Some("Bearer t1"));
        }
    }

    #[tokio::test]
    async fn test_search_query_parameters() {
        let server = StubServer::start(vec![(200, TOKEN_T1), (200, r#"{"data": []}"#)]).await;
        let client = stub_client(&server);

        assert!(client.search("LON", "NYC", departure()).await.unwrap().is_none());

        let requests = server.requests();
        let line = requests[1].request_line();
        for param in [
            "originLocationCode=LON",
            "destinationLocationCode=NYC",
            "departureDate=2026-11-02",
            "adults=1",
            "max=1",
            "currencyCode=USD",
        ] {
            assert!(line.contains(param), "{} missing from {}", param, line);
        }
    }

    #[tokio::test]
    async fn test_unauthorized_search_forces_new_token() {
        let server = StubServer::start(vec![
            (200, TOKEN_T1),
            (200, ONE_STOP),
            (401, EXPIRED),
            (200, TOKEN_T2),
            (200, ONE_STOP),
        ])
        .await;
        let client = stub_client(&server);

        assert!(client.search("LON", "NYC", departure()).await.unwrap().is_some());

        let rejected = client.search("LON", "NYC", departure()).await;
        assert!(matches!(
            rejected,
            Err(PricingError::ApiError { status: 401, .. })
        ));
        assert!(client.token.lock().await.is_none());

        assert!(client.search("LON", "NYC", departure()).await.unwrap().is_some());

        let requests = server.requests();
        let paths: Vec<&str> = requests.iter().map(|r| r.path()).collect();
        assert_eq!(
            paths,
            [
                "/v1/security/oauth2/token",
                "/v2/shopping/flight-offers",
                "/v2/shopping/flight-offers",
                "/v1/security/oauth2/token",
                "/v2/shopping/flight-offers"
            ]
        );
        assert_eq!(requests[2].header("authorization"), Some("Bearer t1"));
        assert_eq!(requests[4].header("authorization"), Some("Bearer t2"));
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_auth_error() {
        let server = StubServer::start(vec![(
            401,
            r#"{"error":"invalid_client","error_description":"Client credentials are invalid"}"#,
        )])
        .await;
        let client = stub_client(&server);

        let result = client.find_cheapest("LON", "NYC", None).await;
        assert!(matches!(result, Err(PricingError::AuthError(_))));
        assert_eq!(server.requests().len(), 1);
    }
}
