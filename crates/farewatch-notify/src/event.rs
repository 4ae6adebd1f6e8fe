//! Price alert messages

use chrono::NaiveDate;
use farewatch_core::{Offer, TrackedRoute};
use serde::{Deserialize, Serialize};

/// Tone of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// New record low at or below target
    PriceDrop,
    /// Still at or below target, not a new low
    Update,
}

/// Everything a price notification shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    pub kind: AlertKind,
    pub route_id: u32,
    pub origin_code: String,
    pub destination_code: String,
    /// Departure airport of the offer (may differ from a city code)
    pub departure_airport: String,
    /// Arrival airport of the offer
    pub arrival_airport: String,
    pub current_price: f64,
    pub target_price: f64,
    /// Watermark before this observation
    pub previous_lowest: Option<f64>,
    pub currency: String,
    pub outbound_date: NaiveDate,
    pub inbound_date: Option<NaiveDate>,
    pub carrier: Option<String>,
    pub booking_link: String,
}

impl PriceAlert {
    pub fn new(kind: AlertKind, route: &TrackedRoute, offer: &Offer) -> Self {
        Self {
            kind,
            route_id: route.id,
            origin_code: route.origin_code.clone(),
            destination_code: route.destination_code.clone(),
            departure_airport: offer.origin_code.clone(),
            arrival_airport: offer.destination_code.clone(),
            current_price: offer.price,
            target_price: route.target_price,
            previous_lowest: route.lowest_price_seen,
            currency: offer.currency.clone(),
            outbound_date: offer.outbound_date,
            inbound_date: offer.inbound_date,
            carrier: offer.carrier.clone(),
            booking_link: offer.booking_link.clone(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self.kind {
            AlertKind::PriceDrop => "price_drop",
            AlertKind::Update => "update",
        }
    }

    fn price(&self, amount: f64) -> String {
        format!("{:.2} {}", amount, escape_html(&self.currency))
    }

    /// Format the alert as a Telegram HTML message
    pub fn format_message(&self) -> String {
        let (header, price_icon) = match self.kind {
            AlertKind::PriceDrop => (
                "\u{1F4C9} <b>FLIGHT PRICE DROP ALERT!</b> \u{1F4C9}",
                "\u{1F525}",
            ),
            AlertKind::Update => ("\u{2708}\u{FE0F} <b>Price Update</b>", "\u{1F4B0}"),
        };

        let lowest = self
            .previous_lowest
            .map(|p| self.price(p))
            .unwrap_or_else(|| "N/A".to_string());

        let mut msg = format!("{}\n\n", header);
        msg.push_str(&format!(
            "<b>{} ({}) \u{27A1}\u{FE0F} {} ({})</b>\n\n",
            escape_html(&self.origin_code),
            escape_html(&self.departure_airport),
            escape_html(&self.destination_code),
            escape_html(&self.arrival_airport),
        ));
        msg.push_str(&format!(
            "{} <b>Current Price: {}</b>\n",
            price_icon,
            self.price(self.current_price)
        ));
        msg.push_str(&format!(
            "\u{1F3AF} Your Target: {}\n",
            self.price(self.target_price)
        ));
        msg.push_str(&format!("\u{1F4CA} Lowest Seen: {}\n\n", lowest));
        msg.push_str(&format!("\u{1F6EB} Outbound: {}\n", self.outbound_date));
        if let Some(inbound) = self.inbound_date {
            msg.push_str(&format!("\u{1F6EC} Inbound: {}\n", inbound));
        }
        if let Some(carrier) = &self.carrier {
            msg.push_str(&format!("\u{1F4BA} Airline: {}\n", escape_html(carrier)));
        }
        msg.push_str(&format!(
            "\n<a href=\"{}\">\u{2708}\u{FE0F} Book on Google Flights</a>",
            escape_html(&self.booking_link)
        ));
        msg
    }
}

/// Escape text for Telegram's HTML parse mode
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
