//! Table, text and JSON output

use colored::Colorize;
use farewatch_core::dates::DISPLAY_DATE_FORMAT;
use farewatch_core::{Offer, PricePoint, TrackedRoute};
use farewatch_monitor::CycleReport;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

#[derive(Tabled)]
pub struct RouteRow {
    #[tabled(rename = "id")]
    pub id: u32,
    #[tabled(rename = "route")]
    pub route: String,
    #[tabled(rename = "target")]
    pub target: String,
    #[tabled(rename = "lowest")]
    pub lowest: String,
    #[tabled(rename = "window")]
    pub window: String,
    #[tabled(rename = "added")]
    pub added: String,
}

impl From<&TrackedRoute> for RouteRow {
    fn from(route: &TrackedRoute) -> Self {
        let lowest = match route.lowest_price_seen {
            Some(p) if p <= route.target_price => format_price(p).green().to_string(),
            Some(p) => format_price(p),
            None => "-".dimmed().to_string(),
        };

        RouteRow {
            id: route.id,
            route: route.label(),
            target: format_price(route.target_price),
            lowest,
            window: format_window(route),
            added: route.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct HistoryRow {
    #[tabled(rename = "checked at")]
    pub checked_at: String,
    #[tabled(rename = "price")]
    pub price: String,
}

impl From<&PricePoint> for HistoryRow {
    fn from(point: &PricePoint) -> Self {
        HistoryRow {
            checked_at: point.checked_at.format("%Y-%m-%d %H:%M").to_string(),
            price: format_price(point.price),
        }
    }
}

/// JSON wrapper for generic responses
#[derive(Serialize)]
pub struct ResponseJson<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}

pub fn print_routes_table(routes: &[TrackedRoute]) {
    if is_json_mode() {
        print_json(routes);
        return;
    }

    if routes.is_empty() {
        println!("No routes tracked. Add one with: farewatch add <FROM> <TO> --target <PRICE>");
        return;
    }

    let rows: Vec<RouteRow> = routes.iter().map(RouteRow::from).collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::right()))
        .to_string();

    println!("{}", table);
}

pub fn print_history(route: &TrackedRoute, points: &[PricePoint]) {
    if is_json_mode() {
        print_json(points);
        return;
    }

    println!("{} (target {})", route.label().bold(), format_price(route.target_price));

    if points.is_empty() {
        println!("No prices recorded yet");
        return;
    }

    let rows: Vec<HistoryRow> = points.iter().map(HistoryRow::from).collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()))
        .to_string();

    println!("{}", table);
}

pub fn print_report(report: &CycleReport) {
    if is_json_mode() {
        print_json(report);
        return;
    }

    println!("{}", "Price check complete".bold());
    println!("  Routes checked:    {}", report.checked);
    println!("  Priced:            {}", report.found);
    println!("  No offers:         {}", report.not_found);
    println!("  Lookup errors:     {}", report.errors);
    println!("  Window closed:     {}", report.skipped);
    println!("  New lows recorded: {}", report.watermarks_lowered);
    println!("  Alerts sent:       {}", report.notified);
    if report.notify_failed > 0 {
        println!("  Alerts failed:     {}", report.notify_failed.to_string().red());
    }
}

pub fn print_offer(offer: &Offer) {
    if is_json_mode() {
        print_json(offer);
        return;
    }

    println!(
        "{} -> {}: {}",
        offer.origin_code,
        offer.destination_code,
        format!("{:.2} {}", offer.price, offer.currency).green().bold()
    );
    println!("  Outbound: {}", offer.outbound_date);
    if let Some(inbound) = offer.inbound_date {
        println!("  Inbound:  {}", inbound);
    }
    if let Some(carrier) = &offer.carrier {
        println!("  Airline:  {}", carrier);
    }
    println!("  Book:     {}", offer.booking_link);
}

/// Format a price with two decimals
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Departure window in display form, "-" when open-ended on both sides
pub fn format_window(route: &TrackedRoute) -> String {
    let fmt = |d: chrono::NaiveDate| d.format(DISPLAY_DATE_FORMAT).to_string();
    match (route.date_from, route.date_to) {
        (None, None) => "-".to_string(),
        (Some(from), None) => format!("from {}", fmt(from)),
        (None, Some(to)) => format!("until {}", fmt(to)),
        (Some(from), Some(to)) => format!("{} - {}", fmt(from), fmt(to)),
    }
}

pub fn print_success(message: &str) {
    if is_json_mode() {
        print_success_json::<()>(message, None);
        return;
    }
    println!("{} {}", "✓".green(), message);
}

pub fn print_error(message: &str) {
    if is_json_mode() {
        let response: ResponseJson<()> = ResponseJson {
            success: false,
            message: Some(message.to_string()),
            data: None,
        };
        if let Ok(json) = serde_json::to_string_pretty(&response) {
            eprintln!("{}", json);
        }
        return;
    }
    eprintln!("{} {}", "✗".red(), message);
}

pub fn print_info(message: &str) {
    if is_json_mode() {
        return;
    }
    println!("{} {}", "ℹ".blue(), message);
}

pub fn print_warning(message: &str) {
    if is_json_mode() {
        return;
    }
    eprintln!("{} {}", "!".yellow(), message);
}

/// Print a success message with an optional payload in JSON mode
pub fn print_success_json<T: Serialize>(message: &str, data: Option<T>) {
    print_json(&ResponseJson {
        success: true,
        message: Some(message.to_string()),
        data,
    });
}
