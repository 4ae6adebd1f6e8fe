//! Departure date parsing and search date resolution

use chrono::{Local, NaiveDate};

use crate::error::{Error, Result};

/// Format the pricing API expects and the store persists
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Day-first format accepted from users
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a date given either as `YYYY-MM-DD` or `DD/MM/YYYY`
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, API_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, DISPLAY_DATE_FORMAT))
        .map_err(|_| {
            Error::InvalidDate(format!(
                "'{}' (expected YYYY-MM-DD or DD/MM/YYYY)",
                input
            ))
        })
}

/// Render a date the way the pricing API wants it
pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

/// Current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Pick the departure date to search for.
///
/// Searches never target today or the past: with no earliest date, or an
/// earliest date that is not after `today`, the search falls on tomorrow.
pub fn resolve_search_date(earliest: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    let tomorrow = today.succ_opt().unwrap_or(today);
    match earliest {
        Some(date) if date > today => date,
        _ => tomorrow,
    }
}

/// Whether the departure window ended before the date we would search
pub fn window_closed(search_date: NaiveDate, latest: Option<NaiveDate>) -> bool {
    latest.map(|latest| search_date > latest).unwrap_or(false)
}
