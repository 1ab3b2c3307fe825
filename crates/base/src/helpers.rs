use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::entities::PRICE_DECIMAL_PLACES;

const TICKET_TIME_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

pub fn from_iso_utc_str_to_utc_datetime(time_str: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::from(
        DateTime::parse_from_rfc3339(time_str)
            .context(format!("error on parsing UTC datetime from {}", time_str))?,
    ))
}

pub fn format_ticket_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format(TICKET_TIME_FORMAT).to_string()
}

pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp(PRICE_DECIMAL_PLACES).normalize();
    rounded.to_string()
}

/// Escapes the characters that would otherwise break out of HTML text content.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }

    escaped
}
