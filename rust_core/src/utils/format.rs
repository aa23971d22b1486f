//! Display formatting for quotes.
//!
//! Prices are always shown with four decimal places. Timestamps are shown in
//! the local timezone as `HH:MM:SS`.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Placeholder shown before the first fetch completes
pub const LOADING_TEXT: &str = "Loading...";

/// Placeholder shown when no usable price is available
pub const FAILED_TEXT: &str = "Failed to fetch";

/// List-view price: `"$ 65000.5000"`
pub fn format_usd(price: f64) -> String {
    format!("$ {:.4}", price)
}

/// Status line for a successful quote: `"BTC: $65000.5000"`
pub fn status_text(symbol: &str, price: f64) -> String {
    format!("{}: ${:.4}", symbol, price)
}

/// Status line when the latest fetch for `id` failed: `"bitcoin: -"`
pub fn status_failure_text(id: &str) -> String {
    format!("{}: -", id)
}

/// Wall-clock marker in the given timezone: `"(Updated: 14:03:27)"`
pub fn updated_marker_in<Tz: TimeZone>(observed_at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "(Updated: {})",
        observed_at.with_timezone(tz).format("%H:%M:%S")
    )
}

/// [`updated_marker_in`] using the machine's local timezone
pub fn updated_marker(observed_at: DateTime<Utc>) -> String {
    updated_marker_in(observed_at, &Local)
}
