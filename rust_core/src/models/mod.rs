//! Quote data model for the CoinCap rates endpoint.
//!
//! `RateResponse` mirrors the wire envelope returned by `/v2/rates/{id}`;
//! `CurrencyQuote` is the typed record handed to the rest of the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fetched price observation for a single currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyQuote {
    /// Canonical currency identifier (e.g. "bitcoin")
    pub id: String,
    /// Ticker symbol exactly as reported (e.g. "BTC")
    pub symbol: String,
    /// Glyph such as "₿", often missing
    #[serde(rename = "currencySymbol", default)]
    pub currency_symbol: Option<String>,
    /// Raw decimal string, kept verbatim
    #[serde(rename = "rateUsd")]
    pub rate_usd: String,
    /// Asset classification (e.g. "crypto", "fiat")
    #[serde(rename = "type")]
    pub kind: String,
}

impl CurrencyQuote {
    /// USD price parsed from `rate_usd`.
    ///
    /// Returns `None` when the string is not a finite decimal number; the
    /// quote itself is still valid in that case.
    pub fn price(&self) -> Option<f64> {
        self.rate_usd
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
    }

    /// Whether the API answered for `currency_id` (case-insensitive)
    pub fn answers_for(&self, currency_id: &str) -> bool {
        self.id.eq_ignore_ascii_case(currency_id)
    }

    /// Identifier with the first letter capitalised ("bitcoin" -> "Bitcoin")
    pub fn display_name(&self) -> String {
        display_name(&self.id)
    }
}

/// Capitalise the first character of a currency identifier for display
pub fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Envelope returned by `GET /v2/rates/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct RateResponse {
    pub data: CurrencyQuote,
    /// Server time in unix milliseconds
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl RateResponse {
    pub fn api_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}
