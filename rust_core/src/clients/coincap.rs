//! CoinCap API Client
//!
//! Fetches USD rates from the public CoinCap `/v2/rates/{id}` endpoint.
//! No API key required. The client is stateless: it holds a transport, a
//! base URL and a per-request timeout, and never caches anything.

use super::price_source::PriceSource;
use super::transport::{HttpTransport, QuoteTransport};
use crate::error::{FetchError, TransportError};
use crate::models::{CurrencyQuote, RateResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.coincap.io/v2";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// CoinCap rates client implementing [`PriceSource`]
#[derive(Clone)]
pub struct CoinCapClient {
    transport: Arc<dyn QuoteTransport>,
    base_url: String,
    timeout: Duration,
}

impl CoinCapClient {
    /// Create a client backed by a real HTTP transport
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(timeout)?;
        Ok(Self::with_transport(Arc::new(transport)).with_timeout(timeout))
    }

    /// Create a client over any transport (tests use a fake one)
    pub fn with_transport(transport: Arc<dyn QuoteTransport>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the rates URL for a currency, rejecting identifiers that would
    /// escape the path segment
    pub fn rate_url(&self, currency_id: &str) -> Result<String, FetchError> {
        if !is_valid_identifier(currency_id) {
            return Err(FetchError::InvalidIdentifier(currency_id.to_string()));
        }
        Ok(format!("{}/rates/{}", self.base_url, currency_id))
    }

    /// Decode a `/rates/{id}` body.
    ///
    /// Only the JSON shape is checked here. A `rateUsd` string that is not a
    /// number still decodes; it shows up as `price() == None`.
    pub fn decode_rate(body: &[u8]) -> Result<CurrencyQuote, FetchError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(FetchError::EmptyResponse);
        }

        let response: RateResponse = serde_json::from_slice(body)?;
        if let Some(server_time) = response.api_timestamp() {
            debug!("CoinCap server time for {}: {}", response.data.id, server_time);
        }
        Ok(response.data)
    }
}

/// Identifiers are used verbatim as a path segment
fn is_valid_identifier(currency_id: &str) -> bool {
    !currency_id.is_empty()
        && currency_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl PriceSource for CoinCapClient {
    fn source_name(&self) -> &str {
        "CoinCap"
    }

    async fn fetch_price(&self, currency_id: &str) -> Result<CurrencyQuote, FetchError> {
        let url = self.rate_url(currency_id)?;

        debug!("Fetching rate for {} from CoinCap", currency_id);

        let body = match tokio::time::timeout(self.timeout, self.transport.get(&url)).await {
            Ok(result) => result?,
            Err(_) => return Err(TransportError::Timeout(self.timeout).into()),
        };

        let quote = Self::decode_rate(&body)?;
        debug!(
            "CoinCap rate for {}: {} = {}",
            currency_id, quote.symbol, quote.rate_usd
        );
        Ok(quote)
    }
}
