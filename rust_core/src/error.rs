//! Error types for a single rate fetch.

use std::time::Duration;
use thiserror::Error;

/// Failure reported by a [`QuoteTransport`](crate::clients::QuoteTransport)
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, TLS or I/O failure inside the HTTP client
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the fetch timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Why a single `fetch_price` call failed.
///
/// Every variant is local to one attempt; callers are expected to log it and
/// move on, the next poll being the retry.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Identifier is empty or cannot be embedded in the request path
    #[error("invalid currency identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// Transport succeeded but the body was empty
    #[error("empty response body")]
    EmptyResponse,

    /// Body is not JSON or lacks `data.id`, `data.symbol`, `data.rateUsd` or `data.type`
    #[error("failed to decode rate response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Short machine-friendly label, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::Network(_) => "network_error",
            Self::EmptyResponse => "empty_response",
            Self::Decode(_) => "decode_error",
        }
    }
}
