//! HTTP transport seam for the rate client.
//!
//! The client only needs "GET this URL, give me the body". Keeping that behind
//! a trait lets tests drive the decoder with canned bodies and failures.

use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = "Coinbar/1.0";

#[async_trait]
pub trait QuoteTransport: Send + Sync {
    /// Perform a GET and return the raw response body
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// `reqwest`-backed transport used in production
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl QuoteTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are still handed to the decoder
            warn!("CoinCap returned {} for {}", status, url);
        }

        let body = response.bytes().await?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(body.to_vec())
    }
}
