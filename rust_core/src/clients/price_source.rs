//! Price Source Trait
//!
//! Common interface for anything that can produce a [`CurrencyQuote`] for a
//! currency identifier. The poller only depends on this trait, so tests can
//! swap the CoinCap client for a scripted fake.

use crate::error::FetchError;
use crate::models::CurrencyQuote;
use async_trait::async_trait;
use futures_util::future::join_all;
use std::collections::HashMap;
use tracing::{debug, warn};

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Display name used in logs (e.g. "CoinCap")
    fn source_name(&self) -> &str;

    /// Fetch the current quote for one currency identifier
    async fn fetch_price(&self, currency_id: &str) -> Result<CurrencyQuote, FetchError>;

    /// Fetch several currencies concurrently and keep every outcome.
    ///
    /// Results come back in request order, paired with the identifier that
    /// was asked for (not the `data.id` the API answered with).
    async fn fetch_all(
        &self,
        currency_ids: &[String],
    ) -> Vec<(String, Result<CurrencyQuote, FetchError>)> {
        let fetches = currency_ids.iter().map(|currency_id| async move {
            (currency_id.clone(), self.fetch_price(currency_id).await)
        });
        join_all(fetches).await
    }

    /// Fetch several currencies concurrently, best effort.
    ///
    /// Successful quotes are keyed by the lowercased requested id; failures
    /// are logged and left out of the map, so a missing key means that fetch
    /// failed.
    async fn fetch_prices(&self, currency_ids: &[String]) -> HashMap<String, CurrencyQuote> {
        let mut quotes = HashMap::with_capacity(currency_ids.len());
        for (currency_id, result) in self.fetch_all(currency_ids).await {
            match result {
                Ok(quote) => {
                    quotes.insert(currency_id.to_lowercase(), quote);
                }
                Err(e) => {
                    warn!(
                        "{} fetch failed for {} ({}): {}",
                        self.source_name(),
                        currency_id,
                        e.kind(),
                        e
                    );
                }
            }
        }

        debug!(
            "{} batch complete: {}/{} quotes",
            self.source_name(),
            quotes.len(),
            currency_ids.len()
        );
        quotes
    }
}
