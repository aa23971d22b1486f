//! Coinbar Core - CoinCap rate fetching and quote caching.
//!
//! This module provides:
//! - A stateless CoinCap rates client behind the [`PriceSource`] trait
//! - A tolerant decoder for the `/v2/rates/{id}` response
//! - The [`CurrencyQuote`] model and its derived numeric price
//! - A shared in-memory [`QuoteCache`] of the latest quote per currency
//! - Price and timestamp formatting for display surfaces

pub mod cache;
pub mod clients;
pub mod error;
pub mod models;
pub mod utils;

pub use cache::{CachedQuote, QuoteCache};
pub use clients::{CoinCapClient, PriceSource, QuoteTransport};
pub use error::{FetchError, TransportError};
pub use models::CurrencyQuote;
