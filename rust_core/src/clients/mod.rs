pub mod coincap;
pub mod price_source;
pub mod transport;

// Re-export commonly used types
pub use coincap::{CoinCapClient, DEFAULT_BASE_URL, DEFAULT_FETCH_TIMEOUT};
pub use price_source::PriceSource;
pub use transport::{HttpTransport, QuoteTransport};
