//! ticker_service_rust - polls CoinCap for a fixed set of currencies and
//! feeds a status line and list view

pub mod config;
pub mod display;
pub mod poller;
pub mod service;

pub use config::{PollMode, TickerConfig};
pub use display::{DisplayEvent, DisplaySink};
pub use poller::{Poller, TickTargets};
pub use service::TickerService;
