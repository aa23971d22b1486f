//! Configuration for ticker_service_rust

use anyhow::{anyhow, Context, Result};
use coinbar_rust_core::clients::{DEFAULT_BASE_URL, DEFAULT_FETCH_TIMEOUT};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CURRENCIES: [&str; 5] = ["bitcoin", "mask", "ethereum", "dogecoin", "litecoin"];

/// Which currencies each timer tick fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Only the focused currency, cycling through the list
    RoundRobin,
    /// Every tracked currency on every tick, concurrently; the status line
    /// still cycles through the list
    Batch,
}

impl PollMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoundRobin => "round_robin",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for PollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PollMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "batch" => Ok(Self::Batch),
            other => Err(anyhow!("unknown poll mode {:?} (expected batch or round_robin)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Tracked currency ids, lowercase, in display order
    pub currencies: Vec<String>,

    // Polling
    pub poll_interval: Duration,
    pub poll_mode: PollMode,
    pub fetch_timeout: Duration,

    // CoinCap
    pub base_url: String,

    // Display fan-out
    pub event_buffer: usize,

    // Monitoring
    pub stats_log_every: u64,
}

impl TickerConfig {
    pub fn new(currencies: Vec<String>, poll_interval: Duration) -> Self {
        Self {
            currencies: normalize_currencies(currencies),
            poll_interval,
            poll_mode: PollMode::Batch,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            base_url: DEFAULT_BASE_URL.to_string(),
            event_buffer: 64,
            stats_log_every: 20,
        }
    }

    pub fn with_poll_mode(mut self, poll_mode: PollMode) -> Self {
        self.poll_mode = poll_mode;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }

    pub fn from_env() -> Result<Self> {
        let currencies = match env::var("TICKER_CURRENCIES") {
            Ok(list) => list.split(',').map(|s| s.to_string()).collect(),
            Err(_) => DEFAULT_CURRENCIES.iter().map(|s| s.to_string()).collect(),
        };

        let poll_mode = match env::var("TICKER_POLL_MODE") {
            Ok(mode) => mode.parse::<PollMode>().context("TICKER_POLL_MODE")?,
            Err(_) => PollMode::Batch,
        };

        let config = Self {
            currencies: normalize_currencies(currencies),
            poll_interval: Duration::from_secs(parse_u64("TICKER_POLL_INTERVAL_SECS", 15)?),
            poll_mode,
            fetch_timeout: Duration::from_secs(parse_u64(
                "TICKER_FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT.as_secs(),
            )?),
            base_url: env::var("COINCAP_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            event_buffer: parse_u64("TICKER_EVENT_BUFFER", 64)? as usize,
            stats_log_every: parse_u64("TICKER_STATS_LOG_EVERY", 20)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currencies.is_empty() {
            return Err(anyhow!("TICKER_CURRENCIES must list at least one currency"));
        }
        if self.poll_interval.is_zero() {
            return Err(anyhow!("TICKER_POLL_INTERVAL_SECS must be > 0"));
        }
        if self.fetch_timeout.is_zero() {
            return Err(anyhow!("TICKER_FETCH_TIMEOUT_SECS must be > 0"));
        }
        if self.event_buffer == 0 {
            return Err(anyhow!("TICKER_EVENT_BUFFER must be > 0"));
        }
        Ok(())
    }
}

/// Trim, lowercase and de-duplicate ids, keeping first-seen order
pub fn normalize_currencies(currencies: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(currencies.len());
    for id in currencies {
        let id = id.trim().to_lowercase();
        if !id.is_empty() && !normalized.contains(&id) {
            normalized.push(id);
        }
    }
    normalized
}

/// Parse environment variable as u64 with default fallback
fn parse_u64(var_name: &str, default: u64) -> Result<u64> {
    match env::var(var_name) {
        Ok(val) => val.trim().parse().map_err(|_| anyhow!("{} must be a valid u64", var_name)),
        Err(_) => Ok(default),
    }
}
