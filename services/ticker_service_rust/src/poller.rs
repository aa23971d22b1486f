//! Poller: picks what to fetch on each tick, applies results to the cache and
//! publishes display events.
//!
//! Target selection ([`Poller::next_targets`]) is synchronous and happens when
//! the tick fires, so the rotation order is fixed even if fetches from
//! consecutive ticks overlap. Fetching ([`Poller::fetch_targets`]) is async and
//! may run concurrently with later ticks; every write is keyed by the requested
//! currency, so overlapping completions never conflict.
//!
//! One cursor rotates through the tracked currencies in both modes. The id it
//! lands on is the tick's focus, which the status line follows. Round-robin
//! fetches only the focus; batch fetches everything for the list view.

use crate::config::PollMode;
use crate::display::DisplayEvent;
use chrono::Utc;
use coinbar_rust_core::{CurrencyQuote, PriceSource, QuoteCache};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct PollStats {
    pub ticks: AtomicU64,
    pub fetches_ok: AtomicU64,
    pub fetches_failed: AtomicU64,
}

impl PollStats {
    pub fn snapshot(&self) -> PollStatsSnapshot {
        PollStatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            fetches_ok: self.fetches_ok.load(Ordering::Relaxed),
            fetches_failed: self.fetches_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollStatsSnapshot {
    pub ticks: u64,
    pub fetches_ok: u64,
    pub fetches_failed: u64,
}

/// What one tick fetches and which currency the status line follows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickTargets {
    pub ids: Vec<String>,
    pub focus: Option<String>,
}

pub struct Poller {
    source: Arc<dyn PriceSource>,
    currencies: Vec<String>,
    mode: PollMode,
    cursor: AtomicUsize,
    cache: QuoteCache,
    events: broadcast::Sender<DisplayEvent>,
    stats: PollStats,
}

impl Poller {
    pub fn new(
        source: Arc<dyn PriceSource>,
        currencies: Vec<String>,
        mode: PollMode,
        cache: QuoteCache,
        events: broadcast::Sender<DisplayEvent>,
    ) -> Self {
        info!(
            "Poller tracking {:?} via {} ({} mode)",
            currencies,
            source.source_name(),
            mode
        );

        Self {
            source,
            currencies,
            mode,
            cursor: AtomicUsize::new(0),
            cache,
            events,
            stats: PollStats::default(),
        }
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    pub fn mode(&self) -> PollMode {
        self.mode
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DisplayEvent> {
        self.events.subscribe()
    }

    pub fn stats(&self) -> PollStatsSnapshot {
        self.stats.snapshot()
    }

    /// Select the currencies for one tick.
    ///
    /// The focus is the id at the cursor, which then advances (wrapping).
    /// Round-robin fetches just the focus; batch fetches every tracked id.
    pub fn next_targets(&self) -> TickTargets {
        self.stats.ticks.fetch_add(1, Ordering::Relaxed);

        if self.currencies.is_empty() {
            return TickTargets::default();
        }

        let len = self.currencies.len();
        let index = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some((c + 1) % len))
            .unwrap_or_else(|current| current);
        let focus = self.currencies[index % len].clone();

        let ids = match self.mode {
            PollMode::RoundRobin => vec![focus.clone()],
            PollMode::Batch => self.currencies.clone(),
        };

        TickTargets {
            ids,
            focus: Some(focus),
        }
    }

    /// Fetch `targets`, update the cache and publish one event per target
    pub async fn fetch_targets(&self, targets: TickTargets) {
        let results = self.source.fetch_all(&targets.ids).await;

        for (currency_id, result) in results {
            let focus = targets.focus.as_deref() == Some(currency_id.as_str());
            match result {
                Ok(quote) => self.record_success(&currency_id, quote, focus),
                Err(e) => {
                    warn!(
                        "{} fetch failed for {} ({}): {}",
                        self.source.source_name(),
                        currency_id,
                        e.kind(),
                        e
                    );
                    self.record_failure(&currency_id, e.to_string(), focus);
                }
            }
        }
    }

    /// One full tick: select targets and wait for their fetches
    pub async fn poll_once(&self) {
        let targets = self.next_targets();
        self.fetch_targets(targets).await;
    }

    fn record_success(&self, currency_id: &str, quote: CurrencyQuote, focus: bool) {
        if !quote.answers_for(currency_id) {
            warn!(
                "Requested {} but CoinCap answered with id {}",
                currency_id, quote.id
            );
        }

        let entry = self.cache.insert(currency_id, quote, Utc::now());
        self.stats.fetches_ok.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Cached {} = {} at {}",
            currency_id, entry.quote.rate_usd, entry.observed_at
        );

        self.publish(DisplayEvent::QuoteUpdated {
            id: currency_id.to_string(),
            quote: entry.quote,
            observed_at: entry.observed_at,
            focus,
        });
    }

    fn record_failure(&self, currency_id: &str, reason: String, focus: bool) {
        self.stats.fetches_failed.fetch_add(1, Ordering::Relaxed);
        if self.cache.contains(currency_id) {
            debug!("Keeping stale quote for {}", currency_id);
        }

        self.publish(DisplayEvent::FetchFailed {
            id: currency_id.to_string(),
            reason,
            focus,
        });
    }

    fn publish(&self, event: DisplayEvent) {
        // No subscribers is fine; the cache is still up to date
        if self.events.send(event).is_err() {
            debug!("No display subscribers");
        }
    }
}
