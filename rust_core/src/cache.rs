//! In-memory cache of the latest successful quote per currency.
//!
//! Entries are only ever written by a successful fetch. A failed fetch never
//! touches the cache, so a previously fetched quote stays visible (stale) and
//! a currency that never succeeded has no entry at all.

use crate::models::CurrencyQuote;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A cached quote together with the time it was observed locally
#[derive(Debug, Clone, PartialEq)]
pub struct CachedQuote {
    pub quote: CurrencyQuote,
    pub observed_at: DateTime<Utc>,
}

impl CachedQuote {
    /// Time elapsed since `observed_at`, clamped at zero
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        let age = now.signed_duration_since(self.observed_at);
        if age < Duration::zero() {
            Duration::zero()
        } else {
            age
        }
    }
}

/// Shared handle to the quote map; clones point at the same entries
#[derive(Debug, Clone, Default)]
pub struct QuoteCache {
    entries: Arc<RwLock<HashMap<String, CachedQuote>>>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a quote under the lowercased requested `id`, replacing any
    /// older entry. The key never comes from `quote.id`, so a quote answered
    /// under a different id still lands where its currency is looked up.
    pub fn insert(&self, id: &str, quote: CurrencyQuote, observed_at: DateTime<Utc>) -> CachedQuote {
        let entry = CachedQuote {
            quote,
            observed_at,
        };
        self.entries.write().insert(id.to_lowercase(), entry.clone());
        entry
    }

    pub fn get(&self, id: &str) -> Option<CachedQuote> {
        self.entries.read().get(&id.to_lowercase()).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(&id.to_lowercase())
    }

    /// Copy of every entry, for rendering without holding the lock
    pub fn snapshot(&self) -> HashMap<String, CachedQuote> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// How old the entry for `id` is, or `None` if it was never fetched
    pub fn staleness(&self, id: &str, now: DateTime<Utc>) -> Option<Duration> {
        self.get(id).map(|entry| entry.age(now))
    }
}
