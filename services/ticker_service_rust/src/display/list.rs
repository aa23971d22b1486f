//! List view of every tracked currency.
//!
//! Prices come straight from the shared [`QuoteCache`]; events only tell the
//! list which rows changed and whether the latest attempt for a row failed.

use super::{DisplayEvent, DisplaySink};
use chrono::{DateTime, Local, TimeZone, Utc};
use coinbar_rust_core::models::display_name;
use coinbar_rust_core::utils::format::{format_usd, updated_marker_in, FAILED_TEXT, LOADING_TEXT};
use coinbar_rust_core::QuoteCache;
use std::collections::HashMap;

pub const GROUP_TITLE: &str = "Cryptocurrencies";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// No fetch has completed yet
    Loading,
    /// Latest fetch succeeded
    Ready,
    /// Latest fetch failed but an older quote is still cached
    Stale,
    /// Nothing usable: never fetched successfully, or the rate is not a number
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    pub price_text: String,
    pub kind: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub state: RowState,
}

impl ListRow {
    /// Two display lines for this row, timestamps rendered in `tz`
    pub fn lines_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<String>
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut first = format!("    {:<12} {}", self.name, self.price_text);
        if let Some(updated_at) = self.updated_at {
            first.push(' ');
            first.push_str(&updated_marker_in(updated_at, tz));
        }
        if self.state == RowState::Stale {
            first.push_str(" [stale]");
        }

        let mut lines = vec![first];
        if let Some(kind) = &self.kind {
            lines.push(format!("        {} - ID: {}", kind, self.id));
        }
        lines
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RowTrack {
    seen: bool,
    last_failed: bool,
}

pub struct QuoteList {
    currencies: Vec<String>,
    cache: QuoteCache,
    tracks: HashMap<String, RowTrack>,
}

impl QuoteList {
    pub fn new(currencies: Vec<String>, cache: QuoteCache) -> Self {
        Self {
            currencies,
            cache,
            tracks: HashMap::new(),
        }
    }

    pub fn rows(&self) -> Vec<ListRow> {
        self.currencies.iter().map(|id| self.row(id)).collect()
    }

    fn row(&self, id: &str) -> ListRow {
        let track = self.tracks.get(id).copied().unwrap_or_default();
        let cached = self.cache.get(id);
        let name = display_name(id);

        match cached {
            Some(entry) => match entry.quote.price() {
                Some(price) => ListRow {
                    id: id.to_string(),
                    name,
                    price_text: format_usd(price),
                    kind: Some(entry.quote.kind.clone()),
                    updated_at: Some(entry.observed_at),
                    state: if track.last_failed {
                        RowState::Stale
                    } else {
                        RowState::Ready
                    },
                },
                None => ListRow {
                    id: id.to_string(),
                    name,
                    price_text: FAILED_TEXT.to_string(),
                    kind: None,
                    updated_at: None,
                    state: RowState::Failed,
                },
            },
            None => ListRow {
                id: id.to_string(),
                name,
                price_text: (if track.seen { FAILED_TEXT } else { LOADING_TEXT }).to_string(),
                kind: None,
                updated_at: None,
                state: if track.seen {
                    RowState::Failed
                } else {
                    RowState::Loading
                },
            },
        }
    }

    /// Full rendering with the group header, timestamps in `tz`
    pub fn render_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<String>
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut lines = vec![GROUP_TITLE.to_string()];
        for row in self.rows() {
            lines.extend(row.lines_in(tz));
        }
        lines
    }

    /// [`render_in`](Self::render_in) using the local timezone
    pub fn render(&self) -> Vec<String> {
        self.render_in(&Local)
    }
}

impl DisplaySink for QuoteList {
    fn handle(&mut self, event: &DisplayEvent) {
        let id = event.id().to_lowercase();
        if !self.currencies.contains(&id) {
            return;
        }

        let track = self.tracks.entry(id).or_default();
        track.seen = true;
        track.last_failed = matches!(event, DisplayEvent::FetchFailed { .. });
    }
}
