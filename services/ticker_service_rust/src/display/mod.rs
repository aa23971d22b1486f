//! Display fan-out.
//!
//! The poller publishes [`DisplayEvent`]s on a broadcast channel. Each display
//! surface subscribes on its own and is driven by [`run_sink`], so rendering
//! never sits on the fetch path.

pub mod list;
pub mod status;
pub mod terminal;

pub use list::{ListRow, QuoteList, RowState};
pub use status::StatusLine;
pub use terminal::TerminalSurface;

use chrono::{DateTime, Utc};
use coinbar_rust_core::CurrencyQuote;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

/// Something a display surface should react to.
///
/// `focus` marks the currency the status line follows on this tick; the list
/// view applies every event regardless.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DisplayEvent {
    /// A fetch for `id` succeeded and the cache now holds `quote`
    QuoteUpdated {
        id: String,
        quote: CurrencyQuote,
        observed_at: DateTime<Utc>,
        focus: bool,
    },
    /// A fetch for `id` failed; any cached quote was left untouched
    FetchFailed {
        id: String,
        reason: String,
        focus: bool,
    },
}

impl DisplayEvent {
    pub fn id(&self) -> &str {
        match self {
            Self::QuoteUpdated { id, .. } | Self::FetchFailed { id, .. } => id,
        }
    }

    pub fn is_focus(&self) -> bool {
        match self {
            Self::QuoteUpdated { focus, .. } | Self::FetchFailed { focus, .. } => *focus,
        }
    }
}

/// A display surface fed by poller events
pub trait DisplaySink: Send {
    /// Apply one event to the surface's state
    fn handle(&mut self, event: &DisplayEvent);

    /// Repaint after one or more events were handled
    fn redraw(&mut self) {}
}

/// Drive `sink` from `events` until the sender side is dropped.
///
/// Returns the sink so callers (and tests) can inspect its final state.
pub async fn run_sink<S: DisplaySink>(mut events: broadcast::Receiver<DisplayEvent>, mut sink: S) -> S {
    loop {
        match events.recv().await {
            Ok(event) => {
                debug!(
                    "Display event: {}",
                    serde_json::to_string(&event).unwrap_or_else(|_| event.id().to_string())
                );
                sink.handle(&event);
                sink.redraw();
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Display sink lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => return sink,
        }
    }
}
