//! Single-line status indicator showing the latest fetch of the focused currency.

use super::{DisplayEvent, DisplaySink};
use coinbar_rust_core::utils::format::{status_failure_text, status_text, LOADING_TEXT};

#[derive(Debug, Clone)]
pub struct StatusLine {
    text: String,
}

impl StatusLine {
    pub fn new() -> Self {
        Self {
            text: LOADING_TEXT.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for StatusLine {
    fn handle(&mut self, event: &DisplayEvent) {
        if !event.is_focus() {
            return;
        }

        self.text = match event {
            DisplayEvent::QuoteUpdated { id, quote, .. } => match quote.price() {
                Some(price) => status_text(&quote.symbol, price),
                None => status_failure_text(id),
            },
            DisplayEvent::FetchFailed { id, .. } => status_failure_text(id),
        };
    }
}
