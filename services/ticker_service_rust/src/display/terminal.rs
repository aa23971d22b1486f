//! Terminal surface: status line plus list view, repainted on every event.

use super::{DisplayEvent, DisplaySink, QuoteList, StatusLine};
use coinbar_rust_core::QuoteCache;
use std::io::{self, Stdout, Write};
use tracing::warn;

pub struct TerminalSurface<W: Write + Send = Stdout> {
    status: StatusLine,
    list: QuoteList,
    out: W,
}

impl TerminalSurface<Stdout> {
    pub fn stdout(currencies: Vec<String>, cache: QuoteCache) -> Self {
        Self::new(currencies, cache, io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(currencies: Vec<String>, cache: QuoteCache, out: W) -> Self {
        Self {
            status: StatusLine::new(),
            list: QuoteList::new(currencies, cache),
            out,
        }
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn list(&self) -> &QuoteList {
        &self.list
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    fn paint(&mut self) -> io::Result<()> {
        writeln!(self.out, "[{}]", self.status.text())?;
        for line in self.list.render() {
            writeln!(self.out, "{}", line)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write + Send> DisplaySink for TerminalSurface<W> {
    fn handle(&mut self, event: &DisplayEvent) {
        self.status.handle(event);
        self.list.handle(event);
    }

    fn redraw(&mut self) {
        if let Err(e) = self.paint() {
            warn!("Failed to paint terminal surface: {}", e);
        }
    }
}
