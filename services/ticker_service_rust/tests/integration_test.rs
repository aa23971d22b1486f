//! Ticker service integration tests
//!
//! Drive the full timer loop against a scripted price source. The live
//! CoinCap test needs network access and runs with `cargo test -- --ignored`.

use async_trait::async_trait;
use coinbar_rust_core::{CurrencyQuote, FetchError, PriceSource};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use ticker_service_rust::display::{QuoteList, RowState, StatusLine};
use ticker_service_rust::{DisplayEvent, DisplaySink, PollMode, TickerConfig, TickerService};
use tokio::sync::{broadcast, oneshot};
use tokio::time::timeout;

struct FakeCoinCap {
    rates: HashMap<&'static str, (&'static str, &'static str)>,
    calls: Mutex<Vec<String>>,
}

impl FakeCoinCap {
    fn new(rates: &[(&'static str, &'static str, &'static str)]) -> Self {
        Self {
            rates: rates.iter().map(|(id, sym, rate)| (*id, (*sym, *rate))).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PriceSource for FakeCoinCap {
    fn source_name(&self) -> &str {
        "FakeCoinCap"
    }

    async fn fetch_price(&self, currency_id: &str) -> Result<CurrencyQuote, FetchError> {
        self.calls.lock().push(currency_id.to_string());
        match self.rates.get(currency_id) {
            Some((symbol, rate_usd)) => Ok(quote(currency_id, symbol, rate_usd)),
            None => Err(FetchError::EmptyResponse),
        }
    }
}

/// Answers every id at once, except the first request for `slow_id`
struct SlowFirstCall {
    slow_id: &'static str,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl PriceSource for SlowFirstCall {
    fn source_name(&self) -> &str {
        "SlowFirstCall"
    }

    async fn fetch_price(&self, currency_id: &str) -> Result<CurrencyQuote, FetchError> {
        let first_for_id = {
            let mut calls = self.calls.lock();
            calls.push(currency_id.to_string());
            calls.iter().filter(|id| id.as_str() == currency_id).count() == 1
        };
        if currency_id == self.slow_id && first_for_id {
            tokio::time::sleep(self.delay).await;
        }
        Ok(quote(currency_id, "SYM", "1.5"))
    }
}

fn quote(id: &str, symbol: &str, rate_usd: &str) -> CurrencyQuote {
    CurrencyQuote {
        id: id.to_string(),
        symbol: symbol.to_string(),
        currency_symbol: None,
        rate_usd: rate_usd.to_string(),
        kind: "crypto".to_string(),
    }
}

async fn next_event(events: &mut broadcast::Receiver<DisplayEvent>) -> DisplayEvent {
    timeout(Duration::from_secs(60), events.recv())
        .await
        .expect("event should arrive")
        .unwrap()
}

fn config(mode: PollMode) -> TickerConfig {
    TickerConfig::new(
        vec!["bitcoin".to_string(), "mask".to_string()],
        Duration::from_secs(15),
    )
    .with_poll_mode(mode)
}

#[tokio::test]
async fn test_status_line_loading_then_first_quote() {
    let source = Arc::new(FakeCoinCap::new(&[("bitcoin", "BTC", "65000.5")]));
    let service = TickerService::with_source(config(PollMode::RoundRobin), source.clone());

    let mut events = service.subscribe();
    let mut status = StatusLine::new();
    assert_eq!(status.text(), "Loading...");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(service.run_until(async move {
        let _ = stop_rx.await;
    }));

    let event = timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("first tick should complete")
        .unwrap();
    status.handle(&event);
    assert_eq!(status.text(), "BTC: $65000.5000");

    stop_tx.send(()).unwrap();
    run.await.unwrap().unwrap();

    // Only the first tick ran: round-robin fetched bitcoin alone
    assert_eq!(*source.calls.lock(), vec!["bitcoin".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_status_line_rotates_in_default_batch_mode() {
    let source = Arc::new(FakeCoinCap::new(&[("bitcoin", "BTC", "65000.5")]));
    let config = TickerConfig::new(
        vec!["bitcoin".to_string(), "mask".to_string()],
        Duration::from_secs(15),
    );
    assert_eq!(config.poll_mode, PollMode::Batch);

    let service = TickerService::with_source(config, source.clone());
    let mut events = service.subscribe();
    let mut status = StatusLine::new();
    assert_eq!(status.text(), "Loading...");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(service.run_until(async move {
        let _ = stop_rx.await;
    }));

    // Tick 1 focuses bitcoin; the mask failure only reaches the list
    for _ in 0..2 {
        status.handle(&next_event(&mut events).await);
    }
    assert_eq!(status.text(), "BTC: $65000.5000");

    // Tick 2 focuses mask
    for _ in 0..2 {
        status.handle(&next_event(&mut events).await);
    }
    assert_eq!(status.text(), "mask: -");

    stop_tx.send(()).unwrap();
    run.await.unwrap().unwrap();

    assert_eq!(
        *source.calls.lock(),
        vec!["bitcoin", "mask", "bitcoin", "mask"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_fetch_does_not_hold_back_later_ticks() {
    let source = Arc::new(SlowFirstCall {
        slow_id: "bitcoin",
        delay: Duration::from_secs(40),
        calls: Mutex::new(Vec::new()),
    });
    let config = TickerConfig::new(
        vec![
            "bitcoin".to_string(),
            "ethereum".to_string(),
            "litecoin".to_string(),
        ],
        Duration::from_secs(15),
    )
    .with_poll_mode(PollMode::RoundRobin);

    let service = TickerService::with_source(config, source.clone());
    let cache = service.cache();
    let poller = service.poller();
    let mut events = service.subscribe();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(service.run_until(async move {
        let _ = stop_rx.await;
    }));

    // Tick 2 (t=15s) fetches ethereum while bitcoin from tick 1 is still in flight
    let first = next_event(&mut events).await;
    assert_eq!(first.id(), "ethereum");
    assert!(!cache.contains("bitcoin"));

    // Tick 3 (t=30s)
    let second = next_event(&mut events).await;
    assert_eq!(second.id(), "litecoin");

    // Tick 1's fetch lands at t=40s and is still applied
    let third = next_event(&mut events).await;
    assert_eq!(third.id(), "bitcoin");
    assert!(matches!(third, DisplayEvent::QuoteUpdated { .. }));
    assert!(cache.contains("bitcoin"));

    stop_tx.send(()).unwrap();
    run.await.unwrap().unwrap();

    let calls = source.calls.lock().clone();
    assert_eq!(calls[..3], ["bitcoin", "ethereum", "litecoin"]);
    assert_eq!(poller.stats().fetches_failed, 0);
    assert!(poller.stats().ticks >= 3);
}

#[tokio::test]
async fn test_batch_tick_feeds_list_view() {
    let source = Arc::new(FakeCoinCap::new(&[("bitcoin", "BTC", "65000.5")]));
    let service = TickerService::with_source(config(PollMode::Batch), source);
    let cache = service.cache();

    let list_task = service.spawn_sink(QuoteList::new(
        service.config().currencies.clone(),
        service.cache(),
    ));

    let mut events = service.subscribe();
    let shutdown = async move {
        for _ in 0..2 {
            if events.recv().await.is_err() {
                break;
            }
        }
    };

    timeout(Duration::from_secs(5), service.run_until(shutdown))
        .await
        .expect("service should stop after one tick")
        .unwrap();

    let list = timeout(Duration::from_secs(5), list_task)
        .await
        .expect("sink should finish once the poller is dropped")
        .unwrap();

    let rows = list.rows();
    assert_eq!(rows[0].name, "Bitcoin");
    assert_eq!(rows[0].state, RowState::Ready);
    assert_eq!(rows[0].price_text, "$ 65000.5000");
    assert_eq!(rows[1].name, "Mask");
    assert_eq!(rows[1].state, RowState::Failed);
    assert_eq!(rows[1].price_text, "Failed to fetch");

    assert!(cache.contains("bitcoin"));
    assert!(!cache.contains("mask"));
}

#[tokio::test]
async fn test_event_order_for_batch_tick() {
    let source = Arc::new(FakeCoinCap::new(&[("mask", "MASK", "2.98")]));
    let service = TickerService::with_source(config(PollMode::Batch), source);
    let poller = service.poller();
    let mut events = poller.subscribe();

    poller.poll_once().await;

    let first = events.try_recv().unwrap();
    let second = events.try_recv().unwrap();
    assert!(matches!(first, DisplayEvent::FetchFailed { ref id, .. } if id == "bitcoin"));
    assert!(matches!(second, DisplayEvent::QuoteUpdated { ref id, .. } if id == "mask"));
}

#[tokio::test]
#[ignore] // Requires network
async fn test_live_coincap_poll() {
    let service = TickerService::new(config(PollMode::Batch)).unwrap();
    let poller = service.poller();

    poller.poll_once().await;

    let cache = service.cache();
    match cache.get("bitcoin") {
        Some(entry) => println!("BTC: {} at {}", entry.quote.rate_usd, entry.observed_at),
        None => println!("Warning: Could not fetch BTC from CoinCap"),
    }
}
