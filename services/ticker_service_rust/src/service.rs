//! TickerService: timer loop driving the poller
//!
//! Main orchestrator that coordinates:
//! - The recurring poll timer
//! - Spawning each tick's fetches so slow requests never delay the timer
//! - Display sink tasks subscribed to the event channel
//! - Periodic statistics logging and graceful shutdown

use crate::config::TickerConfig;
use crate::display::{run_sink, DisplayEvent, DisplaySink};
use crate::poller::Poller;
use anyhow::{Context, Result};
use coinbar_rust_core::{CoinCapClient, PriceSource, QuoteCache};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

pub struct TickerService {
    config: TickerConfig,
    poller: Arc<Poller>,
}

impl TickerService {
    /// Build the service against the live CoinCap API
    pub fn new(config: TickerConfig) -> Result<Self> {
        config.validate()?;

        let client = CoinCapClient::new(config.fetch_timeout)
            .context("Failed to create HTTP client")?
            .with_base_url(config.base_url.clone());

        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Build the service over any price source
    pub fn with_source(config: TickerConfig, source: Arc<dyn PriceSource>) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        let poller = Poller::new(
            source,
            config.currencies.clone(),
            config.poll_mode,
            QuoteCache::new(),
            events,
        );

        Self {
            config,
            poller: Arc::new(poller),
        }
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    pub fn poller(&self) -> Arc<Poller> {
        self.poller.clone()
    }

    pub fn cache(&self) -> QuoteCache {
        self.poller.cache().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DisplayEvent> {
        self.poller.subscribe()
    }

    /// Subscribe `sink` to display events on its own task
    pub fn spawn_sink<S>(&self, sink: S) -> JoinHandle<S>
    where
        S: DisplaySink + 'static,
    {
        tokio::spawn(run_sink(self.subscribe(), sink))
    }

    /// Run until Ctrl-C
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the poll loop until `shutdown` resolves.
    ///
    /// The first tick fires immediately. Each tick's targets are chosen on the
    /// timer task and the fetches are spawned, so ticks may overlap.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            "TickerService running (interval: {:?}, mode: {}, currencies: {})",
            self.config.poll_interval,
            self.config.poll_mode,
            self.config.currencies.len()
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping poll loop");
                    break;
                }
                _ = ticker.tick() => {
                    let targets = self.poller.next_targets();
                    debug!("Tick: fetching {:?} (focus: {:?})", targets.ids, targets.focus);

                    let poller = self.poller.clone();
                    tokio::spawn(async move {
                        poller.fetch_targets(targets).await;
                    });

                    self.log_stats();
                }
            }
        }

        let snapshot = self.poller.stats();
        info!(
            "TickerService stopped: ticks={}, ok={}, failed={}, cached={}",
            snapshot.ticks,
            snapshot.fetches_ok,
            snapshot.fetches_failed,
            self.poller.cache().len()
        );
        Ok(())
    }

    fn log_stats(&self) {
        let every = self.config.stats_log_every;
        let snapshot = self.poller.stats();
        if every > 0 && snapshot.ticks % every == 0 {
            info!(
                "Ticker stats: ticks={}, ok={}, failed={}, cached={}",
                snapshot.ticks,
                snapshot.fetches_ok,
                snapshot.fetches_failed,
                self.poller.cache().len()
            );
        }
    }
}
