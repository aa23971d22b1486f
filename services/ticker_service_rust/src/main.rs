use anyhow::Result;
use dotenv::dotenv;
use ticker_service_rust::display::TerminalSurface;
use ticker_service_rust::{TickerConfig, TickerService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting ticker_service_rust...");

    let config = TickerConfig::from_env()?;
    let service = TickerService::new(config)?;

    let currencies = service.config().currencies.clone();
    service.spawn_sink(TerminalSurface::stdout(currencies, service.cache()));

    service.run().await
}
