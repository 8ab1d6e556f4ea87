use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use unit_guard::api::{self, AppState};
use unit_guard::exchange::ExchangeClient;
use unit_guard::market::MarketClient;
use unit_guard::unit::UnitClient;
use unit_guard::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    tracing::info!(version = unit_guard::VERSION, "starting unit-guard");

    let state = AppState {
        market: Arc::new(MarketClient::new(settings.hyperliquid_api_url.clone())),
        unit: Arc::new(UnitClient::new(settings.hyperunit_api_url.clone())),
        exchange: Arc::new(ExchangeClient::new(settings.hyperliquid_api_url.clone())),
    };

    let app = api::router(state);
    let addr: std::net::SocketAddr = settings.bind_addr.parse()?;
    tracing::info!(%addr, "listening");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
