//! Thin HTTP boundary over the library clients. Request validation and
//! status-code mapping only; all decisions live in the library modules.

pub mod price;
pub mod wallet;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::exchange::ExchangeClient;
use crate::market::MarketClient;
use crate::unit::UnitClient;

/// Shared handles for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<MarketClient>,
    pub unit: Arc<UnitClient>,
    pub exchange: Arc<ExchangeClient>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/price/:market_id", get(price::read_price))
        .route("/wallet/generate", post(wallet::generate_wallet))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds() {
        let state = AppState {
            market: Arc::new(MarketClient::new("http://localhost:1")),
            unit: Arc::new(UnitClient::new("http://localhost:1")),
            exchange: Arc::new(ExchangeClient::new("http://localhost:1")),
        };
        let _router = router(state);
    }
}
