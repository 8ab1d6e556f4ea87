use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::error::Error;

#[derive(Serialize)]
struct PriceResponse {
    market_id: u32,
    symbol: String,
    price: f64,
}

/// Price lookup by market index. Unknown ids map to 404, upstream failures
/// to 502; a non-numeric or negative id is rejected at extraction with 400.
pub async fn read_price(
    State(state): State<AppState>,
    Path(market_id): Path<u32>,
) -> impl IntoResponse {
    match state.market.price_for(market_id).await {
        Ok((symbol, price)) => (
            StatusCode::OK,
            Json(PriceResponse {
                market_id,
                symbol,
                price,
            }),
        )
            .into_response(),
        Err(Error::Market(msg)) => (StatusCode::NOT_FOUND, msg).into_response(),
        Err(e) => {
            tracing::warn!(market_id, error = %e, "price lookup failed upstream");
            (StatusCode::BAD_GATEWAY, format!("upstream error: {}", e)).into_response()
        }
    }
}
