use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::models::AssetPrice;
use crate::services::portfolio_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/prices", get(list_prices))
}

#[derive(Debug, Deserialize)]
pub struct AssetQuery {
    symbol: Option<String>,
}

/// Best-effort listing: an unreachable oracle yields an empty array, never
/// an error response.
pub async fn list_prices(
    State(state): State<AppState>,
    Query(query): Query<AssetQuery>,
) -> Json<Vec<AssetPrice>> {
    info!(
        "GET /assets/prices - Listing asset prices (filter: {:?})",
        query.symbol
    );
    let prices = portfolio_service::list_asset_prices(
        state.price_provider.as_ref(),
        query.symbol.as_deref(),
    )
    .await;
    Json(prices)
}
