use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{PortfolioView, TradeRequest, TransactionReceipt, ValueView};
use crate::services::portfolio_service;
use crate::state::AppState;

// Identity arrives as a resolved path parameter; authenticating it is the
// caller's job, not this layer's.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id", get(get_portfolio))
        .route("/:user_id/value", get(get_portfolio_value))
        .route("/:user_id/buy", post(buy_asset))
        .route("/:user_id/sell", post(sell_asset))
}

#[axum::debug_handler]
pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PortfolioView>, AppError> {
    info!("GET /portfolio/{} - Fetching portfolio", user_id);
    let view = portfolio_service::get_portfolio(
        state.store.as_ref(),
        state.price_provider.as_ref(),
        &user_id,
    )
    .await
    .map_err(|e| {
        error!("Failed to fetch portfolio for {}: {}", user_id, e);
        e
    })?;
    Ok(Json(view))
}

pub async fn get_portfolio_value(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ValueView>, AppError> {
    info!("GET /portfolio/{}/value - Fetching portfolio value", user_id);
    let view = portfolio_service::get_portfolio_value(
        state.store.as_ref(),
        state.price_provider.as_ref(),
        &user_id,
    )
    .await
    .map_err(|e| {
        error!("Failed to fetch portfolio value for {}: {}", user_id, e);
        e
    })?;
    Ok(Json(view))
}

pub async fn buy_asset(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(data): Json<TradeRequest>,
) -> Result<Json<TransactionReceipt>, AppError> {
    info!(
        "POST /portfolio/{}/buy - Buying {} {}",
        user_id, data.quantity, data.symbol
    );
    let receipt = portfolio_service::execute_buy(
        state.store.as_ref(),
        state.price_provider.as_ref(),
        &user_id,
        &data.symbol,
        data.quantity,
    )
    .await
    .map_err(|e| {
        error!("Buy failed for {}: {}", user_id, e);
        e
    })?;
    Ok(Json(receipt))
}

pub async fn sell_asset(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(data): Json<TradeRequest>,
) -> Result<Json<TransactionReceipt>, AppError> {
    info!(
        "POST /portfolio/{}/sell - Selling {} {}",
        user_id, data.quantity, data.symbol
    );
    let receipt = portfolio_service::execute_sell(
        state.store.as_ref(),
        state.price_provider.as_ref(),
        &user_id,
        &data.symbol,
        data.quantity,
    )
    .await
    .map_err(|e| {
        error!("Sell failed for {}: {}", user_id, e);
        e
    })?;
    Ok(Json(receipt))
}
