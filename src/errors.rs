use axum::response::IntoResponse;
use http::StatusCode;
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("User not found")]
    UserNotFound,
    #[error("Failed to fetch a usable price for the asset")]
    PriceUnavailable,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Not enough holdings to sell")]
    InsufficientHoldings,
    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found").into_response(),
            AppError::PriceUnavailable => {
                (StatusCode::BAD_GATEWAY, "Failed to fetch price for the asset").into_response()
            }
            AppError::InsufficientBalance => {
                (StatusCode::BAD_REQUEST, "Insufficient balance.").into_response()
            }
            AppError::InsufficientHoldings => {
                (StatusCode::BAD_REQUEST, "Not enough holdings to sell.").into_response()
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Store(StoreError::DuplicateUser) => {
                (StatusCode::CONFLICT, "User already exists").into_response()
            }
            AppError::Store(StoreError::BalanceConflict) => {
                (StatusCode::CONFLICT, "Balance changed concurrently, please retry").into_response()
            }
            // Persistence failures stay opaque to the client.
            AppError::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
