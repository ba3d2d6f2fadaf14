use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{CreateUser, User};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_user))
}

/// Provisions a user with the fixed starting balance. Credentials and token
/// issuance live in the external auth service; this only creates the
/// balance-bearing record the accounting engine works against.
pub async fn create_user(
    State(state): State<AppState>,
    Json(data): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    info!("POST /users - Creating user {}", data.user_id);
    if data.user_id.trim().is_empty() {
        return Err(AppError::Validation("User id cannot be empty".into()));
    }

    let user = state
        .store
        .create_user(User::new(data.user_id.trim().to_string()))
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            AppError::from(e)
        })?;
    Ok((StatusCode::CREATED, Json(user)))
}
