use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{assets, health, portfolio, users};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/users", users::router())
        .nest("/api/portfolio", portfolio::router())
        .nest("/api/assets", assets::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
