mod app;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::db::{LedgerStore, MemoryLedgerStore, PgLedgerStore};
use crate::external::binance::BinanceProvider;
use crate::external::price_provider::PriceProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())?;

    let store: Arc<dyn LedgerStore> = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("💾 Using Postgres ledger store");
            Arc::new(PgLedgerStore::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using volatile in-memory ledger store");
            Arc::new(MemoryLedgerStore::new())
        }
    };

    let price_provider: Arc<dyn PriceProvider> = Arc::new(BinanceProvider::from_env());
    tracing::info!("📊 Using price provider: Binance");

    let state = AppState {
        store,
        price_provider,
    };
    let app = app::create_app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Cryptofolio backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
