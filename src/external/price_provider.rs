use async_trait::async_trait;
use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::models::AssetPrice;

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Live market-price lookup. The accounting engine treats any error (or a
/// non-positive price) as "price unavailable"; it never inspects the cause.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Current unit price of one asset in quote currency.
    async fn fetch_price(&self, symbol: &str) -> Result<BigDecimal, PriceProviderError>;

    /// Bulk listing of all quotable assets.
    async fn fetch_all_prices(&self) -> Result<Vec<AssetPrice>, PriceProviderError>;
}
