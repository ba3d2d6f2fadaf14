use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Virtual cash granted to every newly registered user, in quote currency.
pub const STARTING_BALANCE: i64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub balance: BigDecimal,
    /// Incremented by the store on every committed trade.
    pub version: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub user_id: String,
}

impl User {
    pub fn new(id: String) -> Self {
        Self {
            id,
            balance: BigDecimal::from(STARTING_BALANCE),
            version: 0,
            created_at: chrono::Utc::now(),
        }
    }
}
