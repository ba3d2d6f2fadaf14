use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "Buy",
            TradeSide::Sell => "Sell",
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// One row of the append-only trade ledger. Never updated or deleted once
// written; holdings and cost basis are recomputed from these rows on read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub quantity: BigDecimal,
    pub price_at_transaction: BigDecimal,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// A ledger entry staged for commit; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: String,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: BigDecimal,
    pub price_at_transaction: BigDecimal,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl NewTransaction {
    pub fn new(
        user_id: &str,
        symbol: &str,
        side: TradeSide,
        quantity: BigDecimal,
        price_at_transaction: BigDecimal,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            symbol: symbol.to_string(),
            side,
            quantity,
            price_at_transaction,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Wire shape of a committed trade: the ledger row plus the derived total.
/// For sells the `totalCost` field carries the total revenue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub id: i64,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub quantity: BigDecimal,
    pub price_at_transaction: BigDecimal,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub total_cost: BigDecimal,
}

impl TransactionReceipt {
    pub fn from_committed(tx: Transaction) -> Self {
        let total_cost = &tx.quantity * &tx.price_at_transaction;
        Self {
            id: tx.id,
            symbol: tx.symbol,
            side: tx.side,
            quantity: tx.quantity,
            price_at_transaction: tx.price_at_transaction,
            timestamp: tx.timestamp,
            total_cost,
        }
    }
}
