use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::models::TransactionReceipt;

// A derived position: net quantity plus live valuation. Never persisted,
// always recomputed from the ledger.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub quantity: BigDecimal,
    pub current_price: BigDecimal,
    pub total_value: BigDecimal,
    pub average_buy_price: BigDecimal,
    pub change_percent: BigDecimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioView {
    pub balance: BigDecimal,
    /// Sum of holding values; cash balance not included.
    pub portfolio_value: BigDecimal,
    pub holdings: Vec<Holding>,
    pub transactions: Vec<TransactionReceipt>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueHolding {
    pub symbol: String,
    pub quantity: BigDecimal,
    pub current_price: BigDecimal,
    pub total_value: BigDecimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueView {
    pub balance: BigDecimal,
    /// Cash balance plus the sum of holding values.
    pub portfolio_value: BigDecimal,
    pub holdings: Vec<ValueHolding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPrice {
    pub symbol: String,
    pub price: BigDecimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub symbol: String,
    pub quantity: BigDecimal,
}
