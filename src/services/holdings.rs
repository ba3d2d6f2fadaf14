use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, Zero};

use crate::models::{TradeSide, Transaction};
use crate::services::cost_basis;

/// A projected position before live-price enrichment.
#[derive(Debug, Clone)]
pub struct RawHolding {
    pub symbol: String,
    pub quantity: BigDecimal,
    pub average_buy_price: BigDecimal,
}

/// Derives net positions from a user's full transaction history.
///
/// Net quantity per symbol is total bought minus total sold; symbols at or
/// below zero are dropped from the view (fully exited, not an error). The
/// average buy price is computed over the buy side only, so selling never
/// moves the cost basis. Output is ordered by symbol.
pub fn project(transactions: &[Transaction]) -> Vec<RawHolding> {
    let mut buys: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.side == TradeSide::Buy) {
        buys.entry(t.symbol.as_str()).or_default().push(t);
    }

    let mut holdings = Vec::new();
    for (symbol, lots) in buys {
        let bought = lots
            .iter()
            .fold(BigDecimal::zero(), |acc, t| acc + &t.quantity);
        let sold = transactions
            .iter()
            .filter(|t| t.side == TradeSide::Sell && t.symbol == symbol)
            .fold(BigDecimal::zero(), |acc, t| acc + &t.quantity);

        let quantity = bought - sold;
        if quantity > BigDecimal::zero() {
            holdings.push(RawHolding {
                symbol: symbol.to_string(),
                quantity,
                average_buy_price: cost_basis::average_buy_price(&lots),
            });
        }
    }
    holdings
}
