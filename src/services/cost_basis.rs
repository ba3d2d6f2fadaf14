use bigdecimal::{BigDecimal, Zero};

use crate::models::Transaction;

/// Quantity-weighted average price paid across a set of buy transactions.
///
/// Returns exactly zero for an empty or zero-total-quantity set instead of
/// attempting a division; an exited or never-entered position simply has no
/// cost basis.
pub fn average_buy_price(buys: &[&Transaction]) -> BigDecimal {
    let mut total_quantity = BigDecimal::zero();
    let mut total_cost = BigDecimal::zero();
    for t in buys {
        total_quantity = total_quantity + &t.quantity;
        total_cost = total_cost + &t.quantity * &t.price_at_transaction;
    }

    if total_quantity <= BigDecimal::zero() {
        return BigDecimal::zero();
    }
    total_cost / total_quantity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeSide;

    fn buy(quantity: i64, price: i64) -> Transaction {
        Transaction {
            id: 0,
            user_id: "u1".into(),
            symbol: "BTC".into(),
            side: TradeSide::Buy,
            quantity: BigDecimal::from(quantity),
            price_at_transaction: BigDecimal::from(price),
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn empty_set_yields_zero() {
        assert_eq!(average_buy_price(&[]), BigDecimal::zero());
    }

    #[test]
    fn zero_total_quantity_yields_zero() {
        let degenerate = buy(0, 100);
        assert_eq!(average_buy_price(&[&degenerate]), BigDecimal::zero());
    }

    #[test]
    fn weighted_average_over_two_lots() {
        // 1 @ 100 and 2 @ 200: 500 spent over 3 units.
        let a = buy(1, 100);
        let b = buy(2, 200);
        let expected = BigDecimal::from(500) / BigDecimal::from(3);
        assert_eq!(average_buy_price(&[&a, &b]), expected);
    }

    #[test]
    fn single_lot_is_its_own_basis() {
        let a = buy(4, 250);
        assert_eq!(average_buy_price(&[&a]), BigDecimal::from(250));
    }
}
