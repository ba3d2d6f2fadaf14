//! Ledger accounting property tests
//!
//! Checks the arithmetic rules the portfolio engine is built on: net
//! position derivation (buys minus sells) and quantity-weighted cost basis,
//! on plain decimal inputs.

use bigdecimal::{BigDecimal, Zero};

#[derive(Clone, Copy, PartialEq)]
enum Side {
    Buy,
    Sell,
}

struct Trade {
    side: Side,
    quantity: i64,
    price: i64,
}

fn trade(side: Side, quantity: i64, price: i64) -> Trade {
    Trade {
        side,
        quantity,
        price,
    }
}

/// Net quantity: total bought minus total sold.
fn net_quantity(trades: &[Trade]) -> BigDecimal {
    trades.iter().fold(BigDecimal::zero(), |acc, t| match t.side {
        Side::Buy => acc + BigDecimal::from(t.quantity),
        Side::Sell => acc - BigDecimal::from(t.quantity),
    })
}

/// Weighted average buy price over the buy side only; zero when nothing
/// was bought.
fn average_buy_price(trades: &[Trade]) -> BigDecimal {
    let mut total_quantity = BigDecimal::zero();
    let mut total_cost = BigDecimal::zero();
    for t in trades.iter().filter(|t| t.side == Side::Buy) {
        total_quantity = total_quantity + BigDecimal::from(t.quantity);
        total_cost = total_cost + BigDecimal::from(t.quantity) * BigDecimal::from(t.price);
    }
    if total_quantity <= BigDecimal::zero() {
        return BigDecimal::zero();
    }
    total_cost / total_quantity
}

#[test]
fn net_quantity_is_buys_minus_sells() {
    let trades = vec![
        trade(Side::Buy, 1, 100),
        trade(Side::Buy, 2, 200),
        trade(Side::Sell, 1, 200),
    ];
    assert_eq!(net_quantity(&trades), BigDecimal::from(2));
}

#[test]
fn fully_exited_position_nets_to_zero() {
    let trades = vec![trade(Side::Buy, 3, 50), trade(Side::Sell, 3, 80)];
    assert_eq!(net_quantity(&trades), BigDecimal::zero());
}

#[test]
fn average_buy_price_of_empty_history_is_zero() {
    assert_eq!(average_buy_price(&[]), BigDecimal::zero());
}

#[test]
fn average_buy_price_ignores_sells() {
    let with_sell = vec![
        trade(Side::Buy, 1, 100),
        trade(Side::Buy, 2, 200),
        trade(Side::Sell, 1, 500),
    ];
    let without_sell = vec![trade(Side::Buy, 1, 100), trade(Side::Buy, 2, 200)];
    assert_eq!(average_buy_price(&with_sell), average_buy_price(&without_sell));
}

#[test]
fn average_buy_price_is_quantity_weighted() {
    // 1 @ 100 + 2 @ 200 = 500 spent over 3 units.
    let trades = vec![trade(Side::Buy, 1, 100), trade(Side::Buy, 2, 200)];
    let expected = BigDecimal::from(500) / BigDecimal::from(3);
    assert_eq!(average_buy_price(&trades), expected);
}

#[test]
fn valuation_at_live_price_uses_net_quantity() {
    let trades = vec![
        trade(Side::Buy, 1, 100),
        trade(Side::Buy, 2, 200),
        trade(Side::Sell, 1, 200),
    ];
    let live_price = BigDecimal::from(250);
    let value = net_quantity(&trades) * live_price;
    assert_eq!(value, BigDecimal::from(500));
}

#[test]
fn buy_then_sell_round_trip_preserves_cash_plus_value() {
    // Start with 1000 cash, buy 5 @ 100, then sell 5 @ 100: cash is back
    // to 1000 and the position nets to zero.
    let start = BigDecimal::from(1_000);
    let after_buy = &start - BigDecimal::from(5) * BigDecimal::from(100);
    assert_eq!(after_buy, BigDecimal::from(500));
    let after_sell = &after_buy + BigDecimal::from(5) * BigDecimal::from(100);
    assert_eq!(after_sell, start);

    let trades = vec![trade(Side::Buy, 5, 100), trade(Side::Sell, 5, 100)];
    assert_eq!(net_quantity(&trades), BigDecimal::zero());
}
