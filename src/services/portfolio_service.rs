use bigdecimal::{BigDecimal, Zero};
use tracing::{info, warn};

use crate::db::{LedgerStore, StoreError};
use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::{
    AssetPrice, Holding, NewTransaction, PortfolioView, TradeSide, TransactionReceipt,
    ValueHolding, ValueView,
};
use crate::services::holdings;

/// Re-reads and re-checks a trade this many times when the balance moves
/// under it before giving up with a conflict.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Normalizes every oracle failure mode (error, missing, non-positive) into
/// the single `PriceUnavailable` outcome the caller sees.
async fn fetch_valid_price(
    prices: &dyn PriceProvider,
    symbol: &str,
) -> Result<BigDecimal, AppError> {
    match prices.fetch_price(symbol).await {
        Ok(price) if price > BigDecimal::zero() => Ok(price),
        Ok(price) => {
            warn!("Non-positive price {} for symbol {}", price, symbol);
            Err(AppError::PriceUnavailable)
        }
        Err(e) => {
            warn!("Failed to fetch price for symbol {}: {}", symbol, e);
            Err(AppError::PriceUnavailable)
        }
    }
}

fn validate_trade(symbol: &str, quantity: &BigDecimal) -> Result<String, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::Validation("Symbol cannot be empty".into()));
    }
    if quantity <= &BigDecimal::zero() {
        return Err(AppError::Validation("Quantity must be greater than zero".into()));
    }
    Ok(symbol)
}

fn percent_change(current: &BigDecimal, average: &BigDecimal) -> BigDecimal {
    (current - average) / average * BigDecimal::from(100)
}

/// Full portfolio: balance, enriched holdings, holdings-only total value and
/// the complete trade history, newest first.
pub async fn get_portfolio(
    store: &dyn LedgerStore,
    prices: &dyn PriceProvider,
    user_id: &str,
) -> Result<PortfolioView, AppError> {
    let user = store
        .get_user(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    let transactions = store.transactions_for_user(user_id).await?;

    let mut portfolio_value = BigDecimal::zero();
    let mut enriched = Vec::new();
    for holding in holdings::project(&transactions) {
        // A position whose live price cannot be fetched is left out of the
        // view; it still exists in the ledger and reappears once the oracle
        // recovers.
        let current_price = match fetch_valid_price(prices, &holding.symbol).await {
            Ok(price) => price,
            Err(_) => continue,
        };
        let total_value = &holding.quantity * &current_price;
        portfolio_value = portfolio_value + &total_value;
        enriched.push(Holding {
            change_percent: percent_change(&current_price, &holding.average_buy_price),
            symbol: holding.symbol,
            quantity: holding.quantity,
            current_price,
            total_value,
            average_buy_price: holding.average_buy_price,
        });
    }

    Ok(PortfolioView {
        balance: user.balance,
        portfolio_value,
        holdings: enriched,
        transactions: transactions
            .into_iter()
            .map(TransactionReceipt::from_committed)
            .collect(),
    })
}

/// Valuation view: slim holdings and a total that includes the cash balance.
pub async fn get_portfolio_value(
    store: &dyn LedgerStore,
    prices: &dyn PriceProvider,
    user_id: &str,
) -> Result<ValueView, AppError> {
    let user = store
        .get_user(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    let transactions = store.transactions_for_user(user_id).await?;

    let mut portfolio_value = user.balance.clone();
    let mut slim = Vec::new();
    for holding in holdings::project(&transactions) {
        let current_price = match fetch_valid_price(prices, &holding.symbol).await {
            Ok(price) => price,
            Err(_) => continue,
        };
        let total_value = &holding.quantity * &current_price;
        portfolio_value = portfolio_value + &total_value;
        slim.push(ValueHolding {
            symbol: holding.symbol,
            quantity: holding.quantity,
            current_price,
            total_value,
        });
    }

    Ok(ValueView {
        balance: user.balance,
        portfolio_value,
        holdings: slim,
    })
}

/// Buys `quantity` of `symbol` at the live price: debits the balance and
/// appends a Buy row as one atomic unit.
pub async fn execute_buy(
    store: &dyn LedgerStore,
    prices: &dyn PriceProvider,
    user_id: &str,
    symbol: &str,
    quantity: BigDecimal,
) -> Result<TransactionReceipt, AppError> {
    let symbol = validate_trade(symbol, &quantity)?;

    let mut user = store
        .get_user(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    let price = fetch_valid_price(prices, &symbol).await?;
    let total_cost = &quantity * &price;

    let mut attempt = 0;
    loop {
        attempt += 1;

        if user.balance < total_cost {
            warn!(
                "User {} has insufficient balance: {} < {}",
                user_id, user.balance, total_cost
            );
            return Err(AppError::InsufficientBalance);
        }

        let new_balance = &user.balance - &total_cost;
        let entry =
            NewTransaction::new(user_id, &symbol, TradeSide::Buy, quantity.clone(), price.clone());

        match store
            .commit_trade(user_id, user.version, &new_balance, entry)
            .await
        {
            Ok(committed) => {
                info!(
                    "User {} bought {} {} at {}. New balance: {}",
                    user_id, quantity, symbol, price, new_balance
                );
                return Ok(TransactionReceipt::from_committed(committed));
            }
            Err(StoreError::BalanceConflict) if attempt < MAX_COMMIT_ATTEMPTS => {
                warn!("Balance moved under user {}, retrying buy", user_id);
                user = store
                    .get_user(user_id)
                    .await?
                    .ok_or(AppError::UserNotFound)?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Sells `quantity` of `symbol` at the live price: verifies holdings against
/// a fresh ledger read, credits the balance and appends a Sell row atomically.
pub async fn execute_sell(
    store: &dyn LedgerStore,
    prices: &dyn PriceProvider,
    user_id: &str,
    symbol: &str,
    quantity: BigDecimal,
) -> Result<TransactionReceipt, AppError> {
    let symbol = validate_trade(symbol, &quantity)?;

    let mut user = store
        .get_user(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    let price = fetch_valid_price(prices, &symbol).await?;
    let total_revenue = &quantity * &price;

    let mut attempt = 0;
    loop {
        attempt += 1;

        let bought = store.quantity_sum(user_id, &symbol, TradeSide::Buy).await?;
        let sold = store.quantity_sum(user_id, &symbol, TradeSide::Sell).await?;
        let available = bought - sold;
        if available < quantity {
            warn!(
                "User {} tried to sell {} {} but only holds {}",
                user_id, quantity, symbol, available
            );
            return Err(AppError::InsufficientHoldings);
        }

        let new_balance = &user.balance + &total_revenue;
        let entry = NewTransaction::new(
            user_id,
            &symbol,
            TradeSide::Sell,
            quantity.clone(),
            price.clone(),
        );

        match store
            .commit_trade(user_id, user.version, &new_balance, entry)
            .await
        {
            Ok(committed) => {
                info!(
                    "User {} sold {} {} at {}. New balance: {}",
                    user_id, quantity, symbol, price, new_balance
                );
                return Ok(TransactionReceipt::from_committed(committed));
            }
            Err(StoreError::BalanceConflict) if attempt < MAX_COMMIT_ATTEMPTS => {
                warn!("Balance moved under user {}, retrying sell", user_id);
                user = store
                    .get_user(user_id)
                    .await?
                    .ok_or(AppError::UserNotFound)?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Bulk asset listing, optionally narrowed to one symbol (exact,
/// case-insensitive). Best-effort: a failing bulk fetch degrades to an empty
/// list instead of failing the caller, unlike the per-symbol path used by
/// buy/sell.
pub async fn list_asset_prices(
    prices: &dyn PriceProvider,
    filter: Option<&str>,
) -> Vec<AssetPrice> {
    let all = match prices.fetch_all_prices().await {
        Ok(prices) => prices,
        Err(e) => {
            warn!("Bulk price fetch failed, returning empty listing: {}", e);
            return Vec::new();
        }
    };

    match filter {
        Some(symbol) => all
            .into_iter()
            .filter(|a| a.symbol.eq_ignore_ascii_case(symbol))
            .collect(),
        None => all,
    }
}
