use std::collections::HashMap;

use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use parking_lot::Mutex;

use crate::db::ledger::{LedgerStore, StoreError};
use crate::models::{NewTransaction, TradeSide, Transaction, User};

/// In-memory ledger store. Backs the test suite and serves as a dev-mode
/// fallback when no DATABASE_URL is configured.
#[derive(Default)]
pub struct MemoryLedgerStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    transactions: Vec<Transaction>,
    next_id: i64,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().users.get(user_id).cloned())
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut inner = self.inner.lock();
        if inner.users.contains_key(&user.id) {
            return Err(StoreError::DuplicateUser);
        }
        inner.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn transactions_for_user(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.inner.lock();
        let mut rows: Vec<Transaction> = inner
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        // Newest first; id breaks timestamp ties deterministically.
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn quantity_sum(
        &self,
        user_id: &str,
        symbol: &str,
        side: TradeSide,
    ) -> Result<BigDecimal, StoreError> {
        let inner = self.inner.lock();
        let sum = inner
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id && t.symbol == symbol && t.side == side)
            .fold(BigDecimal::zero(), |acc, t| acc + &t.quantity);
        Ok(sum)
    }

    async fn commit_trade(
        &self,
        user_id: &str,
        expected_version: i64,
        new_balance: &BigDecimal,
        entry: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let mut inner = self.inner.lock();

        let current_version = inner
            .users
            .get(user_id)
            .map(|u| u.version)
            .ok_or(StoreError::BalanceConflict)?;
        if current_version != expected_version {
            return Err(StoreError::BalanceConflict);
        }

        inner.next_id += 1;
        let committed = Transaction {
            id: inner.next_id,
            user_id: entry.user_id,
            symbol: entry.symbol,
            side: entry.side,
            quantity: entry.quantity,
            price_at_transaction: entry.price_at_transaction,
            timestamp: entry.timestamp,
        };

        if let Some(user) = inner.users.get_mut(user_id) {
            user.balance = new_balance.clone();
            user.version += 1;
        }
        inner.transactions.push(committed.clone());
        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user_id: &str, side: TradeSide, quantity: i64, price: i64) -> NewTransaction {
        NewTransaction::new(
            user_id,
            "BTC",
            side,
            BigDecimal::from(quantity),
            BigDecimal::from(price),
        )
    }

    #[tokio::test]
    async fn commit_trade_assigns_monotonic_ids_and_bumps_version() {
        let store = MemoryLedgerStore::new();
        store.create_user(User::new("u1".into())).await.unwrap();

        let first = store
            .commit_trade(
                "u1",
                0,
                &BigDecimal::from(9_900),
                entry("u1", TradeSide::Buy, 1, 100),
            )
            .await
            .unwrap();
        let second = store
            .commit_trade(
                "u1",
                1,
                &BigDecimal::from(9_800),
                entry("u1", TradeSide::Buy, 1, 100),
            )
            .await
            .unwrap();

        assert!(second.id > first.id);
        let user = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(user.version, 2);
    }

    #[tokio::test]
    async fn commit_trade_rejects_stale_version() {
        let store = MemoryLedgerStore::new();
        store.create_user(User::new("u1".into())).await.unwrap();

        store
            .commit_trade(
                "u1",
                0,
                &BigDecimal::from(9_900),
                entry("u1", TradeSide::Buy, 1, 100),
            )
            .await
            .unwrap();

        // Staged against the user as it looked before the first commit.
        let err = store
            .commit_trade(
                "u1",
                0,
                &BigDecimal::from(9_800),
                entry("u1", TradeSide::Buy, 1, 100),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::BalanceConflict));
        // Nothing from the stale commit was applied.
        let user = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(user.balance, BigDecimal::from(9_900));
        assert_eq!(store.transactions_for_user("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stale_commit_is_rejected_even_when_balance_matches() {
        let store = MemoryLedgerStore::new();
        store.create_user(User::new("u1".into())).await.unwrap();

        // Two trades that net the balance back to its starting value.
        store
            .commit_trade(
                "u1",
                0,
                &BigDecimal::from(10_100),
                entry("u1", TradeSide::Sell, 1, 100),
            )
            .await
            .unwrap();
        store
            .commit_trade(
                "u1",
                1,
                &BigDecimal::from(10_000),
                entry("u1", TradeSide::Buy, 1, 100),
            )
            .await
            .unwrap();

        // A commit staged before that pair sees the same balance but must
        // still be rejected.
        let err = store
            .commit_trade(
                "u1",
                0,
                &BigDecimal::from(9_900),
                entry("u1", TradeSide::Buy, 1, 100),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::BalanceConflict));
        assert_eq!(store.transactions_for_user("u1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_user_is_rejected() {
        let store = MemoryLedgerStore::new();
        store.create_user(User::new("u1".into())).await.unwrap();
        let err = store.create_user(User::new("u1".into())).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUser));
    }

    #[tokio::test]
    async fn quantity_sum_is_per_side() {
        let store = MemoryLedgerStore::new();
        store.create_user(User::new("u1".into())).await.unwrap();
        store
            .commit_trade(
                "u1",
                0,
                &BigDecimal::from(9_700),
                entry("u1", TradeSide::Buy, 3, 100),
            )
            .await
            .unwrap();
        store
            .commit_trade(
                "u1",
                1,
                &BigDecimal::from(9_800),
                entry("u1", TradeSide::Sell, 1, 100),
            )
            .await
            .unwrap();

        let bought = store
            .quantity_sum("u1", "BTC", TradeSide::Buy)
            .await
            .unwrap();
        let sold = store
            .quantity_sum("u1", "BTC", TradeSide::Sell)
            .await
            .unwrap();
        assert_eq!(bought, BigDecimal::from(3));
        assert_eq!(sold, BigDecimal::from(1));
    }
}
