use async_trait::async_trait;
use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::models::{NewTransaction, TradeSide, Transaction, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("balance changed concurrently")]
    BalanceConflict,

    #[error("user already exists")]
    DuplicateUser,
}

/// Persistence contract for users and the append-only trade ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    async fn create_user(&self, user: User) -> Result<User, StoreError>;

    /// All ledger rows for a user, newest first.
    async fn transactions_for_user(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError>;

    /// Total quantity traded on one side of the ledger for a user and symbol.
    async fn quantity_sum(
        &self,
        user_id: &str,
        symbol: &str,
        side: TradeSide,
    ) -> Result<BigDecimal, StoreError>;

    /// Atomically set the user's balance and append a ledger row.
    ///
    /// The write is conditional on the user's `version`, which every commit
    /// increments: a trade staged against a since-changed user fails with
    /// [`StoreError::BalanceConflict`] even when interleaved trades netted
    /// the balance back to its staged value, so checks made against the
    /// stale read can never be committed. On conflict nothing is written.
    async fn commit_trade(
        &self,
        user_id: &str,
        expected_version: i64,
        new_balance: &BigDecimal,
        entry: NewTransaction,
    ) -> Result<Transaction, StoreError>;
}
