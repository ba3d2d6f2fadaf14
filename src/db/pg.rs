use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::PgPool;

use crate::db::ledger::{LedgerStore, StoreError};
use crate::models::{NewTransaction, TradeSide, Transaction, User};

const TRANSACTION_COLUMNS: &str =
    "id, user_id, symbol, side, quantity, price_at_transaction, timestamp";

pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, balance, version, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, balance, version, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&user.id)
        .bind(&user.balance)
        .bind(user.version)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DuplicateUser);
        }
        Ok(user)
    }

    async fn transactions_for_user(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS}
             FROM transactions
             WHERE user_id = $1
             ORDER BY timestamp DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn quantity_sum(
        &self,
        user_id: &str,
        symbol: &str,
        side: TradeSide,
    ) -> Result<BigDecimal, StoreError> {
        let sum = sqlx::query_scalar::<_, BigDecimal>(
            "SELECT COALESCE(SUM(quantity), 0::NUMERIC)
             FROM transactions
             WHERE user_id = $1 AND symbol = $2 AND side = $3",
        )
        .bind(user_id)
        .bind(symbol)
        .bind(side)
        .fetch_one(&self.pool)
        .await?;
        Ok(sum)
    }

    async fn commit_trade(
        &self,
        user_id: &str,
        expected_version: i64,
        new_balance: &BigDecimal,
        entry: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Conditional write: a stale version means another trade committed
        // in between, so nothing may be applied. The version guard holds
        // even when interleaved trades netted the balance back to its
        // staged value.
        let updated = sqlx::query(
            "UPDATE users SET balance = $1, version = version + 1
             WHERE id = $2 AND version = $3",
        )
        .bind(new_balance)
        .bind(user_id)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::BalanceConflict);
        }

        let committed = sqlx::query_as::<_, Transaction>(&format!(
            "INSERT INTO transactions (user_id, symbol, side, quantity, price_at_transaction, timestamp)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(&entry.user_id)
        .bind(&entry.symbol)
        .bind(entry.side)
        .bind(&entry.quantity)
        .bind(&entry.price_at_transaction)
        .bind(entry.timestamp)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(committed)
    }
}
