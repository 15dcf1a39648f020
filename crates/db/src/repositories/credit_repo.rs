//! Repository for `credit_balances` and the `credit_transactions` ledger.
//!
//! Charges are a single conditional `UPDATE ... WHERE balance >= $2`, so a
//! balance can never go negative even under concurrent requests. Every
//! balance change writes a ledger row in the same transaction.

use chrono::Utc;
use lp_core::credits::{self, reasons};
use lp_core::types::UserId;
use sqlx::{PgConnection, PgPool};

use crate::models::credit::{CreditBalance, CreditTransaction};

/// Column list for `credit_balances` queries.
const BALANCE_COLUMNS: &str = "\
    id, user_id, balance, monthly_allowance, period_start, created_at, updated_at";

/// Column list for `credit_transactions` queries.
const TX_COLUMNS: &str = "id, user_id, amount, reason, reference, created_at";

/// Provides data access for credit balances and the ledger.
pub struct CreditRepo;

impl CreditRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<CreditBalance>, sqlx::Error> {
        let query = format!("SELECT {BALANCE_COLUMNS} FROM credit_balances WHERE user_id = $1");
        sqlx::query_as::<_, CreditBalance>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the balance row, creating it with a full allowance if missing,
    /// and refill it if its period has elapsed.
    pub async fn get_current(
        pool: &PgPool,
        user_id: UserId,
        monthly_allowance: i64,
    ) -> Result<CreditBalance, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert = format!(
            "INSERT INTO credit_balances (user_id, balance, monthly_allowance) \
             VALUES ($1, $2, $2) \
             ON CONFLICT (user_id) DO NOTHING \
             RETURNING {BALANCE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, CreditBalance>(&insert)
            .bind(user_id)
            .bind(monthly_allowance)
            .fetch_optional(&mut *tx)
            .await?;

        let balance = match created {
            Some(row) => {
                Self::record_conn(
                    &mut tx,
                    user_id,
                    monthly_allowance,
                    reasons::MONTHLY_REFILL,
                    None,
                )
                .await?;
                row
            }
            None => {
                let select = format!(
                    "SELECT {BALANCE_COLUMNS} FROM credit_balances WHERE user_id = $1 FOR UPDATE"
                );
                let row = sqlx::query_as::<_, CreditBalance>(&select)
                    .bind(user_id)
                    .fetch_one(&mut *tx)
                    .await?;

                if credits::period_has_elapsed(row.period_start, Utc::now()) {
                    tracing::info!(%user_id, monthly_allowance, "Refilling credits for new period");
                    Self::reset_conn(&mut tx, user_id, monthly_allowance, reasons::MONTHLY_REFILL)
                        .await?
                } else {
                    row
                }
            }
        };

        tx.commit().await?;
        Ok(balance)
    }

    /// Deduct `amount` credits and write a ledger row.
    ///
    /// Returns `None` (and changes nothing) if the balance is insufficient.
    pub async fn charge(
        pool: &PgPool,
        user_id: UserId,
        amount: i64,
        reason: &str,
        reference: Option<&str>,
    ) -> Result<Option<CreditBalance>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE credit_balances SET balance = balance - $2 \
             WHERE user_id = $1 AND balance >= $2 \
             RETURNING {BALANCE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, CreditBalance>(&query)
            .bind(user_id)
            .bind(amount)
            .fetch_optional(&mut *tx)
            .await?;

        if updated.is_some() {
            Self::record_conn(&mut tx, user_id, -amount, reason, reference).await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Add `amount` credits (may be negative for admin corrections, but the
    /// balance check constraint still forbids going below zero).
    pub async fn credit(
        pool: &PgPool,
        user_id: UserId,
        amount: i64,
        reason: &str,
        reference: Option<&str>,
    ) -> Result<CreditBalance, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE credit_balances SET balance = balance + $2 \
             WHERE user_id = $1 \
             RETURNING {BALANCE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, CreditBalance>(&query)
            .bind(user_id)
            .bind(amount)
            .fetch_one(&mut *tx)
            .await?;

        Self::record_conn(&mut tx, user_id, amount, reason, reference).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// List ledger entries for a user, newest first.
    pub async fn list_transactions(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreditTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {TX_COLUMNS} FROM credit_transactions \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Set the balance to `allowance` and start a new period now.
    ///
    /// The ledger row records the delta so the ledger sums to the balance.
    pub(crate) async fn reset_conn(
        conn: &mut PgConnection,
        user_id: UserId,
        allowance: i64,
        reason: &str,
    ) -> Result<CreditBalance, sqlx::Error> {
        let previous: Option<i64> =
            sqlx::query_scalar("SELECT balance FROM credit_balances WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *conn)
                .await?;

        let query = format!(
            "INSERT INTO credit_balances (user_id, balance, monthly_allowance, period_start) \
             VALUES ($1, $2, $2, NOW()) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 balance = EXCLUDED.balance, \
                 monthly_allowance = EXCLUDED.monthly_allowance, \
                 period_start = EXCLUDED.period_start \
             RETURNING {BALANCE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CreditBalance>(&query)
            .bind(user_id)
            .bind(allowance)
            .fetch_one(&mut *conn)
            .await?;

        let delta = allowance - previous.unwrap_or(0);
        if delta != 0 {
            Self::record_conn(conn, user_id, delta, reason, None).await?;
        }
        Ok(row)
    }

    async fn record_conn(
        conn: &mut PgConnection,
        user_id: UserId,
        amount: i64,
        reason: &str,
        reference: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO credit_transactions (user_id, amount, reason, reference) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(amount)
        .bind(reason)
        .bind(reference)
        .execute(conn)
        .await?;
        Ok(())
    }
}
