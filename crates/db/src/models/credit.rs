//! Credit balances and the credit ledger.

use lp_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `credit_balances` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditBalance {
    pub id: DbId,
    pub user_id: UserId,
    pub balance: i64,
    pub monthly_allowance: i64,
    pub period_start: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `credit_transactions` table.
///
/// `amount` is negative for charges and positive for grants and refunds.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditTransaction {
    pub id: DbId,
    pub user_id: UserId,
    pub amount: i64,
    pub reason: String,
    pub reference: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for a manual admin adjustment.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustCredits {
    pub amount: i64,
    pub note: Option<String>,
}
