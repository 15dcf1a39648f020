//! Credit metering: operation costs, billing periods, and balance summaries.

use chrono::Duration;
use serde::Serialize;

use crate::plans::Plan;
use crate::types::Timestamp;

/// Length of a credit period. Balances are refilled once a period elapses.
pub const CREDIT_PERIOD_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Ledger reasons
// ---------------------------------------------------------------------------

/// Reason strings written to `credit_transactions.reason`.
pub mod reasons {
    pub const TEXT_GENERATION: &str = "text_generation";
    pub const IMAGE_GENERATION: &str = "image_generation";
    pub const REFUND: &str = "refund";
    pub const MONTHLY_REFILL: &str = "monthly_refill";
    pub const PLAN_GRANT: &str = "plan_grant";
    pub const ADMIN_ADJUSTMENT: &str = "admin_adjustment";
}

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------

/// A metered AI operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditCost {
    Text,
    Image,
}

impl CreditCost {
    /// Number of credits charged for one call.
    pub fn amount(self) -> i64 {
        match self {
            CreditCost::Text => 1,
            CreditCost::Image => 5,
        }
    }

    /// Ledger reason for a charge of this kind.
    pub fn reason(self) -> &'static str {
        match self {
            CreditCost::Text => reasons::TEXT_GENERATION,
            CreditCost::Image => reasons::IMAGE_GENERATION,
        }
    }
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// End of the period that started at `period_start`.
pub fn period_end(period_start: Timestamp) -> Timestamp {
    period_start + Duration::days(CREDIT_PERIOD_DAYS)
}

/// Whether the period starting at `period_start` is over at `now`.
pub fn period_has_elapsed(period_start: Timestamp, now: Timestamp) -> bool {
    now >= period_end(period_start)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Credit overview returned by `GET /credits`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreditSummary {
    pub plan: Plan,
    pub balance: i64,
    pub monthly_allowance: i64,
    /// Credits spent since the current period started (never negative).
    pub used_this_period: i64,
    pub period_start: Timestamp,
    pub resets_at: Timestamp,
}

impl CreditSummary {
    pub fn new(plan: Plan, balance: i64, monthly_allowance: i64, period_start: Timestamp) -> Self {
        Self {
            plan,
            balance,
            monthly_allowance,
            used_this_period: (monthly_allowance - balance).max(0),
            period_start,
            resets_at: period_end(period_start),
        }
    }
}
