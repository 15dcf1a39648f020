//! Cross-table account operations: plan changes that must update
//! `user_settings`, `subscriptions`, and `credit_balances` together.

use lp_core::billing;
use lp_core::credits::reasons;
use lp_core::plans::Plan;
use lp_core::types::{Timestamp, UserId};
use sqlx::{PgConnection, PgPool};

use crate::models::credit::CreditBalance;
use crate::models::subscription::{Subscription, UpsertSubscription};
use crate::models::user_settings::UserSettings;
use crate::repositories::{CreditRepo, SubscriptionRepo, UserSettingsRepo};

/// State of an account after a plan change.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AccountState {
    pub settings: UserSettings,
    pub subscription: Subscription,
    pub credits: CreditBalance,
}

/// Stripe-side details attached to a plan change.
#[derive(Debug, Clone, Default)]
pub struct StripeRefs {
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub current_period_end: Option<Timestamp>,
}

/// A plan/status change to write for one user.
#[derive(Debug, Clone)]
pub struct PlanChange<'a> {
    pub plan: Plan,
    pub status: &'a str,
    pub stripe: StripeRefs,
    /// Ledger reason recorded when credits are reset.
    pub reason: &'a str,
    /// Reset the balance to the plan's allowance and start a new period.
    /// Otherwise only the allowance used for future refills changes.
    pub reset_credits: bool,
}

/// Provides transactional plan changes.
pub struct AccountRepo;

impl AccountRepo {
    /// Put a user on `plan` with an active subscription and a fresh credit
    /// allowance, all in one transaction.
    ///
    /// Used by the admin endpoint and the `lp-grant-plan` binary.
    pub async fn grant_plan(
        pool: &PgPool,
        user_id: UserId,
        plan: Plan,
    ) -> Result<AccountState, sqlx::Error> {
        Self::apply_plan(
            pool,
            user_id,
            PlanChange {
                plan,
                status: billing::STATUS_ACTIVE,
                stripe: StripeRefs::default(),
                reason: reasons::PLAN_GRANT,
                reset_credits: true,
            },
        )
        .await
    }

    /// Write a plan change in one transaction.
    pub async fn apply_plan(
        pool: &PgPool,
        user_id: UserId,
        change: PlanChange<'_>,
    ) -> Result<AccountState, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let state = Self::apply_plan_conn(&mut tx, user_id, change).await?;
        tx.commit().await?;

        tracing::info!(
            %user_id,
            plan = %state.settings.plan,
            status = %state.subscription.status,
            "Account plan updated",
        );
        Ok(state)
    }

    /// Write the plan change carried by a Stripe event, once per event id.
    ///
    /// Returns `None` without touching the account when the event was
    /// already applied. The event id is recorded in the same transaction as
    /// the change, so a failed change can be retried by Stripe.
    pub async fn apply_stripe_event(
        pool: &PgPool,
        event_id: &str,
        event_type: &str,
        user_id: UserId,
        change: PlanChange<'_>,
    ) -> Result<Option<AccountState>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let recorded = sqlx::query(
            "INSERT INTO stripe_events (event_id, event_type, user_id) VALUES ($1, $2, $3) \
             ON CONFLICT (event_id) DO NOTHING",
        )
        .bind(event_id)
        .bind(event_type)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if recorded == 0 {
            return Ok(None);
        }

        let state = Self::apply_plan_conn(&mut tx, user_id, change).await?;
        tx.commit().await?;

        tracing::info!(%user_id, event_id, event_type, "Stripe event recorded");
        Ok(Some(state))
    }

    async fn apply_plan_conn(
        conn: &mut PgConnection,
        user_id: UserId,
        change: PlanChange<'_>,
    ) -> Result<AccountState, sqlx::Error> {
        let plan = change.plan;
        let settings = UserSettingsRepo::set_plan_conn(conn, user_id, plan.as_str()).await?;

        let subscription = SubscriptionRepo::upsert_conn(
            conn,
            &UpsertSubscription {
                user_id,
                stripe_customer_id: change.stripe.customer_id,
                stripe_subscription_id: change.stripe.subscription_id,
                plan: plan.as_str().to_string(),
                status: change.status.to_string(),
                current_period_end: change.stripe.current_period_end,
            },
        )
        .await?;

        let allowance = plan.limits().monthly_credits;
        let credits = if change.reset_credits {
            CreditRepo::reset_conn(conn, user_id, allowance, change.reason).await?
        } else {
            sqlx::query_as::<_, CreditBalance>(
                "INSERT INTO credit_balances (user_id, balance, monthly_allowance) \
                 VALUES ($1, $2, $2) \
                 ON CONFLICT (user_id) DO UPDATE SET monthly_allowance = EXCLUDED.monthly_allowance \
                 RETURNING id, user_id, balance, monthly_allowance, period_start, created_at, updated_at",
            )
            .bind(user_id)
            .bind(allowance)
            .fetch_one(&mut *conn)
            .await?
        };

        Ok(AccountState {
            settings,
            subscription,
            credits,
        })
    }
}
