//! Repository for the `subscriptions` table.
//!
//! Each user has at most one row (`uq_subscriptions_user_id`); every write
//! is an upsert keyed on `user_id`.

use lp_core::types::UserId;
use sqlx::{PgConnection, PgPool};

use crate::models::subscription::{Subscription, UpsertSubscription};

/// Column list for `subscriptions` queries.
const COLUMNS: &str = "\
    id, user_id, stripe_customer_id, stripe_subscription_id, plan, status, \
    current_period_end, created_at, updated_at";

/// Provides data access for subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_customer_id(
        pool: &PgPool,
        customer_id: &str,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE stripe_customer_id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(customer_id)
            .fetch_optional(pool)
            .await
    }

    /// Remember the Stripe customer for a user without touching plan/status.
    pub async fn set_customer_id(
        pool: &PgPool,
        user_id: UserId,
        customer_id: &str,
    ) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions (user_id, stripe_customer_id) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 stripe_customer_id = EXCLUDED.stripe_customer_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .bind(customer_id)
            .fetch_one(pool)
            .await
    }

    /// Insert or update the user's subscription.
    ///
    /// Stripe identifiers are only overwritten when the new value is present.
    pub(crate) async fn upsert_conn(
        conn: &mut PgConnection,
        dto: &UpsertSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions \
                 (user_id, stripe_customer_id, stripe_subscription_id, plan, status, current_period_end) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 stripe_customer_id = COALESCE(EXCLUDED.stripe_customer_id, subscriptions.stripe_customer_id), \
                 stripe_subscription_id = COALESCE(EXCLUDED.stripe_subscription_id, subscriptions.stripe_subscription_id), \
                 plan = EXCLUDED.plan, \
                 status = EXCLUDED.status, \
                 current_period_end = EXCLUDED.current_period_end \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(dto.user_id)
            .bind(&dto.stripe_customer_id)
            .bind(&dto.stripe_subscription_id)
            .bind(&dto.plan)
            .bind(&dto.status)
            .bind(dto.current_period_end)
            .fetch_one(conn)
            .await
    }
}
