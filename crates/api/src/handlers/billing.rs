//! Stripe billing: Checkout, the customer portal, and the webhook that keeps
//! `subscriptions` and plans in sync.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::billing::{self, map_stripe_status, plan_for_status, verify_stripe_signature};
use lp_core::credits::reasons;
use lp_core::error::CoreError;
use lp_core::plans::Plan;
use lp_core::types::{Timestamp, UserId};
use lp_db::repositories::account_repo::{PlanChange, StripeRefs};
use lp_db::repositories::{AccountRepo, SubscriptionRepo};
use lp_providers::stripe::{CheckoutParams, USER_ID_METADATA_KEY};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "stripe-signature";

// ---------------------------------------------------------------------------
// Checkout and portal
// ---------------------------------------------------------------------------

/// POST /api/v1/billing/checkout
///
/// Creates the Stripe customer on first use and returns a Checkout URL for
/// the pro plan.
pub async fn create_checkout(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stripe = state.stripe()?;
    let price_id = state
        .config
        .stripe
        .pro_price_id
        .as_deref()
        .ok_or_else(|| CoreError::Unavailable("No price is configured for the pro plan".into()))?;

    if user.plan.is_paid() {
        return Err(CoreError::Conflict(
            "You are already on a paid plan".into(),
        )
        .into());
    }

    let existing = SubscriptionRepo::find_by_user(&state.pool, user.user_id)
        .await?
        .and_then(|s| s.stripe_customer_id);
    let customer_id = match existing {
        Some(id) => id,
        None => {
            let customer = stripe
                .create_customer(user.user_id, user.email.as_deref())
                .await?;
            SubscriptionRepo::set_customer_id(&state.pool, user.user_id, &customer.id).await?;
            tracing::info!(
                user_id = %user.user_id,
                customer_id = %customer.id,
                "Stripe customer created",
            );
            customer.id
        }
    };

    let app_url = &state.config.app_url;
    let success_url = format!("{app_url}/billing?success=1");
    let cancel_url = format!("{app_url}/billing");
    let session = stripe
        .create_checkout_session(&CheckoutParams {
            user_id: user.user_id,
            customer_id: &customer_id,
            price_id,
            success_url: &success_url,
            cancel_url: &cancel_url,
        })
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        session_id = %session.id,
        "Checkout session created",
    );

    Ok(Json(DataResponse {
        data: json!({ "url": session.url, "session_id": session.id }),
    }))
}

/// POST /api/v1/billing/portal
pub async fn create_portal(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stripe = state.stripe()?;
    let customer_id = SubscriptionRepo::find_by_user(&state.pool, user.user_id)
        .await?
        .and_then(|s| s.stripe_customer_id)
        .ok_or_else(|| AppError::BadRequest("No billing account exists for this user".into()))?;

    let return_url = format!("{}/billing", state.config.app_url);
    let session = stripe
        .create_portal_session(&customer_id, &return_url)
        .await?;

    Ok(Json(DataResponse {
        data: json!({ "url": session.url }),
    }))
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StripeEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: Value,
}

/// POST /api/v1/billing/webhook
///
/// Authenticated by the `Stripe-Signature` header over the raw body.
/// Unknown event types and events for unknown users are acknowledged so
/// Stripe does not retry them. Each event id is applied at most once.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let secret = state
        .config
        .stripe
        .webhook_secret
        .as_deref()
        .ok_or_else(|| CoreError::Unavailable("Stripe webhooks are not configured".into()))?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| CoreError::Unauthorized("Missing Stripe-Signature header".into()))?;
    verify_stripe_signature(&body, signature, secret, chrono::Utc::now().timestamp())?;

    let event: StripeEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed Stripe event: {e}")))?;
    let object = &event.data.object;

    let Some(user_id) = resolve_user(&state, object).await? else {
        tracing::warn!(
            event_id = %event.id,
            event_type = %event.event_type,
            "Stripe event for unknown user",
        );
        return Ok(Json(json!({ "received": true })));
    };

    let refs = StripeRefs {
        customer_id: str_field(object, "customer"),
        subscription_id: None,
        current_period_end: None,
    };

    let change = match event.event_type.as_str() {
        "checkout.session.completed" => PlanChange {
            plan: Plan::Pro,
            status: billing::STATUS_ACTIVE,
            stripe: StripeRefs {
                subscription_id: str_field(object, "subscription"),
                ..refs
            },
            reason: reasons::PLAN_GRANT,
            reset_credits: true,
        },
        "customer.subscription.updated" => {
            let status = map_stripe_status(object["status"].as_str().unwrap_or_default());
            PlanChange {
                plan: plan_for_status(status),
                status,
                stripe: StripeRefs {
                    subscription_id: str_field(object, "id"),
                    current_period_end: period_end(object),
                    ..refs
                },
                reason: reasons::PLAN_GRANT,
                reset_credits: false,
            }
        }
        "customer.subscription.deleted" => PlanChange {
            plan: Plan::Free,
            status: billing::STATUS_CANCELED,
            stripe: StripeRefs {
                subscription_id: str_field(object, "id"),
                ..refs
            },
            reason: reasons::PLAN_GRANT,
            reset_credits: false,
        },
        "invoice.paid" => PlanChange {
            plan: Plan::Pro,
            status: billing::STATUS_ACTIVE,
            stripe: StripeRefs {
                subscription_id: str_field(object, "subscription"),
                current_period_end: object["lines"]["data"][0]["period"]["end"]
                    .as_i64()
                    .and_then(from_unix),
                ..refs
            },
            reason: reasons::MONTHLY_REFILL,
            reset_credits: true,
        },
        other => {
            tracing::debug!(event_id = %event.id, event_type = other, "Ignoring Stripe event");
            return Ok(Json(json!({ "received": true })));
        }
    };

    let applied =
        AccountRepo::apply_stripe_event(&state.pool, &event.id, &event.event_type, user_id, change)
            .await?;
    if applied.is_none() {
        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            "Duplicate Stripe event ignored",
        );
        return Ok(Json(json!({ "received": true, "duplicate": true })));
    }

    tracing::info!(
        event_id = %event.id,
        event_type = %event.event_type,
        %user_id,
        "Stripe event applied",
    );

    Ok(Json(json!({ "received": true })))
}

/// Find the user an event belongs to: metadata first, then the Checkout
/// reference, then the stored customer id.
async fn resolve_user(state: &AppState, object: &Value) -> AppResult<Option<UserId>> {
    let tagged = object["metadata"][USER_ID_METADATA_KEY]
        .as_str()
        .or_else(|| object["client_reference_id"].as_str())
        .and_then(|s| s.parse::<UserId>().ok());
    if tagged.is_some() {
        return Ok(tagged);
    }

    match object["customer"].as_str() {
        Some(customer_id) => Ok(SubscriptionRepo::find_by_customer_id(&state.pool, customer_id)
            .await?
            .map(|s| s.user_id)),
        None => Ok(None),
    }
}

fn str_field(object: &Value, key: &str) -> Option<String> {
    object[key].as_str().map(str::to_string)
}

/// `current_period_end` moved onto subscription items in newer API versions.
fn period_end(object: &Value) -> Option<Timestamp> {
    object["current_period_end"]
        .as_i64()
        .or_else(|| object["items"]["data"][0]["current_period_end"].as_i64())
        .and_then(from_unix)
}

fn from_unix(secs: i64) -> Option<Timestamp> {
    chrono::DateTime::from_timestamp(secs, 0)
}
