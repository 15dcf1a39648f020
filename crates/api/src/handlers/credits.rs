//! Handlers for the caller's credit balance and ledger.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use lp_core::credits::CreditSummary;
use lp_db::repositories::CreditRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/credits
///
/// Creates the balance on first access and refills it once the period has
/// elapsed.
pub async fn get_summary(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let allowance = user.plan.limits().monthly_credits;
    let balance = CreditRepo::get_current(&state.pool, user.user_id, allowance).await?;

    let summary = CreditSummary::new(
        user.plan,
        balance.balance,
        balance.monthly_allowance,
        balance.period_start,
    );
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/credits/transactions
pub async fn list_transactions(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.resolve();
    let ledger = CreditRepo::list_transactions(&state.pool, user.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: ledger }))
}
