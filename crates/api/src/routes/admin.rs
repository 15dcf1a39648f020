use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin_users;
use crate::state::AppState;

/// Account administration mounted at `/admin/users`.
///
/// ```text
/// GET  /{user_id}          -> get_user
/// PUT  /{user_id}/plan     -> set_plan
/// PUT  /{user_id}/role     -> set_role
/// POST /{user_id}/credits  -> adjust_credits
/// ```
pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}", get(admin_users::get_user))
        .route("/{user_id}/plan", put(admin_users::set_plan))
        .route("/{user_id}/role", put(admin_users::set_role))
        .route("/{user_id}/credits", post(admin_users::adjust_credits))
}
