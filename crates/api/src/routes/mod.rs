pub mod admin;
pub mod billing;
pub mod config;
pub mod creatives;
pub mod health;
pub mod inquiries;
pub mod me;
pub mod media;
pub mod pages;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /config/{key}                                    read config value
///
/// /me                                              current account
/// /me/settings                                     profile, Gemini key (PUT)
///
/// /pages                                           list, create
/// /pages/{id}                                      get, update, delete
/// /pages/{id}/publish                              publish (POST)
/// /pages/{id}/unpublish                            unpublish (POST)
/// /pages/{id}/export                               HTML download (GET)
/// /pages/{id}/sections                             append section (POST)
/// /pages/{id}/sections/reorder                     reorder (PUT)
/// /pages/{id}/sections/{section_id}                update, delete
///
/// /public/pages/{slug}                             published page (no auth)
///
/// /media                                           list, upload
/// /media/{id}                                      delete
///
/// /banners, /thumbnails                            list, create
/// /banners/{id}, /thumbnails/{id}                  get, update, delete
///
/// /templates                                       active templates
/// /templates/{id}                                  get
///
/// /credits                                         summary
/// /credits/transactions                            ledger
///
/// /billing/checkout                                Stripe Checkout (POST)
/// /billing/portal                                  customer portal (POST)
/// /billing/webhook                                 Stripe events (POST, signed)
///
/// /ai/text                                         text generation (POST)
/// /ai/image                                        image generation (POST)
///
/// /inquiries                                       contact form (POST, no auth)
///
/// /admin/config                                    list (admin only)
/// /admin/config/{key}                              upsert, delete
/// /admin/templates                                 list, create
/// /admin/templates/{id}                            update, delete
/// /admin/inquiries                                 list
/// /admin/inquiries/{id}                            get, update, delete
/// /admin/users/{user_id}                           account overview
/// /admin/users/{user_id}/plan                      grant plan (PUT)
/// /admin/users/{user_id}/role                      set role (PUT)
/// /admin/users/{user_id}/credits                   adjust credits (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/config", config::router())
        .nest("/me", me::router())
        .nest("/pages", pages::router())
        .nest("/public/pages", pages::public_router())
        .nest("/media", media::router())
        .nest("/banners", creatives::banner_router())
        .nest("/thumbnails", creatives::thumbnail_router())
        .nest("/templates", templates::router())
        .nest("/credits", billing::credits_router())
        .nest("/billing", billing::billing_router())
        .nest("/ai", billing::ai_router())
        .nest("/inquiries", inquiries::router())
        // Admin-only areas; handlers enforce the role via `RequireAdmin`.
        .nest("/admin/config", config::admin_router())
        .nest("/admin/templates", templates::admin_router())
        .nest("/admin/inquiries", inquiries::admin_router())
        .nest("/admin/users", admin::users_router())
}
