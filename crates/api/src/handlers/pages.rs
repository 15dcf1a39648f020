//! Handlers for landing pages.
//!
//! Pages are owned by the user who created them. Owners (and admins) can
//! read, edit, publish, and export them; published pages are readable by
//! anyone through the public slug route.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use lp_core::error::CoreError;
use lp_core::export::{render_page_html, ExportSection};
use lp_core::plans::check_page_quota;
use lp_core::sections::{slugify, validate_slug};
use lp_core::types::DbId;
use lp_db::models::page::{CreatePage, Page, PageWithSections, UpdatePage};
use lp_db::models::template::TemplateSectionSeed;
use lp_db::repositories::page_repo::NewPage;
use lp_db::repositories::{PageRepo, PageSectionRepo, TemplateRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts at finding a free slug before giving up.
const SLUG_ATTEMPTS: usize = 5;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a page and check the caller may access it.
pub(crate) async fn load_owned_page(
    state: &AppState,
    user: &AuthUser,
    page_id: DbId,
) -> AppResult<Page> {
    let page = PageRepo::find_by_id(&state.pool, page_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Page",
            id: page_id,
        }))?;
    user.ensure_owns(page.user_id)?;
    Ok(page)
}

async fn with_sections(state: &AppState, page: Page) -> AppResult<PageWithSections> {
    let sections = PageSectionRepo::list_for_page(&state.pool, page.id).await?;
    Ok(PageWithSections { page, sections })
}

/// Use the requested slug as-is, or derive a free one from the title.
async fn resolve_slug(state: &AppState, requested: Option<&str>, title: &str) -> AppResult<String> {
    if let Some(slug) = requested {
        validate_slug(slug)?;
        if PageRepo::slug_exists(&state.pool, slug).await? {
            return Err(CoreError::Conflict(format!(
                "Slug '{slug}' is already taken"
            ))
            .into());
        }
        return Ok(slug.to_string());
    }

    let base = slugify(title);
    if !PageRepo::slug_exists(&state.pool, &base).await? {
        return Ok(base);
    }
    for _ in 0..SLUG_ATTEMPTS {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let candidate = format!("{base}-{}", &suffix[..6]);
        if !PageRepo::slug_exists(&state.pool, &candidate).await? {
            return Ok(candidate);
        }
    }
    Err(CoreError::Conflict(
        "Could not generate a unique slug".into(),
    )
    .into())
}

/// Section seeds of an active template.
async fn template_seeds(
    state: &AppState,
    template_id: DbId,
) -> AppResult<Vec<TemplateSectionSeed>> {
    let template = TemplateRepo::find_by_id(&state.pool, template_id)
        .await?
        .filter(|t| t.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LpTemplate",
            id: template_id,
        }))?;

    serde_json::from_value(template.sections).map_err(|e| {
        AppError::InternalError(format!(
            "Template {template_id} has malformed sections: {e}"
        ))
    })
}

// ---------------------------------------------------------------------------
// Owner endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/pages
pub async fn list_pages(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.resolve();
    let pages = PageRepo::list_for_user(&state.pool, user.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: pages }))
}

/// POST /api/v1/pages
///
/// Enforces the plan's page quota. With `template_id`, the template's
/// sections are copied onto the new page.
pub async fn create_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".into()));
    }

    let owned = PageRepo::count_for_user(&state.pool, user.user_id).await?;
    check_page_quota(user.plan, owned)?;

    let seeds = match input.template_id {
        Some(template_id) => template_seeds(&state, template_id).await?,
        None => Vec::new(),
    };
    let slug = resolve_slug(&state, input.slug.as_deref(), title).await?;

    let page = PageRepo::create(
        &state.pool,
        &NewPage {
            user_id: user.user_id,
            title,
            slug: &slug,
            description: input.description.as_deref(),
            template_id: input.template_id,
            metadata: input.metadata.unwrap_or_else(|| serde_json::json!({})),
        },
        &seeds,
    )
    .await?;

    tracing::info!(
        page_id = page.id,
        user_id = %user.user_id,
        slug = %page.slug,
        sections = seeds.len(),
        "Page created",
    );

    let data = with_sections(&state, page).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/pages/{id}
pub async fn get_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = load_owned_page(&state, &user, page_id).await?;
    let data = with_sections(&state, page).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/pages/{id}
pub async fn update_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<UpdatePage>,
) -> AppResult<impl IntoResponse> {
    let page = load_owned_page(&state, &user, page_id).await?;

    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return Err(AppError::BadRequest("Title must not be empty".into()));
        }
    }
    if let Some(slug) = input.slug.as_deref().filter(|s| *s != page.slug) {
        validate_slug(slug)?;
    }

    let updated = PageRepo::update(&state.pool, page_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Page",
            id: page_id,
        }))?;

    tracing::info!(page_id, user_id = %user.user_id, "Page updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/pages/{id}
pub async fn delete_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_owned_page(&state, &user, page_id).await?;
    PageRepo::delete(&state.pool, page_id).await?;

    tracing::info!(page_id, user_id = %user.user_id, "Page deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/pages/{id}/publish
pub async fn publish_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    set_published(state, user, page_id, true).await
}

/// POST /api/v1/pages/{id}/unpublish
pub async fn unpublish_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    set_published(state, user, page_id, false).await
}

async fn set_published(
    state: AppState,
    user: AuthUser,
    page_id: DbId,
    published: bool,
) -> AppResult<Json<DataResponse<Page>>> {
    load_owned_page(&state, &user, page_id).await?;
    let page = PageRepo::set_published(&state.pool, page_id, published)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Page",
            id: page_id,
        }))?;

    tracing::info!(
        page_id,
        user_id = %user.user_id,
        status = %page.status,
        "Page status changed",
    );

    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/pages/{id}/export
///
/// Standalone HTML document, served as a download.
pub async fn export_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = load_owned_page(&state, &user, page_id).await?;
    let sections = PageSectionRepo::list_for_page(&state.pool, page.id).await?;

    let export: Vec<ExportSection<'_>> = sections
        .iter()
        .map(|s| ExportSection {
            section_type: &s.section_type,
            config: &s.config,
            image_url: s.image_url.as_deref(),
        })
        .collect();
    let html = render_page_html(&page.title, page.description.as_deref(), &export);

    tracing::info!(page_id, sections = sections.len(), "Page exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.html\"", page.slug),
            ),
        ],
        html,
    ))
}

// ---------------------------------------------------------------------------
// Public endpoint
// ---------------------------------------------------------------------------

/// GET /api/v1/public/pages/{slug}
pub async fn get_public_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No published page with slug '{slug}'")))?;
    let data = with_sections(&state, page).await?;
    Ok(Json(DataResponse { data }))
}
