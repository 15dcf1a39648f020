//! Handlers for the media library (uploads and AI-generated images).
//!
//! Bytes live in Supabase Storage under `{user_id}/`; each object has a
//! `media_images` row carrying the uploader's id.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::error::CoreError;
use lp_core::plans::check_upload_size;
use lp_core::types::{DbId, UserId};
use lp_db::models::media::{CreateMediaImage, MediaImage, SOURCE_GENERATED, SOURCE_UPLOAD};
use lp_db::repositories::MediaRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field holding the file.
const FILE_FIELD: &str = "file";

/// Accepted image types and the extension used for their storage path.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

fn extension_for(mime_type: &str) -> Option<&'static str> {
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == mime_type)
        .map(|(_, ext)| *ext)
}

/// Query parameters for `GET /media`.
#[derive(Debug, Deserialize)]
pub struct MediaListParams {
    /// `upload` or `generated`.
    pub source: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// An image about to be written to storage.
pub(crate) struct NewImage<'a> {
    pub user_id: UserId,
    pub bytes: Vec<u8>,
    pub mime_type: &'a str,
    pub file_name: &'a str,
    pub source: &'a str,
    pub prompt: Option<&'a str>,
}

/// Upload bytes to storage and record the row.
///
/// If the row cannot be written the object is removed again.
pub(crate) async fn store_image(state: &AppState, image: NewImage<'_>) -> AppResult<MediaImage> {
    let (storage, bucket) = state.storage()?;
    let ext = extension_for(image.mime_type).ok_or_else(|| {
        CoreError::Validation(format!("Unsupported image type '{}'", image.mime_type))
    })?;

    let storage_path = format!("{}/{}.{ext}", image.user_id, uuid::Uuid::new_v4());
    let size_bytes = image.bytes.len() as i64;
    storage
        .upload(bucket, &storage_path, image.bytes, image.mime_type)
        .await?;

    let row = MediaRepo::create(
        &state.pool,
        &CreateMediaImage {
            user_id: image.user_id,
            storage_path: storage_path.clone(),
            public_url: storage.public_url(bucket, &storage_path),
            file_name: image.file_name.to_string(),
            mime_type: image.mime_type.to_string(),
            size_bytes,
            source: image.source.to_string(),
            prompt: image.prompt.map(str::to_string),
        },
    )
    .await;

    match row {
        Ok(media) => Ok(media),
        Err(err) => {
            if let Err(cleanup) = storage.delete(bucket, &[storage_path.clone()]).await {
                tracing::warn!(
                    error = %cleanup,
                    path = %storage_path,
                    "Failed to remove orphaned object",
                );
            }
            Err(err.into())
        }
    }
}

/// GET /api/v1/media
pub async fn list_media(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<MediaListParams>,
) -> AppResult<impl IntoResponse> {
    let source = params.source.as_deref();
    if let Some(s) = source {
        if s != SOURCE_UPLOAD && s != SOURCE_GENERATED {
            return Err(AppError::BadRequest(format!(
                "source must be '{SOURCE_UPLOAD}' or '{SOURCE_GENERATED}'"
            )));
        }
    }
    let (limit, offset) = crate::query::PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let images = MediaRepo::list_for_user(&state.pool, user.user_id, source, limit, offset).await?;
    Ok(Json(DataResponse { data: images }))
}

/// POST /api/v1/media (multipart, field `file`)
pub async fn upload_media(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    // Fail before reading the body when storage is missing.
    state.storage()?;

    let mut upload: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
        upload = Some((file_name, mime_type, bytes.to_vec()));
        break;
    }

    let (file_name, mime_type, bytes) = upload
        .ok_or_else(|| AppError::BadRequest(format!("Missing multipart field '{FILE_FIELD}'")))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    if extension_for(&mime_type).is_none() {
        return Err(AppError::BadRequest(format!(
            "Unsupported image type '{mime_type}'"
        )));
    }
    check_upload_size(user.plan, bytes.len())?;

    let media = store_image(
        &state,
        NewImage {
            user_id: user.user_id,
            bytes,
            mime_type: &mime_type,
            file_name: &file_name,
            source: SOURCE_UPLOAD,
            prompt: None,
        },
    )
    .await?;

    tracing::info!(
        media_id = media.id,
        user_id = %user.user_id,
        size_bytes = media.size_bytes,
        mime_type = %media.mime_type,
        "Media uploaded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: media })))
}

/// DELETE /api/v1/media/{id}
///
/// Removes the storage object, then the row.
pub async fn delete_media(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(media_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let media = MediaRepo::find_by_id(&state.pool, media_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MediaImage",
            id: media_id,
        }))?;
    user.ensure_owns(media.user_id)?;

    let (storage, bucket) = state.storage()?;
    storage.delete(bucket, &[media.storage_path.clone()]).await?;
    MediaRepo::delete(&state.pool, media_id).await?;

    tracing::info!(media_id, user_id = %user.user_id, "Media deleted");

    Ok(StatusCode::NO_CONTENT)
}
