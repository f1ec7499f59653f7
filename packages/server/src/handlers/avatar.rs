use axum::Json;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::AppQuery;
use crate::models::avatar::{AvatarListResponse, AvatarPageQuery, AvatarResponse, AvatarUpload};
use crate::service::AvatarService;
use crate::state::AppState;

/// Multipart field carrying the image.
const AVATAR_FIELD: &str = "avatar";

/// Headroom for multipart boundaries and part headers on top of the image.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn avatar_upload_body_limit(max_avatar_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_avatar_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(limit.saturating_add(MULTIPART_OVERHEAD))
}

fn service(state: &AppState) -> AvatarService<'_> {
    AvatarService::new(&state.db, state.avatar_store.as_ref())
}

#[utoipa::path(
    post,
    path = "/avatar/{studentId}",
    tag = "Avatars",
    operation_id = "uploadAvatar",
    summary = "Upload a student's avatar",
    description = "Stores the image in the `avatar` multipart field both on disk and in the \
        database. Uploading again replaces the previous image.",
    params(("studentId" = i32, Path, description = "Student ID")),
    request_body(content_type = "multipart/form-data", description = "Image in the `avatar` field"),
    responses(
        (status = 200, description = "Avatar stored", body = AvatarResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart), fields(student_id))]
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, AppError> {
    let mut upload: Option<AvatarUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some(AVATAR_FIELD) {
            upload = Some(read_avatar_field(field, state.config.storage.max_avatar_size).await?);
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation(format!("Missing '{AVATAR_FIELD}' field")))?;
    let model = service(&state).upload(student_id, upload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/avatar/{id}",
    tag = "Avatars",
    operation_id = "getAvatar",
    summary = "Get avatar metadata",
    params(("id" = i32, Path, description = "Avatar ID")),
    responses(
        (status = 200, description = "Avatar metadata", body = AvatarResponse),
        (status = 404, description = "Avatar not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AvatarResponse>, AppError> {
    let model = service(&state).get_by_id(id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/avatar/{id}/from-db",
    tag = "Avatars",
    operation_id = "downloadAvatarFromDb",
    summary = "Download the avatar bytes stored in the database",
    params(("id" = i32, Path, description = "Avatar ID")),
    responses(
        (status = 200, description = "Image bytes with the stored media type"),
        (status = 404, description = "Avatar not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn download_avatar_from_db(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let model = service(&state).get_by_id(id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &model.media_type)
        .header(header::CONTENT_LENGTH, model.data.len().to_string())
        .body(Body::from(model.data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

#[utoipa::path(
    get,
    path = "/avatar/{id}/from-file",
    tag = "Avatars",
    operation_id = "downloadAvatarFromFile",
    summary = "Stream the avatar from its file on disk",
    params(("id" = i32, Path, description = "Avatar ID")),
    responses(
        (status = 200, description = "Image stream with the stored media type"),
        (status = 404, description = "Avatar or its file not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn download_avatar_from_file(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let (model, reader) = service(&state).open_file(id).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &model.media_type)
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

#[utoipa::path(
    get,
    path = "/avatar",
    tag = "Avatars",
    operation_id = "listAvatars",
    summary = "List avatars, five per page",
    params(AvatarPageQuery),
    responses(
        (status = 200, description = "One page of avatars", body = AvatarListResponse),
        (status = 400, description = "Invalid page (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(page = query.page))]
pub async fn list_avatars(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AvatarPageQuery>,
) -> Result<Json<AvatarListResponse>, AppError> {
    let page = query.page.unwrap_or(1);
    Ok(Json(service(&state).list_page(page).await?))
}

/// Reads one multipart field into memory, failing once it grows past `max_size`.
async fn read_avatar_field(
    mut field: axum::extract::multipart::Field<'_>,
    max_size: u64,
) -> Result<AvatarUpload, AppError> {
    let file_name = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("Avatar field must have a filename".into()))?;
    let content_type = field.content_type().map(str::to_string);

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (bytes.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        return Err(AppError::Validation("Avatar file is empty".into()));
    }

    Ok(AvatarUpload {
        file_name,
        content_type,
        bytes,
    })
}
