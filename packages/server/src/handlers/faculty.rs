use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::entity::faculty;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppQuery};
use crate::models::faculty::*;
use crate::service::FacultyService;
use crate::state::AppState;

fn to_responses(models: Vec<faculty::Model>) -> Json<Vec<FacultyResponse>> {
    Json(models.into_iter().map(FacultyResponse::from).collect())
}

#[utoipa::path(
    post,
    path = "/faculty",
    tag = "Faculties",
    operation_id = "createFaculty",
    summary = "Create a faculty",
    request_body = FacultyRequest,
    responses(
        (status = 200, description = "Faculty created", body = FacultyResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_faculty(
    State(state): State<AppState>,
    AppJson(payload): AppJson<FacultyRequest>,
) -> Result<Json<FacultyResponse>, AppError> {
    validate_faculty(&payload)?;
    let model = FacultyService::new(&state.db).create(payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/faculty/{id}",
    tag = "Faculties",
    operation_id = "updateFaculty",
    summary = "Replace a faculty's name and color",
    params(("id" = i32, Path, description = "Faculty ID")),
    request_body = FacultyRequest,
    responses(
        (status = 200, description = "Faculty updated", body = FacultyResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Faculty not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<FacultyRequest>,
) -> Result<Json<FacultyResponse>, AppError> {
    validate_faculty(&payload)?;
    let model = FacultyService::new(&state.db).update(id, payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/faculty/{id}",
    tag = "Faculties",
    operation_id = "deleteFaculty",
    summary = "Delete a faculty",
    description = "Deletes the faculty and returns it. Its students are kept with `faculty_id` \
        cleared.",
    params(("id" = i32, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Faculty deleted", body = FacultyResponse),
        (status = 404, description = "Faculty not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FacultyResponse>, AppError> {
    let model = FacultyService::new(&state.db).delete(id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/faculty/{id}",
    tag = "Faculties",
    operation_id = "getFaculty",
    summary = "Get a faculty by ID",
    params(("id" = i32, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Faculty details", body = FacultyResponse),
        (status = 404, description = "Faculty not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FacultyResponse>, AppError> {
    let model = FacultyService::new(&state.db).get_by_id(id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/faculty",
    tag = "Faculties",
    operation_id = "listFaculties",
    summary = "List all faculties",
    responses((status = 200, description = "All faculties in id order", body = Vec<FacultyResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_faculties(
    State(state): State<AppState>,
) -> Result<Json<Vec<FacultyResponse>>, AppError> {
    Ok(to_responses(FacultyService::new(&state.db).list_all().await?))
}

#[utoipa::path(
    get,
    path = "/faculty/filtered",
    tag = "Faculties",
    operation_id = "filterFacultiesByColor",
    summary = "Faculties of an exact color",
    params(ColorQuery),
    responses(
        (status = 200, description = "Matching faculties", body = Vec<FacultyResponse>),
        (status = 400, description = "Missing color (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(color = %query.color))]
pub async fn filter_faculties_by_color(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ColorQuery>,
) -> Result<Json<Vec<FacultyResponse>>, AppError> {
    Ok(to_responses(
        FacultyService::new(&state.db)
            .find_by_color(&query.color)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/faculty/by-color-or-name",
    tag = "Faculties",
    operation_id = "facultiesByColorOrName",
    summary = "Search faculties by color or name",
    description = "Case-insensitive substring match of `colorOrName` against both the color and \
        the name.",
    params(ColorOrNameQuery),
    responses(
        (status = 200, description = "Matching faculties", body = Vec<FacultyResponse>),
        (status = 400, description = "Missing colorOrName (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(term = %query.color_or_name))]
pub async fn faculties_by_color_or_name(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ColorOrNameQuery>,
) -> Result<Json<Vec<FacultyResponse>>, AppError> {
    Ok(to_responses(
        FacultyService::new(&state.db)
            .find_by_color_or_name(&query.color_or_name)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/faculty/by-student",
    tag = "Faculties",
    operation_id = "facultyByStudent",
    summary = "Faculty of a student",
    params(StudentIdQuery),
    responses(
        (status = 200, description = "The student's faculty", body = FacultyResponse),
        (status = 404, description = "Student not found or has no faculty (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(student_id = query.student_id))]
pub async fn faculty_by_student(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<StudentIdQuery>,
) -> Result<Json<FacultyResponse>, AppError> {
    let model = FacultyService::new(&state.db)
        .find_by_student(query.student_id)
        .await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/faculty/longest-name",
    tag = "Faculties",
    operation_id = "longestFacultyName",
    summary = "The longest faculty name",
    responses(
        (status = 200, description = "Longest name", body = String, content_type = "text/plain"),
        (status = 404, description = "No faculties (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn longest_faculty_name(State(state): State<AppState>) -> Result<String, AppError> {
    FacultyService::new(&state.db).longest_name().await
}
