use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppQuery};
use crate::models::student::*;
use crate::service::StudentService;
use crate::state::AppState;

fn service(state: &AppState) -> StudentService<'_> {
    StudentService::new(&state.db, state.avatar_store.as_ref())
}

fn to_responses(models: Vec<crate::entity::student::Model>) -> Json<Vec<StudentResponse>> {
    Json(models.into_iter().map(StudentResponse::from).collect())
}

#[utoipa::path(
    post,
    path = "/student",
    tag = "Students",
    operation_id = "createStudent",
    summary = "Create a student",
    description = "Creates a student. `faculty_id`, when given, must reference an existing faculty \
        and cannot be changed afterwards.",
    request_body = CreateStudentRequest,
    responses(
        (status = 200, description = "Student created", body = StudentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Faculty not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_student(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateStudentRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    validate_create_student(&payload)?;
    let model = service(&state).create(payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/student/{id}",
    tag = "Students",
    operation_id = "updateStudent",
    summary = "Update a student's name and age",
    params(("id" = i32, Path, description = "Student ID")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    validate_update_student(&payload)?;
    let model = service(&state).update(id, payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/student/{id}",
    tag = "Students",
    operation_id = "deleteStudent",
    summary = "Delete a student",
    description = "Deletes the student together with its avatar and returns the deleted student.",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = StudentResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudentResponse>, AppError> {
    let model = service(&state).delete(id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/student/{id}",
    tag = "Students",
    operation_id = "getStudent",
    summary = "Get a student by ID",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudentResponse>, AppError> {
    let model = service(&state).get_by_id(id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/student",
    tag = "Students",
    operation_id = "listStudents",
    summary = "List all students",
    responses((status = 200, description = "All students in id order", body = Vec<StudentResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    Ok(to_responses(service(&state).list_all().await?))
}

#[utoipa::path(
    get,
    path = "/student/filtered",
    tag = "Students",
    operation_id = "filterStudentsByAge",
    summary = "Students of an exact age",
    params(AgeQuery),
    responses(
        (status = 200, description = "Matching students", body = Vec<StudentResponse>),
        (status = 400, description = "Missing or invalid age (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(age = query.age))]
pub async fn filter_students_by_age(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AgeQuery>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    Ok(to_responses(service(&state).find_by_age(query.age).await?))
}

#[utoipa::path(
    get,
    path = "/student/age-between",
    tag = "Students",
    operation_id = "studentsByAgeRange",
    summary = "Students with age in [min, max]",
    params(AgeRangeQuery),
    responses(
        (status = 200, description = "Matching students", body = Vec<StudentResponse>),
        (status = 400, description = "Missing or invalid bounds (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(min = query.min, max = query.max))]
pub async fn students_by_age_between(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AgeRangeQuery>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    Ok(to_responses(
        service(&state)
            .find_by_age_between(query.min, query.max)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/student/by-faculty",
    tag = "Students",
    operation_id = "studentsByFaculty",
    summary = "Students of a faculty",
    params(FacultyIdQuery),
    responses(
        (status = 200, description = "Students of the faculty", body = Vec<StudentResponse>),
        (status = 404, description = "Faculty not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(faculty_id = query.faculty_id))]
pub async fn students_by_faculty(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FacultyIdQuery>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    Ok(to_responses(
        service(&state).find_by_faculty(query.faculty_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/student/count",
    tag = "Student Statistics",
    operation_id = "countStudents",
    summary = "Number of students",
    responses((status = 200, description = "Student count", body = u64)),
)]
#[instrument(skip(state))]
pub async fn count_students(State(state): State<AppState>) -> Result<Json<u64>, AppError> {
    Ok(Json(service(&state).count().await?))
}

#[utoipa::path(
    get,
    path = "/student/average-age",
    tag = "Student Statistics",
    operation_id = "averageAge",
    summary = "Average student age (database aggregate)",
    responses(
        (status = 200, description = "Average age", body = f64),
        (status = 404, description = "No students (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn average_age(State(state): State<AppState>) -> Result<Json<f64>, AppError> {
    Ok(Json(service(&state).average_age().await?))
}

#[utoipa::path(
    get,
    path = "/student/average-age-computed",
    tag = "Student Statistics",
    operation_id = "averageAgeComputed",
    summary = "Average student age (computed over loaded rows)",
    responses(
        (status = 200, description = "Average age", body = f64),
        (status = 404, description = "No students (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn average_age_computed(State(state): State<AppState>) -> Result<Json<f64>, AppError> {
    Ok(Json(service(&state).average_age_computed().await?))
}

#[utoipa::path(
    get,
    path = "/student/last-five",
    tag = "Student Statistics",
    operation_id = "lastFiveStudents",
    summary = "The five most recently created students",
    description = "Ordered by id, descending.",
    responses((status = 200, description = "Up to five students", body = Vec<StudentResponse>)),
)]
#[instrument(skip(state))]
pub async fn last_five_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    Ok(to_responses(service(&state).last_five().await?))
}

#[utoipa::path(
    get,
    path = "/student/names-starting-with",
    tag = "Student Statistics",
    operation_id = "studentNamesStartingWith",
    summary = "Names starting with a letter",
    description = "Case-insensitive for ASCII letters.",
    params(LetterQuery),
    responses(
        (status = 200, description = "Matching names in id order", body = Vec<String>),
        (status = 400, description = "letter is not a single character (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(letter = %query.letter))]
pub async fn names_starting_with(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LetterQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let letter = query.single_char()?;
    Ok(Json(service(&state).names_starting_with(letter).await?))
}
