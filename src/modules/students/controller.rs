use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use classroom_core::errors::ErrorResponse;
use classroom_core::{AppError, Page, PageOptions};
use classroom_models::ids::StudentId;

use crate::modules::students::model::{CreateStudentDto, StudentDto, UpdateStudentDto};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::{AppJson, AppPath, AppQuery};

#[utoipa::path(
    get,
    path = "/api/students",
    params(PageOptions),
    responses(
        (status = 200, description = "Page of students", body = Page<StudentDto>),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    AppQuery(options): AppQuery<PageOptions>,
) -> Result<Json<Page<StudentDto>>, AppError> {
    let page = StudentService::find_all(&state.db, options).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentDto),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    AppPath(id): AppPath<StudentId>,
) -> Result<Json<StudentDto>, AppError> {
    let student = StudentService::find_by_id(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = StudentDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email already stored", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<StudentDto>), AppError> {
    let errors = StudentService::validate_for_insert(&state.db, &dto).await?;
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let student = StudentService::create(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = StudentDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Email already stored", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    AppPath(id): AppPath<StudentId>,
    AppJson(dto): AppJson<UpdateStudentDto>,
) -> Result<Json<StudentDto>, AppError> {
    StudentService::find_by_id(&state.db, id).await?;

    let errors = StudentService::validate_for_update(&state.db, id, &dto).await?;
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let student = StudentService::update(&state.db, id, dto).await?;

    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    AppPath(id): AppPath<StudentId>,
) -> Result<StatusCode, AppError> {
    StudentService::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
