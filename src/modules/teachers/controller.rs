use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use classroom_core::errors::ErrorResponse;
use classroom_core::{AppError, Page, PageOptions};
use classroom_models::classes::ClassDto;
use classroom_models::ids::TeacherId;

use crate::modules::teachers::model::{CreateTeacherDto, TeacherDto, UpdateTeacherDto};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::validator::{AppJson, AppPath, AppQuery};

#[utoipa::path(
    get,
    path = "/api/teachers",
    params(PageOptions),
    responses(
        (status = 200, description = "Page of teachers", body = Page<TeacherDto>),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    AppQuery(options): AppQuery<PageOptions>,
) -> Result<Json<Page<TeacherDto>>, AppError> {
    let page = TeacherService::find_all(&state.db, options).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = i64, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher details", body = TeacherDto),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    AppPath(id): AppPath<TeacherId>,
) -> Result<Json<TeacherDto>, AppError> {
    let teacher = TeacherService::find_by_id(&state.db, id).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = TeacherDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email already stored", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<TeacherDto>), AppError> {
    let errors = TeacherService::validate_for_insert(&state.db, &dto).await?;
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let teacher = TeacherService::create(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(teacher)))
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = i64, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 409, description = "Email already stored", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    AppPath(id): AppPath<TeacherId>,
    AppJson(dto): AppJson<UpdateTeacherDto>,
) -> Result<Json<TeacherDto>, AppError> {
    TeacherService::find_by_id(&state.db, id).await?;

    let errors = TeacherService::validate_for_update(&state.db, id, &dto).await?;
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let teacher = TeacherService::update(&state.db, id, dto).await?;

    Ok(Json(teacher))
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(("id" = i64, Path, description = "Teacher ID")),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 409, description = "Teacher still assigned to a class", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    AppPath(id): AppPath<TeacherId>,
) -> Result<StatusCode, AppError> {
    TeacherService::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/classes",
    params(("id" = i64, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Classes taught by the teacher", body = Vec<ClassDto>),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher_classes(
    State(state): State<AppState>,
    AppPath(id): AppPath<TeacherId>,
) -> Result<Json<Vec<ClassDto>>, AppError> {
    let classes = TeacherService::find_classes(&state.db, id).await?;
    Ok(Json(classes))
}
