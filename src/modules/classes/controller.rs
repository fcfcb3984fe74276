use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use classroom_core::errors::ErrorResponse;
use classroom_core::{AppError, Page, PageOptions};
use classroom_models::ids::ClassId;
use classroom_models::students::StudentDto;
use classroom_models::teachers::TeacherDto;

use crate::modules::classes::model::{
    AssignStudentDto, AssignTeacherDto, ClassDto, CreateClassDto, UpdateClassDto,
};
use crate::modules::classes::service::ClassService;
use crate::state::AppState;
use crate::validator::{AppJson, AppPath, AppQuery, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/classes",
    params(PageOptions),
    responses(
        (status = 200, description = "Page of classes", body = Page<ClassDto>),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_classes(
    State(state): State<AppState>,
    AppQuery(options): AppQuery<PageOptions>,
) -> Result<Json<Page<ClassDto>>, AppError> {
    let page = ClassService::find_all(&state.db, options).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = ClassDto),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    AppPath(id): AppPath<ClassId>,
) -> Result<Json<ClassDto>, AppError> {
    let class = ClassService::find_by_id(&state.db, id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = ClassDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Name already stored", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreateClassDto>,
) -> Result<(StatusCode, Json<ClassDto>), AppError> {
    let errors = ClassService::validate_for_insert(&state.db, &dto).await?;
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let class = ClassService::create(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = ClassDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Name already stored", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    AppPath(id): AppPath<ClassId>,
    AppJson(dto): AppJson<UpdateClassDto>,
) -> Result<Json<ClassDto>, AppError> {
    ClassService::find_by_id(&state.db, id).await?;

    let errors = ClassService::validate_for_update(&state.db, id, &dto).await?;
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let class = ClassService::update(&state.db, id, dto).await?;

    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 204, description = "Class and its enrolments deleted"),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    AppPath(id): AppPath<ClassId>,
) -> Result<StatusCode, AppError> {
    ClassService::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/classes/{id}/assign-teacher",
    params(("id" = i64, Path, description = "Class ID")),
    request_body = AssignTeacherDto,
    responses(
        (status = 204, description = "Teacher assigned"),
        (status = 400, description = "Invalid teacher id", body = ErrorResponse),
        (status = 404, description = "Class or teacher not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn assign_teacher(
    State(state): State<AppState>,
    AppPath(id): AppPath<ClassId>,
    ValidatedJson(dto): ValidatedJson<AssignTeacherDto>,
) -> Result<StatusCode, AppError> {
    ClassService::add_teacher(&state.db, id, dto.teacher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/assign-teacher",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Assigned teacher, or null", body = Option<TeacherDto>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class_teacher(
    State(state): State<AppState>,
    AppPath(id): AppPath<ClassId>,
) -> Result<Json<Option<TeacherDto>>, AppError> {
    let teacher = ClassService::find_teacher(&state.db, id).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    post,
    path = "/api/classes/{id}/assign-students",
    params(("id" = i64, Path, description = "Class ID")),
    request_body = AssignStudentDto,
    responses(
        (status = 204, description = "Student enrolled"),
        (status = 400, description = "Invalid student id", body = ErrorResponse),
        (status = 404, description = "Class or student not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn assign_student(
    State(state): State<AppState>,
    AppPath(id): AppPath<ClassId>,
    ValidatedJson(dto): ValidatedJson<AssignStudentDto>,
) -> Result<StatusCode, AppError> {
    ClassService::add_student(&state.db, id, dto.student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/assign-students",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (
            status = 200,
            description = "Enrolled students, one entry per enrolment",
            body = Vec<StudentDto>
        ),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class_students(
    State(state): State<AppState>,
    AppPath(id): AppPath<ClassId>,
) -> Result<Json<Vec<StudentDto>>, AppError> {
    let students = ClassService::find_students(&state.db, id).await?;
    Ok(Json(students))
}
