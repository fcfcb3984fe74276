use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use validator::Validate;

use classroom_core::errors::validation_messages;
use classroom_core::messages::{EMAIL_TAKEN, ID_MISMATCH};
use classroom_core::{AppError, Page, PageOptions};
use classroom_models::classes::ClassDto;
use classroom_models::ids::TeacherId;
use classroom_models::value_types::Email;
use classroom_observability::track_teacher_created;

use crate::modules::storage_error;
use crate::modules::teachers::model::{
    CreateTeacherDto, Teacher, TeacherChanges, TeacherDto, UpdateTeacherDto,
};
use crate::modules::teachers::repository::TeacherRepository;

pub(crate) const ENTITY: &str = "Teacher";

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn find_all(db: &PgPool, options: PageOptions) -> Result<Page<TeacherDto>, AppError> {
        let (teachers, item_count) = TeacherRepository::find_page(db, &options)
            .await
            .map_err(storage_error(ENTITY))?;

        Ok(Page::new(teachers, &options, item_count).map(TeacherDto::from))
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: TeacherId) -> Result<TeacherDto, AppError> {
        Self::load(db, id).await.map(TeacherDto::from)
    }

    /// Loads the entity or fails with 404.
    pub(crate) async fn load(db: &PgPool, id: TeacherId) -> Result<Teacher, AppError> {
        TeacherRepository::find_by_id(db, id)
            .await
            .map_err(storage_error(ENTITY))?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher by id not found")))
    }

    /// Field rules plus email uniqueness. An empty list means the payload
    /// may be written.
    #[instrument(skip(db, dto))]
    pub async fn validate_for_insert(
        db: &PgPool,
        dto: &CreateTeacherDto,
    ) -> Result<Vec<String>, AppError> {
        let mut errors = match dto.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation_messages(&e),
        };

        match Email::parse(&dto.fields.email) {
            Ok(email) => {
                if TeacherRepository::exists_by_email(db, &email, None)
                    .await
                    .map_err(storage_error(ENTITY))?
                {
                    errors.push(EMAIL_TAKEN.to_string());
                }
            }
            // The field rules accepted a value normalization rejects.
            Err(e) if errors.is_empty() => errors.push(e.to_string()),
            Err(_) => {}
        }

        Ok(errors)
    }

    /// Like [`Self::validate_for_insert`], ignoring the teacher being
    /// updated in the uniqueness check.
    #[instrument(skip(db, dto))]
    pub async fn validate_for_update(
        db: &PgPool,
        id: TeacherId,
        dto: &UpdateTeacherDto,
    ) -> Result<Vec<String>, AppError> {
        let mut errors = match dto.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation_messages(&e),
        };

        if dto.id.is_some_and(|body_id| body_id != id) {
            errors.push(ID_MISMATCH.to_string());
        }

        match Email::parse(&dto.fields.email) {
            Ok(email) => {
                if TeacherRepository::exists_by_email(db, &email, Some(id))
                    .await
                    .map_err(storage_error(ENTITY))?
                {
                    errors.push(EMAIL_TAKEN.to_string());
                }
            }
            // The field rules accepted a value normalization rejects.
            Err(e) if errors.is_empty() => errors.push(e.to_string()),
            Err(_) => {}
        }

        Ok(errors)
    }

    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: CreateTeacherDto) -> Result<TeacherDto, AppError> {
        let new_teacher = TeacherRepository::create(dto).map_err(AppError::bad_request)?;

        let teacher = TeacherRepository::save(db, &new_teacher)
            .await
            .map_err(storage_error(ENTITY))?;

        tracing::info!(teacher_id = %teacher.id, "Teacher created");
        track_teacher_created();

        Ok(teacher.into())
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: TeacherId,
        dto: UpdateTeacherDto,
    ) -> Result<TeacherDto, AppError> {
        let changes = TeacherChanges::try_from(dto).map_err(AppError::bad_request)?;

        let teacher = TeacherRepository::update(db, id, &changes)
            .await
            .map_err(storage_error(ENTITY))?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher by id not found")))?;

        Ok(teacher.into())
    }

    #[instrument(skip(db))]
    pub async fn remove(db: &PgPool, id: TeacherId) -> Result<(), AppError> {
        let removed = TeacherRepository::remove(db, id)
            .await
            .map_err(storage_error(ENTITY))?;

        if !removed {
            return Err(AppError::not_found(anyhow!("Teacher by id not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn find_classes(db: &PgPool, id: TeacherId) -> Result<Vec<ClassDto>, AppError> {
        Self::load(db, id).await?;

        let classes = TeacherRepository::find_classes(db, id)
            .await
            .map_err(storage_error(ENTITY))?;

        Ok(classes.into_iter().map(ClassDto::from).collect())
    }
}
