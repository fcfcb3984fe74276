use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use validator::Validate;

use classroom_core::errors::validation_messages;
use classroom_core::messages::{EMAIL_TAKEN, ID_MISMATCH};
use classroom_core::{AppError, Page, PageOptions};
use classroom_models::ids::StudentId;
use classroom_models::value_types::Email;
use classroom_observability::track_student_created;

use crate::modules::storage_error;
use crate::modules::students::model::{
    CreateStudentDto, Student, StudentChanges, StudentDto, UpdateStudentDto,
};
use crate::modules::students::repository::StudentRepository;

pub(crate) const ENTITY: &str = "Student";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn find_all(db: &PgPool, options: PageOptions) -> Result<Page<StudentDto>, AppError> {
        let (students, item_count) = StudentRepository::find_page(db, &options)
            .await
            .map_err(storage_error(ENTITY))?;

        Ok(Page::new(students, &options, item_count).map(StudentDto::from))
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: StudentId) -> Result<StudentDto, AppError> {
        Self::load(db, id).await.map(StudentDto::from)
    }

    /// Loads the entity or fails with 404.
    pub(crate) async fn load(db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        StudentRepository::find_by_id(db, id)
            .await
            .map_err(storage_error(ENTITY))?
            .ok_or_else(|| AppError::not_found(anyhow!("Student by id not found")))
    }

    /// Field rules plus email uniqueness. An empty list means the payload
    /// may be written.
    #[instrument(skip(db, dto))]
    pub async fn validate_for_insert(
        db: &PgPool,
        dto: &CreateStudentDto,
    ) -> Result<Vec<String>, AppError> {
        let mut errors = match dto.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation_messages(&e),
        };

        match Email::parse(&dto.fields.email) {
            Ok(email) => {
                if StudentRepository::exists_by_email(db, &email, None)
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

    /// Like [`Self::validate_for_insert`], ignoring the student being
    /// updated in the uniqueness check.
    #[instrument(skip(db, dto))]
    pub async fn validate_for_update(
        db: &PgPool,
        id: StudentId,
        dto: &UpdateStudentDto,
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
                if StudentRepository::exists_by_email(db, &email, Some(id))
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
    pub async fn create(db: &PgPool, dto: CreateStudentDto) -> Result<StudentDto, AppError> {
        let new_student = StudentRepository::create(dto).map_err(AppError::bad_request)?;

        let student = StudentRepository::save(db, &new_student)
            .await
            .map_err(storage_error(ENTITY))?;

        tracing::info!(student_id = %student.id, "Student created");
        track_student_created();

        Ok(student.into())
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<StudentDto, AppError> {
        let changes = StudentChanges::try_from(dto).map_err(AppError::bad_request)?;

        let student = StudentRepository::update(db, id, &changes)
            .await
            .map_err(storage_error(ENTITY))?
            .ok_or_else(|| AppError::not_found(anyhow!("Student by id not found")))?;

        Ok(student.into())
    }

    #[instrument(skip(db))]
    pub async fn remove(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let removed = StudentRepository::remove(db, id)
            .await
            .map_err(storage_error(ENTITY))?;

        if !removed {
            return Err(AppError::not_found(anyhow!("Student by id not found")));
        }

        Ok(())
    }
}
