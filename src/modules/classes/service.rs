use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use validator::Validate;

use classroom_core::errors::validation_messages;
use classroom_core::messages::{ID_MISMATCH, NAME_TAKEN};
use classroom_core::{AppError, Page, PageOptions};
use classroom_models::ids::{ClassId, StudentId, TeacherId};
use classroom_models::students::StudentDto;
use classroom_models::teachers::TeacherDto;
use classroom_models::value_types::ClassName;
use classroom_observability::{
    track_class_created, track_student_enrolled, track_teacher_assigned,
};

use crate::modules::classes::model::{
    Class, ClassChanges, ClassDto, CreateClassDto, UpdateClassDto,
};
use crate::modules::classes::repository::ClassRepository;
use crate::modules::storage_error;
use crate::modules::students::service::StudentService;
use crate::modules::teachers::service::TeacherService;

const ENTITY: &str = "Class";

fn class_not_found() -> AppError {
    AppError::not_found(anyhow!("Class by id not found"))
}

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db))]
    pub async fn find_all(db: &PgPool, options: PageOptions) -> Result<Page<ClassDto>, AppError> {
        let (classes, item_count) = ClassRepository::find_page(db, &options)
            .await
            .map_err(storage_error(ENTITY))?;

        Ok(Page::new(classes, &options, item_count).map(ClassDto::from))
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: ClassId) -> Result<ClassDto, AppError> {
        Self::load(db, id).await.map(ClassDto::from)
    }

    pub(crate) async fn load(db: &PgPool, id: ClassId) -> Result<Class, AppError> {
        ClassRepository::find_by_id(db, id)
            .await
            .map_err(storage_error(ENTITY))?
            .ok_or_else(class_not_found)
    }

    /// Field rules plus case-insensitive name uniqueness.
    #[instrument(skip(db, dto))]
    pub async fn validate_for_insert(
        db: &PgPool,
        dto: &CreateClassDto,
    ) -> Result<Vec<String>, AppError> {
        let mut errors = match dto.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation_messages(&e),
        };

        match ClassName::parse(&dto.fields.name) {
            Ok(name) => {
                if ClassRepository::exists_by_name(db, &name, None)
                    .await
                    .map_err(storage_error(ENTITY))?
                {
                    errors.push(NAME_TAKEN.to_string());
                }
            }
            // The field rules accepted a value normalization rejects.
            Err(e) if errors.is_empty() => errors.push(e.to_string()),
            Err(_) => {}
        }

        Ok(errors)
    }

    #[instrument(skip(db, dto))]
    pub async fn validate_for_update(
        db: &PgPool,
        id: ClassId,
        dto: &UpdateClassDto,
    ) -> Result<Vec<String>, AppError> {
        let mut errors = match dto.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation_messages(&e),
        };

        if dto.id.is_some_and(|body_id| body_id != id) {
            errors.push(ID_MISMATCH.to_string());
        }

        match ClassName::parse(&dto.fields.name) {
            Ok(name) => {
                if ClassRepository::exists_by_name(db, &name, Some(id))
                    .await
                    .map_err(storage_error(ENTITY))?
                {
                    errors.push(NAME_TAKEN.to_string());
                }
            }
            // The field rules accepted a value normalization rejects.
            Err(e) if errors.is_empty() => errors.push(e.to_string()),
            Err(_) => {}
        }

        Ok(errors)
    }

    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: CreateClassDto) -> Result<ClassDto, AppError> {
        let new_class = ClassRepository::create(dto).map_err(AppError::bad_request)?;

        let class = ClassRepository::save(db, &new_class)
            .await
            .map_err(storage_error(ENTITY))?;

        tracing::info!(class_id = %class.id, "Class created");
        track_class_created();

        Ok(class.into())
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<ClassDto, AppError> {
        let changes = ClassChanges::try_from(dto).map_err(AppError::bad_request)?;

        let class = ClassRepository::update(db, id, &changes)
            .await
            .map_err(storage_error(ENTITY))?
            .ok_or_else(class_not_found)?;

        Ok(class.into())
    }

    #[instrument(skip(db))]
    pub async fn remove(db: &PgPool, id: ClassId) -> Result<(), AppError> {
        let removed = ClassRepository::remove(db, id)
            .await
            .map_err(storage_error(ENTITY))?;

        if !removed {
            return Err(class_not_found());
        }

        Ok(())
    }

    /// Makes `teacher_id` the class's only teacher, replacing any previous
    /// assignment.
    #[instrument(skip(db))]
    pub async fn add_teacher(
        db: &PgPool,
        id: ClassId,
        teacher_id: TeacherId,
    ) -> Result<(), AppError> {
        Self::load(db, id).await?;
        TeacherService::load(db, teacher_id).await?;

        ClassRepository::set_teacher(db, id, teacher_id)
            .await
            .map_err(storage_error(ENTITY))?
            .ok_or_else(class_not_found)?;

        tracing::info!(class_id = %id, teacher_id = %teacher_id, "Teacher assigned to class");
        track_teacher_assigned();

        Ok(())
    }

    /// Enrols the student. Enrolling the same student again adds another
    /// row.
    #[instrument(skip(db))]
    pub async fn add_student(
        db: &PgPool,
        id: ClassId,
        student_id: StudentId,
    ) -> Result<(), AppError> {
        Self::load(db, id).await?;
        StudentService::load(db, student_id).await?;

        let enrolment = ClassRepository::add_student(db, id, student_id)
            .await
            .map_err(storage_error(ENTITY))?;

        tracing::info!(
            class_id = %enrolment.class_id,
            student_id = %enrolment.student_id,
            "Student enrolled in class"
        );
        track_student_enrolled();

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn find_teacher(db: &PgPool, id: ClassId) -> Result<Option<TeacherDto>, AppError> {
        let (_, teacher) = ClassRepository::with_teacher(db, id)
            .await
            .map_err(storage_error(ENTITY))?
            .ok_or_else(class_not_found)?;

        Ok(teacher.map(TeacherDto::from))
    }

    #[instrument(skip(db))]
    pub async fn find_students(db: &PgPool, id: ClassId) -> Result<Vec<StudentDto>, AppError> {
        let (_, students) = ClassRepository::with_students(db, id)
            .await
            .map_err(storage_error(ENTITY))?
            .ok_or_else(class_not_found)?;

        Ok(students.into_iter().map(StudentDto::from).collect())
    }
}
