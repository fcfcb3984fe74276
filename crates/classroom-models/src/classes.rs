//! Class domain models and DTOs.
//!
//! A class has at most one teacher (`classes.teacher_id`) and any number of
//! students through `class_students`. The join table has no uniqueness on
//! the pair, so [`ClassStudent`] rows may repeat a student.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::ids::{ClassId, StudentId, TeacherId};
use crate::validation::{not_blank, with_message};
use crate::value_types::{ClassName, ValueTypeError};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Class {
    pub id: ClassId,
    pub name: ClassName,
    pub description: String,
    pub teacher_id: Option<TeacherId>,
    pub is_active: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ClassStudent {
    pub id: i64,
    pub class_id: ClassId,
    pub student_id: StudentId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassDto {
    pub id: ClassId,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ClassFields {
    #[validate(
        custom(
            function = "not_blank",
            message = "name must be between 1 and 100 characters"
        ),
        length(max = 100, message = "name must be between 1 and 100 characters")
    )]
    pub name: String,
    #[validate(length(min = 1, message = "description should not be empty"))]
    pub description: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: ClassFields,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    /// Must match the id in the path when present.
    #[serde(default)]
    pub id: Option<ClassId>,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: ClassFields,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignTeacherDto {
    pub teacher_id: TeacherId,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignStudentDto {
    pub student_id: StudentId,
}

fn require_positive(field: &'static str, value: i64) -> Result<(), ValidationErrors> {
    if value > 0 {
        return Ok(());
    }
    let mut errors = ValidationErrors::new();
    errors.add(
        field,
        with_message("range", format!("{field} must be a positive number")),
    );
    Err(errors)
}

impl Validate for AssignTeacherDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        require_positive("teacher_id", self.teacher_id.into_inner())
    }
}

impl Validate for AssignStudentDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        require_positive("student_id", self.student_id.into_inner())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub name: ClassName,
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassChanges {
    pub name: ClassName,
    pub description: String,
    pub is_active: Option<bool>,
}

impl From<Class> for ClassDto {
    fn from(class: Class) -> Self {
        Self {
            id: class.id,
            name: class.name.into_inner(),
            description: class.description,
            is_active: class.is_active,
            created_at: class.created_at,
            updated_at: class.updated_at,
        }
    }
}

impl TryFrom<CreateClassDto> for NewClass {
    type Error = ValueTypeError;

    fn try_from(dto: CreateClassDto) -> Result<Self, Self::Error> {
        Ok(Self {
            name: ClassName::parse(&dto.fields.name)?,
            description: dto.fields.description,
            is_active: dto.fields.is_active.unwrap_or(true),
        })
    }
}

impl TryFrom<UpdateClassDto> for ClassChanges {
    type Error = ValueTypeError;

    fn try_from(dto: UpdateClassDto) -> Result<Self, Self::Error> {
        Ok(Self {
            name: ClassName::parse(&dto.fields.name)?,
            description: dto.fields.description,
            is_active: dto.fields.is_active,
        })
    }
}
