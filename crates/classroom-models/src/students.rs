//! Student domain models and DTOs.
//!
//! Students mirror teachers field for field; classes reference them through
//! the `class_students` join table.
//!
//! Mapping between the persisted [`Student`] row and the API shapes is
//! explicit: `Student -> StudentDto` for responses, `CreateStudentDto ->
//! NewStudent` for inserts (the id is assigned by the database) and
//! `UpdateStudentDto -> StudentChanges` for updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::StudentId;
use crate::validation::not_blank;
use crate::value_types::{Email, ValueTypeError};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub is_active: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentDto {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable student fields shared by create and update payloads.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StudentFields {
    #[validate(
        custom(
            function = "not_blank",
            message = "first_name must be between 1 and 100 characters"
        ),
        length(max = 100, message = "first_name must be between 1 and 100 characters")
    )]
    pub first_name: String,
    #[validate(
        custom(
            function = "not_blank",
            message = "last_name must be between 1 and 100 characters"
        ),
        length(max = 100, message = "last_name must be between 1 and 100 characters")
    )]
    pub last_name: String,
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 100, message = "email must be at most 100 characters")
    )]
    pub email: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: StudentFields,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    /// Must match the id in the path when present.
    #[serde(default)]
    pub id: Option<StudentId>,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: StudentFields,
}

/// A student ready to insert, with normalized email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub is_active: bool,
}

/// Replacement values for an existing student. `is_active: None` keeps the
/// stored flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub is_active: Option<bool>,
}

impl From<Student> for StudentDto {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email.into_inner(),
            is_active: student.is_active,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

impl TryFrom<CreateStudentDto> for NewStudent {
    type Error = ValueTypeError;

    fn try_from(dto: CreateStudentDto) -> Result<Self, Self::Error> {
        let StudentFields {
            first_name,
            last_name,
            email,
            is_active,
        } = dto.fields;

        Ok(Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: Email::parse(&email)?,
            is_active: is_active.unwrap_or(true),
        })
    }
}

impl TryFrom<UpdateStudentDto> for StudentChanges {
    type Error = ValueTypeError;

    fn try_from(dto: UpdateStudentDto) -> Result<Self, Self::Error> {
        let StudentFields {
            first_name,
            last_name,
            email,
            is_active,
        } = dto.fields;

        Ok(Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: Email::parse(&email)?,
            is_active,
        })
    }
}
