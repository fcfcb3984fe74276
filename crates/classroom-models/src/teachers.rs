//! Teacher domain models and DTOs.
//!
//! Mapping between the persisted [`Teacher`] row and the API shapes is
//! explicit: `Teacher -> TeacherDto` for responses, `CreateTeacherDto ->
//! NewTeacher` for inserts (the id is assigned by the database) and
//! `UpdateTeacherDto -> TeacherChanges` for updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::TeacherId;
use crate::validation::not_blank;
use crate::value_types::{Email, ValueTypeError};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub is_active: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeacherDto {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable teacher fields shared by create and update payloads.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TeacherFields {
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
pub struct CreateTeacherDto {
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: TeacherFields,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    /// Must match the id in the path when present.
    #[serde(default)]
    pub id: Option<TeacherId>,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: TeacherFields,
}

/// A teacher ready to insert, with normalized email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeacher {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub is_active: bool,
}

/// Replacement values for an existing teacher. `is_active: None` keeps the
/// stored flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub is_active: Option<bool>,
}

impl From<Teacher> for TeacherDto {
    fn from(teacher: Teacher) -> Self {
        Self {
            id: teacher.id,
            first_name: teacher.first_name,
            last_name: teacher.last_name,
            email: teacher.email.into_inner(),
            is_active: teacher.is_active,
            created_at: teacher.created_at,
            updated_at: teacher.updated_at,
        }
    }
}

impl TryFrom<CreateTeacherDto> for NewTeacher {
    type Error = ValueTypeError;

    fn try_from(dto: CreateTeacherDto) -> Result<Self, Self::Error> {
        let TeacherFields {
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

impl TryFrom<UpdateTeacherDto> for TeacherChanges {
    type Error = ValueTypeError;

    fn try_from(dto: UpdateTeacherDto) -> Result<Self, Self::Error> {
        let TeacherFields {
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
