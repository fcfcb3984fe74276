//! Classification of database errors.
//!
//! Repositories pre-check uniqueness before writing, but the unique and
//! foreign-key constraints in the schema remain the final authority. When a
//! constraint fires anyway (two concurrent creates with the same email, a
//! delete of a teacher who still owns classes) the raw driver error is
//! translated here into a category the HTTP layer can report without
//! leaking driver text.

use axum::http::StatusCode;

use crate::messages::{EMAIL_TAKEN, NAME_TAKEN};

/// Client-facing category of a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// A query that expected a row found none.
    NotFound,
    /// Unique constraint violation (`23505`).
    UniqueViolation,
    /// Foreign key violation (`23503`), e.g. deleting a referenced row.
    ForeignKeyViolation,
    /// The database could not be reached in time. Safe to retry.
    Unavailable,
    /// Anything else.
    Unexpected,
}

impl StorageErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UniqueViolation | Self::ForeignKeyViolation => StatusCode::CONFLICT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Connection-class failures may succeed on a later attempt; constraint
    /// violations never will.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Unavailable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::UniqueViolation => "unique_violation",
            Self::ForeignKeyViolation => "foreign_key_violation",
            Self::Unavailable => "unavailable",
            Self::Unexpected => "unexpected",
        }
    }
}

pub fn classify(err: &sqlx::Error) -> StorageErrorKind {
    match err {
        sqlx::Error::RowNotFound => StorageErrorKind::NotFound,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StorageErrorKind::UniqueViolation
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            StorageErrorKind::ForeignKeyViolation
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageErrorKind::Unavailable,
        _ => StorageErrorKind::Unexpected,
    }
}

/// Name of the violated constraint, if the driver reported one.
pub fn constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Message shown to clients for a conflict. Derived from the constraint
/// name only, never from the driver message.
pub fn conflict_message(kind: StorageErrorKind, constraint: Option<&str>) -> String {
    match kind {
        StorageErrorKind::UniqueViolation => match constraint {
            Some(name) if name.contains("email") => EMAIL_TAKEN.to_string(),
            Some(name) if name.contains("name") => NAME_TAKEN.to_string(),
            _ => "A record with the same unique value already exists".to_string(),
        },
        StorageErrorKind::ForeignKeyViolation => {
            "The record is still referenced by other records".to_string()
        }
        _ => "Conflicting change".to_string(),
    }
}
