pub mod classes;
pub mod students;
pub mod teachers;

use classroom_core::{AppError, storage};
use classroom_observability::track_storage_error;

/// Maps a database error raised while working on `entity`, counting
/// constraint and connection failures.
pub(crate) fn storage_error(entity: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| {
        let kind = storage::classify(&err);
        if kind.status().is_client_error() || kind.is_retryable() {
            track_storage_error(entity, kind.as_str());
        }
        AppError::storage(entity, err)
    }
}
