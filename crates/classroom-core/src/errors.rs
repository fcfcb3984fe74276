use anyhow::Error;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::storage::{self, StorageErrorKind};

pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error, check server logs";
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable, please retry";

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub messages: Vec<String>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            messages: Vec::new(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unavailable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, err)
    }

    /// 400 carrying every validation message. The top-level `error` is the
    /// messages joined with `, `.
    pub fn validation(messages: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!(messages.join(", ")),
            messages,
        }
    }

    /// Classifies a database error raised while working on `entity`.
    ///
    /// Only the entity type, the constraint name and the category are
    /// logged. Row values never reach the log.
    pub fn storage(entity: &'static str, err: sqlx::Error) -> Self {
        let kind = storage::classify(&err);
        let constraint = storage::constraint(&err).map(str::to_owned);

        match kind {
            StorageErrorKind::UniqueViolation | StorageErrorKind::ForeignKeyViolation => {
                tracing::warn!(
                    entity,
                    constraint = constraint.as_deref().unwrap_or("unknown"),
                    kind = kind.as_str(),
                    "Storage constraint violated"
                );
            }
            StorageErrorKind::Unavailable => {
                tracing::warn!(entity, kind = kind.as_str(), "Database unavailable");
            }
            StorageErrorKind::Unexpected => {
                tracing::error!(
                    entity,
                    kind = kind.as_str(),
                    error = ?err,
                    "Unexpected storage error"
                );
            }
            StorageErrorKind::NotFound => {}
        }

        Self::from_sqlx(err)
    }

    fn from_sqlx(err: sqlx::Error) -> Self {
        let kind = storage::classify(&err);
        match kind {
            StorageErrorKind::UniqueViolation | StorageErrorKind::ForeignKeyViolation => {
                let message = storage::conflict_message(kind, storage::constraint(&err));
                Self::conflict(anyhow::anyhow!(message))
            }
            StorageErrorKind::NotFound => Self::not_found(anyhow::anyhow!("Record not found")),
            StorageErrorKind::Unavailable => Self::unavailable(err),
            StorageErrorKind::Unexpected => Self::internal(err),
        }
    }

    /// Whether the client may retry the same request.
    pub fn is_retryable(&self) -> bool {
        self.status == StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Flattens `validator` output into `field: message` strings, sorted so the
/// response is stable across runs.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.sort();
    messages
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"));
                    out.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.status {
            StatusCode::SERVICE_UNAVAILABLE => {
                tracing::warn!(error = %self.error, "Request failed with a retryable error");
                let body = Json(ErrorResponse {
                    error: UNAVAILABLE_MESSAGE.to_string(),
                    messages: Vec::new(),
                });
                (self.status, [(header::RETRY_AFTER, "1")], body).into_response()
            }
            status if status.is_server_error() => {
                tracing::error!(error = ?self.error, "Unexpected error");
                let body = Json(ErrorResponse {
                    error: UNEXPECTED_ERROR_MESSAGE.to_string(),
                    messages: Vec::new(),
                });
                (status, body).into_response()
            }
            status => {
                let body = Json(ErrorResponse {
                    error: self.error.to_string(),
                    messages: self.messages,
                });
                (status, body).into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        let error: Error = err.into();

        let error = match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => return Self::from_sqlx(sqlx_err),
            Err(error) => error,
        };

        if let Some(validation) = error.downcast_ref::<ValidationErrors>() {
            return Self::validation(validation_messages(validation));
        }

        AppError::internal(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::db_error;
    use http_body_util::BodyExt;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "First name is required"))]
        first_name: String,
        #[validate(email(message = "Email must be a valid email address"))]
        email: String,
    }

    #[tokio::test]
    async fn test_not_found_response_shape() {
        let response =
            AppError::not_found(anyhow::anyhow!("Teacher by id not found")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Teacher by id not found");
        assert!(json.get("messages").is_none());
    }

    #[tokio::test]
    async fn test_validation_joins_messages() {
        let error = AppError::validation(vec![
            "This email has already been used".to_string(),
            "First name is required".to_string(),
        ]);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            "This email has already been used, First name is required"
        );
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response =
            AppError::internal(anyhow::anyhow!("connection string leaked")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], UNEXPECTED_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_unavailable_sets_retry_after() {
        let response = AppError::from(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "1");
        let json = body_json(response).await;
        assert_eq!(json["error"], UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_unique_violation_becomes_conflict_without_driver_text() {
        let error = AppError::from(db_error("23505", Some("students_email_key")));
        assert_eq!(error.status, StatusCode::CONFLICT);
        assert!(!error.is_retryable());
        let json = body_json(error.into_response()).await;
        assert_eq!(json["error"], "This email has already been used");
        assert!(!json.to_string().contains("secret driver text"));
    }

    #[test]
    fn test_storage_foreign_key_violation_is_conflict() {
        let error = AppError::storage(
            "Teacher",
            db_error("23503", Some("classes_teacher_id_fkey")),
        );
        assert_eq!(error.status, StatusCode::CONFLICT);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_storage_unexpected_error_logs_entity() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let error = tracing::subscriber::with_default(subscriber, || {
            AppError::storage("Teacher", db_error("42P01", None))
        });

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        let output = logs.contents();
        assert!(output.contains("ERROR"));
        assert!(output.contains("Unexpected storage error"));
        assert!(output.contains("Teacher"));
        assert!(output.contains("unexpected"));
    }

    #[test]
    fn test_unclassified_database_error_is_internal() {
        let error = AppError::from(db_error("42P01", None));
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_errors_become_bad_request() {
        let sample = Sample {
            first_name: String::new(),
            email: "not-an-email".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        let error = AppError::from(errors);
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error.messages,
            vec![
                "Email must be a valid email address".to_string(),
                "First name is required".to_string(),
            ]
        );
    }

    #[test]
    fn test_other_errors_are_internal() {
        let error = AppError::from(std::io::Error::other("disk"));
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_pool_errors_are_retryable() {
        assert!(AppError::from(sqlx::Error::PoolClosed).is_retryable());
    }
}
