#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use classroom::classroom_config::{CorsConfig, ServerConfig};
use classroom::router::init_router;
use classroom::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    let state = AppState::new(pool, ServerConfig::default(), CorsConfig::default());
    init_router(state)
}

/// Sends one request through a fresh router and returns the status and the
/// parsed JSON body (`Value::Null` when the body is empty).
pub async fn send(
    pool: &PgPool,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let app = setup_test_app(pool.clone());

    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn error_messages(body: &Value) -> Vec<String> {
    body["messages"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub async fn create_test_teacher(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO teachers (first_name, last_name, email) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Grace")
    .bind("Hopper")
    .bind(email.to_lowercase())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_student(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO students (first_name, last_name, email) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Ana")
    .bind("Lee")
    .bind(email.to_lowercase())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_class(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO classes (name, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(name.to_uppercase())
    .bind("Test class description")
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn teacher_body(email: &str) -> Value {
    json!({
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": email,
    })
}
