mod common;

use axum::http::StatusCode;
use common::{
    create_test_class, create_test_teacher, error_messages, generate_unique_email, send,
    teacher_body,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher(pool: PgPool) {
    let (status, body) = send(
        &pool,
        "POST",
        "/api/teachers",
        Some(json!({
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "Grace.Hopper@Navy.MIL",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["email"], "grace.hopper@navy.mil");
    assert_eq!(body["is_active"], true);
    assert!(body["created_at"].is_string());
    assert!(body.get("version").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_inactive(pool: PgPool) {
    let mut payload = teacher_body(&generate_unique_email());
    payload["is_active"] = json!(false);

    let (status, body) = send(&pool, "POST", "/api/teachers", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_active"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_duplicate_email_any_case(pool: PgPool) {
    create_test_teacher(&pool, "grace@school.org").await;

    let (status, body) = send(
        &pool,
        "POST",
        "/api/teachers",
        Some(teacher_body("GRACE@School.org")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This email has already been used");
    assert_eq!(
        error_messages(&body),
        vec!["This email has already been used".to_string()]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_blank_names(pool: PgPool) {
    let mut payload = teacher_body(&generate_unique_email());
    payload["first_name"] = json!("   ");
    payload["last_name"] = json!("\t");

    let (status, body) = send(&pool, "POST", "/api/teachers", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let messages = error_messages(&body);
    assert!(messages.contains(&"first_name must be between 1 and 100 characters".to_string()));
    assert!(messages.contains(&"last_name must be between 1 and 100 characters".to_string()));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_collects_every_message(pool: PgPool) {
    let (status, body) = send(
        &pool,
        "POST",
        "/api/teachers",
        Some(json!({
            "first_name": "",
            "last_name": "Hopper",
            "email": "not-an-email",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let messages = error_messages(&body);
    assert!(messages.contains(&"email must be a valid email address".to_string()));
    assert!(messages.contains(&"first_name must be between 1 and 100 characters".to_string()));
    assert_eq!(body["error"], messages.join(", "));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_missing_field(pool: PgPool) {
    let (status, body) = send(
        &pool,
        "POST",
        "/api/teachers",
        Some(json!({ "first_name": "Grace", "last_name": "Hopper" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_teacher(pool: PgPool) {
    let email = generate_unique_email();
    let id = create_test_teacher(&pool, &email).await;

    let (status, body) = send(&pool, "GET", &format!("/api/teachers/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["email"], email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_teacher_not_found(pool: PgPool) {
    let (status, body) = send(&pool, "GET", "/api/teachers/999999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Teacher by id not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_teacher_invalid_id(pool: PgPool) {
    let (status, body) = send(&pool, "GET", "/api/teachers/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid path parameter"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_teachers_pagination(pool: PgPool) {
    for _ in 0..12 {
        create_test_teacher(&pool, &generate_unique_email()).await;
    }

    let (status, body) = send(&pool, "GET", "/api/teachers?page=2&take=5", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["take"], 5);
    assert_eq!(body["meta"]["item_count"], 12);
    assert_eq!(body["meta"]["page_count"], 3);
    assert_eq!(body["meta"]["has_previous_page"], true);
    assert_eq!(body["meta"]["has_next_page"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_teachers_defaults_and_order(pool: PgPool) {
    let first = create_test_teacher(&pool, &generate_unique_email()).await;
    let second = create_test_teacher(&pool, &generate_unique_email()).await;

    let (status, body) = send(&pool, "GET", "/api/teachers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["take"], 10);
    assert_eq!(body["data"][0]["id"], first);

    let (_, body) = send(&pool, "GET", "/api/teachers?order=DESC", None).await;
    assert_eq!(body["data"][0]["id"], second);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_teachers_take_is_clamped(pool: PgPool) {
    let (status, body) = send(&pool, "GET", "/api/teachers?take=500", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["take"], 50);
    assert_eq!(body["meta"]["page_count"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_teachers_invalid_query(pool: PgPool) {
    let (status, _) = send(&pool, "GET", "/api/teachers?order=sideways", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_teacher(pool: PgPool) {
    let id = create_test_teacher(&pool, &generate_unique_email()).await;

    let (status, body) = send(
        &pool,
        "PUT",
        &format!("/api/teachers/{id}"),
        Some(json!({
            "id": id,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ADA@example.com",
            "is_active": false,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["is_active"], false);

    let version: i32 = sqlx::query_scalar("SELECT version FROM teachers WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(version, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_teacher_keeps_own_email(pool: PgPool) {
    let email = generate_unique_email();
    let id = create_test_teacher(&pool, &email).await;

    let (status, body) = send(
        &pool,
        "PUT",
        &format!("/api/teachers/{id}"),
        Some(teacher_body(&email.to_uppercase())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email);
    assert_eq!(body["is_active"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_teacher_email_taken_by_other(pool: PgPool) {
    let taken = generate_unique_email();
    create_test_teacher(&pool, &taken).await;
    let id = create_test_teacher(&pool, &generate_unique_email()).await;

    let (status, body) = send(
        &pool,
        "PUT",
        &format!("/api/teachers/{id}"),
        Some(teacher_body(&taken)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This email has already been used");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_teacher_id_mismatch(pool: PgPool) {
    let id = create_test_teacher(&pool, &generate_unique_email()).await;
    let mut payload = teacher_body(&generate_unique_email());
    payload["id"] = json!(id + 1);

    let (status, body) = send(&pool, "PUT", &format!("/api/teachers/{id}"), Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_messages(&body).contains(&"id in body does not match id in path".to_string()));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_teacher_not_found(pool: PgPool) {
    let (status, body) = send(
        &pool,
        "PUT",
        "/api/teachers/424242",
        Some(teacher_body(&generate_unique_email())),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Teacher by id not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_teacher(pool: PgPool) {
    let id = create_test_teacher(&pool, &generate_unique_email()).await;

    let (status, body) = send(&pool, "DELETE", &format!("/api/teachers/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&pool, "DELETE", &format!("/api/teachers/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_teacher_still_teaching_is_conflict(pool: PgPool) {
    let teacher_id = create_test_teacher(&pool, &generate_unique_email()).await;
    let class_id = create_test_class(&pool, "Chemistry").await;

    let (status, _) = send(
        &pool,
        "POST",
        &format!("/api/classes/{class_id}/assign-teacher"),
        Some(json!({ "teacher_id": teacher_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&pool, "DELETE", &format!("/api/teachers/{teacher_id}"), None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "The record is still referenced by other records");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_teacher_classes(pool: PgPool) {
    let teacher_id = create_test_teacher(&pool, &generate_unique_email()).await;
    let math = create_test_class(&pool, "Math").await;
    create_test_class(&pool, "History").await;

    send(
        &pool,
        "POST",
        &format!("/api/classes/{math}/assign-teacher"),
        Some(json!({ "teacher_id": teacher_id })),
    )
    .await;

    let uri = format!("/api/teachers/{teacher_id}/classes");
    let (status, body) = send(&pool, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    let classes = body.as_array().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["name"], "MATH");

    let (status, _) = send(&pool, "GET", "/api/teachers/999999/classes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_check(pool: PgPool) {
    let (status, body) = send(&pool, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
