mod common;

use axum::http::StatusCode;
use common::{
    create_test_class, create_test_student, create_test_teacher, error_messages,
    generate_unique_email, send,
};
use serde_json::{Value, json};
use sqlx::PgPool;

fn class_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Numbers and shapes",
    })
}

async fn assign_teacher(pool: &PgPool, class_id: i64, teacher_id: i64) -> (StatusCode, Value) {
    send(
        pool,
        "POST",
        &format!("/api/classes/{class_id}/assign-teacher"),
        Some(json!({ "teacher_id": teacher_id })),
    )
    .await
}

async fn assign_student(pool: &PgPool, class_id: i64, student_id: i64) -> (StatusCode, Value) {
    send(
        pool,
        "POST",
        &format!("/api/classes/{class_id}/assign-students"),
        Some(json!({ "student_id": student_id })),
    )
    .await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_class_uppercases_name(pool: PgPool) {
    let (status, body) = send(&pool, "POST", "/api/classes", Some(class_body(" math 101 "))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "MATH 101");
    assert_eq!(body["description"], "Numbers and shapes");
    assert_eq!(body["is_active"], true);
    assert!(body.get("teacher_id").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_class_duplicate_name_any_case(pool: PgPool) {
    create_test_class(&pool, "Math").await;

    let (status, body) = send(&pool, "POST", "/api/classes", Some(class_body("math"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This name has already been used");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_class_blank_name(pool: PgPool) {
    let (status, body) = send(&pool, "POST", "/api/classes", Some(class_body("   "))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_messages(&body),
        vec!["name must be between 1 and 100 characters".to_string()]
    );

    let (_, body) = send(&pool, "GET", "/api/classes", None).await;
    assert_eq!(body["meta"]["item_count"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_class_empty_description(pool: PgPool) {
    let (status, body) = send(
        &pool,
        "POST",
        "/api/classes",
        Some(json!({ "name": "Art", "description": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_messages(&body),
        vec!["description should not be empty".to_string()]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_classes(pool: PgPool) {
    for name in ["Art", "Biology", "Chemistry"] {
        create_test_class(&pool, name).await;
    }

    let (status, body) = send(&pool, "GET", "/api/classes?take=2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["name"], "ART");
    assert_eq!(body["meta"]["page_count"], 2);
    assert_eq!(body["meta"]["has_next_page"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_class(pool: PgPool) {
    let id = create_test_class(&pool, "Physics").await;

    let (status, body) = send(
        &pool,
        "PUT",
        &format!("/api/classes/{id}"),
        Some(json!({
            "id": id,
            "name": "Physics II",
            "description": "Waves",
            "is_active": false,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "PHYSICS II");
    assert_eq!(body["description"], "Waves");
    assert_eq!(body["is_active"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_class_keeps_teacher(pool: PgPool) {
    let id = create_test_class(&pool, "Physics").await;
    let teacher_id = create_test_teacher(&pool, &generate_unique_email()).await;
    assign_teacher(&pool, id, teacher_id).await;

    let (status, _) = send(
        &pool,
        "PUT",
        &format!("/api/classes/{id}"),
        Some(class_body("physics")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&pool, "GET", &format!("/api/classes/{id}/assign-teacher"), None).await;
    assert_eq!(body["id"], teacher_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_class_name_taken(pool: PgPool) {
    create_test_class(&pool, "Geography").await;
    let id = create_test_class(&pool, "Physics").await;

    let (status, body) = send(
        &pool,
        "PUT",
        &format!("/api/classes/{id}"),
        Some(class_body("GEOGRAPHY")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This name has already been used");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_not_found(pool: PgPool) {
    let (status, body) = send(&pool, "GET", "/api/classes/5150", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Class by id not found");

    let (status, _) = send(&pool, "DELETE", "/api/classes/5150", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&pool, "GET", "/api/classes/5150/assign-teacher", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&pool, "GET", "/api/classes/5150/assign-students", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_without_teacher_returns_null(pool: PgPool) {
    let id = create_test_class(&pool, "Music").await;

    let uri = format!("/api/classes/{id}/assign-teacher");
    let (status, body) = send(&pool, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_teacher_twice_keeps_latest(pool: PgPool) {
    let class_id = create_test_class(&pool, "Music").await;
    let first = create_test_teacher(&pool, &generate_unique_email()).await;
    let second = create_test_teacher(&pool, &generate_unique_email()).await;

    let (status, body) = assign_teacher(&pool, class_id, first).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    let (status, _) = assign_teacher(&pool, class_id, second).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &pool,
        "GET",
        &format!("/api/classes/{class_id}/assign-teacher"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], second);

    let version: i32 = sqlx::query_scalar("SELECT version FROM classes WHERE id = $1")
        .bind(class_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(version, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_missing_teacher(pool: PgPool) {
    let class_id = create_test_class(&pool, "Music").await;

    let (status, body) = assign_teacher(&pool, class_id, 999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Teacher by id not found");

    let teacher_id = create_test_teacher(&pool, &generate_unique_email()).await;
    let (status, body) = assign_teacher(&pool, 999, teacher_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Class by id not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_teacher_requires_positive_id(pool: PgPool) {
    let class_id = create_test_class(&pool, "Music").await;

    let (status, body) = assign_teacher(&pool, class_id, 0).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "teacher_id must be a positive number");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_teacher_missing_body_field(pool: PgPool) {
    let class_id = create_test_class(&pool, "Music").await;

    let (status, body) = send(
        &pool,
        "POST",
        &format!("/api/classes/{class_id}/assign-teacher"),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "teacher_id is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_students_is_not_idempotent(pool: PgPool) {
    let class_id = create_test_class(&pool, "Drama").await;
    let ana = create_test_student(&pool, &generate_unique_email()).await;
    let ben = create_test_student(&pool, &generate_unique_email()).await;

    for student_id in [ana, ben, ana] {
        let (status, _) = assign_student(&pool, class_id, student_id).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, body) = send(
        &pool,
        "GET",
        &format!("/api/classes/{class_id}/assign-students"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![ana, ben, ana]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_missing_student(pool: PgPool) {
    let class_id = create_test_class(&pool, "Drama").await;

    let (status, body) = assign_student(&pool, class_id, 4040).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student by id not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_class_cascades_enrolments(pool: PgPool) {
    let class_id = create_test_class(&pool, "Drama").await;
    let student_id = create_test_student(&pool, &generate_unique_email()).await;
    assign_student(&pool, class_id, student_id).await;

    let (status, _) = send(&pool, "DELETE", &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let enrolments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM class_students")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(enrolments, 0);

    let (status, _) = send(&pool, "GET", &format!("/api/students/{student_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}
