// ABOUTME: Integration tests for the REST API over an in-memory database
// ABOUTME: Exercises auth, the filtered task listing, and tag autocomplete end to end

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use taskdeck_api::{create_tags_router, create_tasks_router, DbState};

const ALICE_TOKEN: &str = "alice-token";
const BOB_TOKEN: &str = "bob-token";
const STALE_TOKEN: &str = "stale-token";

async fn test_app() -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::migrate!("../storage/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    for (id, email) in [("alice", "alice@example.com"), ("bob", "bob@example.com")] {
        sqlx::query(
            "INSERT INTO users (id, name, email, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(id)
        .bind(email)
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();
    }

    for (token, user_id, expires_at) in [
        (ALICE_TOKEN, "alice", Utc::now() + Duration::hours(1)),
        (BOB_TOKEN, "bob", Utc::now() + Duration::hours(1)),
        (STALE_TOKEN, "alice", Utc::now() - Duration::minutes(1)),
    ] {
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&pool)
            .await
            .unwrap();
    }

    let db = DbState::new(pool.clone());
    let app = Router::new()
        .nest("/api/v1/tasks", create_tasks_router())
        .nest("/api/v1/tags", create_tags_router())
        .with_state(db);

    (app, pool)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn request_with_body(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_task(app: &Router, token: &str, body: Value) -> Value {
    let (status, task) = send(app, request_with_body("POST", "/api/v1/tasks", token, body)).await;
    assert_eq!(status, StatusCode::CREATED);
    task
}

#[tokio::test]
async fn test_missing_auth_header_is_unauthorized() {
    let (app, _pool) = test_app().await;

    let request = Request::builder()
        .uri("/api/v1/tasks")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_unknown_and_expired_tokens_are_unauthorized() {
    let (app, _pool) = test_app().await;

    let (status, _) = send(&app, get("/api/v1/tasks", "no-such-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, get("/api/v1/tasks", STALE_TOKEN)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_filtered_list_returns_only_matching_tasks() {
    let (app, _pool) = test_app().await;

    create_task(
        &app,
        ALICE_TOKEN,
        json!({"title": "Buy milk", "priority": "low"}),
    )
    .await;
    create_task(
        &app,
        ALICE_TOKEN,
        json!({"title": "Book dentist", "priority": "high"}),
    )
    .await;
    create_task(
        &app,
        ALICE_TOKEN,
        json!({"title": "Backup laptop", "priority": "low", "completed": true}),
    )
    .await;

    let (status, body) = send(
        &app,
        get(
            "/api/v1/tasks?completed=false&priority=low&sort_by=title&sort_order=asc",
            ALICE_TOKEN,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["page"], json!(1));
    assert_eq!(body["per_page"], json!(20));
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(body["tasks"][0]["title"], json!("Buy milk"));
}

#[tokio::test]
async fn test_tasks_are_invisible_across_users() {
    let (app, _pool) = test_app().await;

    let task = create_task(&app, ALICE_TOKEN, json!({"title": "Alice's secret"})).await;
    let task_id = task["id"].as_i64().unwrap();

    let (status, body) = send(&app, get(&format!("/api/v1/tasks/{task_id}"), BOB_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));

    let (status, body) = send(&app, get("/api/v1/tasks", BOB_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(0));

    // Bob cannot delete it either
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/tasks/{task_id}"))
        .header("Authorization", format!("Bearer {BOB_TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_out_of_range_pagination_is_rejected() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(&app, get("/api/v1/tasks?per_page=200", ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("per_page"));

    let (status, body) = send(&app, get("/api/v1/tasks?page=0", ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("page"));
}

#[tokio::test]
async fn test_unknown_filter_tokens_are_rejected() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(&app, get("/api/v1/tasks?priority=urgent", ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("priority"));

    let (status, body) = send(&app, get("/api/v1/tasks?sort_order=up", ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("sort_order"));
}

#[tokio::test]
async fn test_create_task_validation() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(
        &app,
        request_with_body("POST", "/api/v1/tasks", ALICE_TOKEN, json!({"title": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert!(body["error"]["message"].as_str().unwrap().contains("title"));

    let long_title = "x".repeat(201);
    let (status, _) = send(
        &app,
        request_with_body(
            "POST",
            "/api/v1/tasks",
            ALICE_TOKEN,
            json!({"title": long_title}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_task_round_trip_with_tags() {
    let (app, _pool) = test_app().await;

    let task = create_task(
        &app,
        ALICE_TOKEN,
        json!({"title": "Plan offsite", "tags": ["Work", "travel"]}),
    )
    .await;
    let task_id = task["id"].as_i64().unwrap();

    // Names come back normalized and sorted
    let names: Vec<&str> = task["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["travel", "work"]);

    // PATCH replaces the tag set and flips completion
    let (status, updated) = send(
        &app,
        request_with_body(
            "PATCH",
            &format!("/api/v1/tasks/{task_id}"),
            ALICE_TOKEN,
            json!({"completed": true, "tags": ["work"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], json!(true));
    assert_eq!(updated["tags"].as_array().unwrap().len(), 1);

    // DELETE then GET is a 404
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/tasks/{task_id}"))
        .header("Authorization", format!("Bearer {ALICE_TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(&format!("/api/v1/tasks/{task_id}"), ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tag_autocomplete_scenario() {
    let (app, _pool) = test_app().await;

    for name in ["workshop", "home", "work", "workflow"] {
        let (status, _) = send(
            &app,
            request_with_body("POST", "/api/v1/tags", ALICE_TOKEN, json!({"name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    // Bob's tags never leak into Alice's suggestions
    let (status, _) = send(
        &app,
        request_with_body("POST", "/api/v1/tags", BOB_TOKEN, json!({"name": "worship"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/api/v1/tags/autocomplete?q=wo", ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["suggestions"],
        json!(["work", "workflow", "workshop"])
    );
}

#[tokio::test]
async fn test_autocomplete_parameter_validation() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(&app, get("/api/v1/tags/autocomplete", ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("q"));

    let (status, body) = send(
        &app,
        get("/api/v1/tags/autocomplete?q=wo&limit=50", ALICE_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_duplicate_tag_is_a_conflict() {
    let (app, _pool) = test_app().await;

    let (status, _) = send(
        &app,
        request_with_body("POST", "/api/v1/tags", ALICE_TOKEN, json!({"name": "Work"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same name, different case
    let (status, body) = send(
        &app,
        request_with_body("POST", "/api/v1/tags", ALICE_TOKEN, json!({"name": "WORK"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("CONFLICT"));

    // A different user may reuse the name
    let (status, _) = send(
        &app,
        request_with_body("POST", "/api/v1/tags", BOB_TOKEN, json!({"name": "work"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_tag_list_with_prefix_search() {
    let (app, _pool) = test_app().await;

    for name in ["work", "workflow", "home"] {
        let (status, _) = send(
            &app,
            request_with_body("POST", "/api/v1/tags", ALICE_TOKEN, json!({"name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get("/api/v1/tags?search=wo", ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(2));
    let names: Vec<&str> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["work", "workflow"]);
}

#[tokio::test]
async fn test_repeated_query_is_idempotent() {
    let (app, _pool) = test_app().await;

    create_task(&app, ALICE_TOKEN, json!({"title": "One"})).await;
    create_task(&app, ALICE_TOKEN, json!({"title": "Two"})).await;

    let (_, first) = send(&app, get("/api/v1/tasks?sort_by=title&sort_order=asc", ALICE_TOKEN)).await;
    let (_, second) = send(&app, get("/api/v1/tasks?sort_by=title&sort_order=asc", ALICE_TOKEN)).await;
    assert_eq!(first, second);
}
