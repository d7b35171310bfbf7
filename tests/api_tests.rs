//! HTTP-level tests driving the router directly, no listener.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use corkboard::api::{self, ApiContext};
use corkboard::db::Database;

fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    api::router(ApiContext::new(Arc::new(db)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn board_create_returns_default_columns() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/boards",
        Some(json!({"title": "Launch", "background": "bg-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Launch");
    let columns = body["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0]["title"], "TO DO");
    assert_eq!(columns[0]["rank"], 0);
    assert_eq!(columns[2]["rank"], 2);
}

#[tokio::test]
async fn board_create_rejects_empty_title() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/boards", Some(json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");
    assert_eq!(body["field"], "title");
}

#[tokio::test]
async fn column_delete_conflicts_while_tasks_remain() {
    let app = app();
    let (_, board) = send(
        &app,
        "POST",
        "/api/boards",
        Some(json!({"title": "Launch"})),
    )
    .await;
    let col_id = board["columns"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"columnId": col_id, "title": "Card"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "DELETE", &format!("/api/columns/{}", col_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "COLUMN_NOT_EMPTY");
}

#[tokio::test]
async fn task_reorder_moves_between_columns() {
    let app = app();
    let (_, board) = send(
        &app,
        "POST",
        "/api/boards",
        Some(json!({"title": "Launch"})),
    )
    .await;
    let board_id = board["id"].as_str().unwrap().to_string();
    let todo = board["columns"][0]["id"].as_str().unwrap().to_string();
    let done = board["columns"][2]["id"].as_str().unwrap().to_string();

    let (_, task) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"columnId": todo, "title": "Ship it"})),
    )
    .await;
    let task_id = task["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/tasks/{}/reorder", task_id),
        Some(json!({"targetColumnId": done, "position": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, tasks) = send(&app, "GET", &format!("/api/boards/{}/tasks", board_id), None).await;
    assert_eq!(tasks[0]["columnId"], done.as_str());
    assert_eq!(tasks[0]["position"], 1.0);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = app();
    let (status, user) = send(
        &app,
        "POST",
        "/api/auth/register",
        Some(json!({"name": "Jo", "email": "jo@example.com", "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["initials"], "JO");
    assert!(user.get("passwordHash").is_none());

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"email": "jo@example.com", "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"email": "jo@example.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn share_unknown_email_is_404() {
    let app = app();
    let (_, board) = send(
        &app,
        "POST",
        "/api/boards",
        Some(json!({"title": "Launch"})),
    )
    .await;
    let board_id = board["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/boards/{}/share", board_id),
        Some(json!({"email": "ghost@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn search_annotates_hits_with_board() {
    let app = app();
    let (_, board) = send(
        &app,
        "POST",
        "/api/boards",
        Some(json!({"title": "Product"})),
    )
    .await;
    let col = board["columns"][0]["id"].as_str().unwrap().to_string();
    send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"columnId": col, "title": "Design System Draft"})),
    )
    .await;

    let (status, hits) = send(&app, "GET", "/api/search?q=desi", None).await;
    assert_eq!(status, StatusCode::OK);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "Design System Draft");
    assert_eq!(hits[0]["boardTitle"], "Product");

    let (_, empty) = send(&app, "GET", "/api/search?q=zzz", None).await;
    assert!(empty.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn user_lookup_and_update() {
    let app = app();
    let (_, user) = send(
        &app,
        "POST",
        "/api/auth/register",
        Some(json!({"name": "Jo", "email": "jo@example.com", "password": "hunter22"})),
    )
    .await;
    let user_id = user["id"].as_str().unwrap().to_string();

    let (status, found) = send(&app, "GET", "/api/users/lookup?email=jo@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], user_id.as_str());

    let (status, _) = send(&app, "GET", "/api/users/lookup?email=nobody@example.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", user_id),
        Some(json!({"name": "Joanna"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Joanna");
}

#[tokio::test]
async fn unknown_task_update_is_404() {
    let app = app();
    let (status, body) = send(
        &app,
        "PUT",
        "/api/tasks/task-missing",
        Some(json!({"title": "New"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TASK_NOT_FOUND");
}
