//! API integration tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use libris_server::{
    api,
    config::AppConfig,
    repository::{FlatFileStore, SnapshotStore},
    services::Services,
    AppState,
};

const BASE_URL: &str = "/api/v1";

fn app_with(store: Option<Arc<dyn SnapshotStore>>) -> Router {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(store).expect("Failed to open library")),
    };
    api::router(state)
}

fn app() -> Router {
    app_with(None)
}

/// Send a request and return status plus parsed JSON body (Null when empty)
async fn send(app: &Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("{}{}", BASE_URL, path));
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("Failed to build request"))
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, value)
}

async fn seed(app: &Router) {
    let (status, _) = send(
        app,
        Method::POST,
        "/books",
        Some(json!({
            "isbn": "978-1",
            "title": "Dune",
            "author": "Herbert",
            "category": "SciFi"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        app,
        Method::POST,
        "/users",
        Some(json!({ "user_id": "U1", "name": "Ana" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        app,
        Method::POST,
        "/users",
        Some(json!({ "user_id": "U2", "name": "Bruno" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["persistent"], false);
    assert_eq!(body["total_books"], 0);

    seed(&app).await;
    let (_, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(body["total_books"], 1);
}

#[tokio::test]
async fn test_create_book_and_duplicate() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, Method::GET, "/books/978-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["available"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "isbn": "978-1", "title": "Other", "author": "Someone" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "DuplicateIsbn");
}

#[tokio::test]
async fn test_create_book_validation() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "isbn": "978-9", "title": "", "author": "Nobody" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_lending_flow() {
    let app = app();
    seed(&app).await;
    let loan = json!({ "isbn": "978-1", "user_id": "U1" });

    let (status, body) = send(&app, Method::POST, "/loans", Some(loan.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["action"], "loan");
    assert_eq!(body["title"], "Dune");

    let (_, body) = send(&app, Method::GET, "/books/978-1", None).await;
    assert_eq!(body["available"], false);

    let (status, body) = send(&app, Method::POST, "/loans", Some(loan.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BookUnavailable");

    let (status, body) = send(
        &app,
        Method::POST,
        "/loans/return",
        Some(json!({ "isbn": "978-1", "user_id": "U2" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "LoanMismatch");

    let (status, body) = send(&app, Method::POST, "/loans/return", Some(loan)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "return");

    let (_, body) = send(&app, Method::GET, "/books/978-1/history", None).await;
    let actions: Vec<_> = body
        .as_array()
        .expect("history is an array")
        .iter()
        .map(|e| e["action"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(actions, vec!["loan", "return"]);
}

#[tokio::test]
async fn test_unknown_references() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, Method::GET, "/books/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");

    let (status, body) = send(
        &app,
        Method::POST,
        "/loans",
        Some(json!({ "isbn": "978-1", "user_id": "U9" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchUser");

    let (status, _) = send(&app, Method::GET, "/users/U9/loans", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_guards() {
    let app = app();
    seed(&app).await;
    send(
        &app,
        Method::POST,
        "/loans",
        Some(json!({ "isbn": "978-1", "user_id": "U1" })),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, "/books/978-1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BookOnLoan");

    let (status, body) = send(&app, Method::DELETE, "/users/U1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "UserHasLoans");

    let (_, body) = send(&app, Method::GET, "/users/U1/loans", None).await;
    assert_eq!(body[0]["isbn"], "978-1");

    let (status, _) = send(&app, Method::DELETE, "/users/U2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(body["total_books"], 1);
    assert_eq!(body["total_users"], 1);
    assert_eq!(body["books_on_loan"], 1);
    assert_eq!(body["ledger_entries"], 1);
}

#[tokio::test]
async fn test_search_and_recategorize() {
    let app = app();
    seed(&app).await;
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "isbn": "978-2", "title": "Emma", "author": "Austen", "category": "Classic" })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/books?q=DUNE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["isbn"], "978-1");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/978-2/category",
        Some(json!({ "category": "Romance" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Romance");

    let (_, body) = send(&app, Method::GET, "/books?field=category&q=roman", None).await;
    assert_eq!(body[0]["isbn"], "978-2");

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_unknown_search_field() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, Method::GET, "/books?field=isbn&q=978", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert!(body["message"].as_str().unwrap_or_default().contains("isbn"));

    let (status, body) = send(&app, Method::GET, "/books?field=Title&q=dune", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["isbn"], "978-1");
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("library.jsonl");

    let app = app_with(Some(Arc::new(FlatFileStore::new(&path))));
    seed(&app).await;
    send(
        &app,
        Method::POST,
        "/loans",
        Some(json!({ "isbn": "978-1", "user_id": "U2" })),
    )
    .await;

    let restarted = app_with(Some(Arc::new(FlatFileStore::new(&path))));
    let (_, body) = send(&restarted, Method::GET, "/users/U2", None).await;
    assert_eq!(body["held_loans"], json!(["978-1"]));

    let (_, body) = send(&restarted, Method::GET, "/status", None).await;
    assert_eq!(body["books_on_loan"], 1);
    assert_eq!(body["ledger_entries"], 1);

    let (_, body) = send(&restarted, Method::GET, "/health", None).await;
    assert_eq!(body["persistent"], true);
}
