//! API handlers for Libris REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod stats;
pub mod users;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/status", get(stats::get_status))
        // Books (catalog)
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:isbn", get(books::get_book).delete(books::delete_book))
        .route("/books/:isbn/category", put(books::update_category))
        .route("/books/:isbn/history", get(books::get_book_history))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user).delete(users::delete_user))
        .route("/users/:id/loans", get(users::get_user_loans))
        .route("/users/:id/history", get(users::get_user_history))
        // Loans
        .route("/loans", post(loans::create_loan))
        .route("/loans/return", post(loans::return_loan))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
