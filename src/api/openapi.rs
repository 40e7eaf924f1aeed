//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "0.1.0",
        description = "Digital Library Lending REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Stats
        stats::get_status,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_category,
        books::delete_book,
        books::get_book_history,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::delete_user,
        users::get_user_loans,
        users::get_user_history,
        // Loans
        loans::create_loan,
        loans::return_loan,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::SearchField,
            crate::models::book::CreateBook,
            crate::models::book::UpdateCategory,
            // Users
            crate::models::user::User,
            crate::models::user::RegisterUser,
            // Loans
            crate::models::loan::LoanAction,
            crate::models::loan::LoanEvent,
            crate::models::loan::LoanRequest,
            // Stats
            crate::models::LibrarySummary,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "stats", description = "Library counters"),
        (name = "books", description = "Catalog management"),
        (name = "users", description = "User registry"),
        (name = "loans", description = "Lending and returns")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
