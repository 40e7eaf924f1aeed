//! Book (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::{AppResult, LibraryError},
    models::{
        book::{CreateBook, UpdateCategory},
        Book, LoanEvent, SearchField,
    },
};

/// Catalog search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Field to search: title, author or category (default: title)
    pub field: Option<String>,
    /// Case-insensitive substring; all books are listed when absent
    pub q: Option<String>,
}

/// List or search books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Books in catalog order", body = Vec<Book>),
        (status = 400, description = "Unknown search field", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let field = match query.field.as_deref() {
        Some(field) => field.parse::<SearchField>()?,
        None => SearchField::Title,
    };

    let books: Vec<Book> = state
        .services
        .library
        .read(move |library| match &query.q {
            Some(q) => library
                .search_books(field, q)
                .into_iter()
                .cloned()
                .collect(),
            None => library.books().cloned().collect(),
        })
        .await?;
    Ok(Json(books))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .library
        .read(move |library| {
            library
                .find_book(&isbn)
                .cloned()
                .ok_or(LibraryError::UnknownBook(isbn))
        })
        .await??;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book added", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    request.validate()?;

    let book = state
        .services
        .library
        .write("add book", move |library| {
            library.add_book(&request.isbn, &request.title, &request.author, &request.category)?;
            library
                .find_book(&request.isbn)
                .cloned()
                .ok_or(LibraryError::UnknownBook(request.isbn))
        })
        .await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// Change the category of a book
#[utoipa::path(
    put,
    path = "/books/{isbn}/category",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    Json(request): Json<UpdateCategory>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .library
        .write("recategorize book", move |library| {
            library.recategorize_book(&isbn, &request.category)?;
            library
                .find_book(&isbn)
                .cloned()
                .ok_or(LibraryError::UnknownBook(isbn))
        })
        .await?;
    Ok(Json(book))
}

/// Remove a book that is not on loan
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 204, description = "Book removed"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book is on loan")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    state
        .services
        .library
        .write("remove book", move |library| library.remove_book(&isbn).map(|_| ()))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Loan and return history of a book
#[utoipa::path(
    get,
    path = "/books/{isbn}/history",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Ledger entries for the book", body = Vec<LoanEvent>)
    )
)]
pub async fn get_book_history(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Vec<LoanEvent>>> {
    let events: Vec<LoanEvent> = state
        .services
        .library
        .read(move |library| {
            library
                .history_for_book(&isbn)
                .into_iter()
                .cloned()
                .collect()
        })
        .await?;
    Ok(Json(events))
}
