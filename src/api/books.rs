//! Book endpoints.
//!
//! Handlers are thin: they turn the transport request into a plain payload,
//! call the bookshelf service, and wrap the outcome in the
//! `{status, message?, data?}` envelope. Failures come back through
//! [`crate::error::AppError`], which owns the status-code mapping.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{error::AppResult, models::Book};

/// Envelope for a successful creation
#[derive(Serialize, ToSchema)]
pub struct BookCreatedResponse {
    pub status: String,
    pub message: String,
    pub data: BookCreatedData,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCreatedData {
    pub book_id: String,
}

/// Envelope for listing and filtering
#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub status: String,
    pub data: BookListData,
}

#[derive(Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<Book>,
}

/// Envelope for a single book
#[derive(Serialize, ToSchema)]
pub struct BookDetailResponse {
    pub status: String,
    pub data: BookDetailData,
}

#[derive(Serialize, ToSchema)]
pub struct BookDetailData {
    pub book: Book,
}

/// Envelope for update and delete outcomes
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

/// Body payloads stay raw JSON so the validator controls the failure order;
/// a non-object body carries no usable fields and validates like one.
fn into_payload(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Add a book to the shelf
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Object,
    responses(
        (status = 201, description = "Book added", body = BookCreatedResponse),
        (status = 400, description = "Name missing or readPage exceeds pageCount", body = crate::error::ErrorResponse),
        (status = 500, description = "Generic failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<BookCreatedResponse>)> {
    let payload = into_payload(body);
    let book_id = state.services.bookshelf.create_book(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookCreatedResponse {
            status: "success".to_string(),
            message: "Book added successfully".to_string(),
            data: BookCreatedData { book_id },
        }),
    ))
}

/// List books, optionally filtered by query terms
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("name" = Option<String>, Query, description = "Case-insensitive substring match on name"),
        ("reading" = Option<String>, Query, description = "Boolean flag (0/1/true/false)"),
        ("finished" = Option<String>, Query, description = "Boolean flag (0/1/true/false)"),
        ("year" = Option<String>, Query, description = "Numeric equality match")
    ),
    responses(
        (status = 200, description = "Books matching every query term", body = BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(terms): Query<IndexMap<String, String>>,
) -> AppResult<Json<BookListResponse>> {
    let books = state.services.bookshelf.list_books(&terms).await?;

    Ok(Json(BookListResponse {
        status: "success".to_string(),
        data: BookListData { books },
    }))
}

/// Get one book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetailResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookDetailResponse>> {
    let book = state.services.bookshelf.get_book(&id).await?;

    Ok(Json(BookDetailResponse {
        status: "success".to_string(),
        data: BookDetailData { book },
    }))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book id")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Name missing or readPage exceeds pageCount", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Generic failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<MessageResponse>> {
    let payload = into_payload(body);
    state.services.bookshelf.update_book(&id, &payload).await?;

    Ok(Json(MessageResponse {
        status: "success".to_string(),
        message: "Book updated successfully".to_string(),
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.bookshelf.delete_book(&id).await?;

    Ok(Json(MessageResponse {
        status: "success".to_string(),
        message: "Book deleted successfully".to_string(),
    }))
}
