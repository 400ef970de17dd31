//! HTTP handlers for the books module. Handlers translate repository results
//! into response envelopes; every failure path is an [`AppError`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use libris_http::AppError;

use super::models::{BookEnvelope, BooksEnvelope, MessageEnvelope};
use super::repo::BookRepository;
use super::schema;

/// GET / — all books, ordered by title.
pub async fn list_books(
    State(repo): State<BookRepository>,
) -> Result<Json<BooksEnvelope>, AppError> {
    let books = repo.list_all().await?;
    Ok(Json(BooksEnvelope { books }))
}

/// GET /{isbn} — a single book.
pub async fn get_book(
    State(repo): State<BookRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = repo.find_by_isbn(&isbn).await?;
    Ok(Json(BookEnvelope { book }))
}

/// POST / — create a book from a validated payload.
pub async fn create_book(
    State(repo): State<BookRepository>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<BookEnvelope>), AppError> {
    let book = schema::decode(payload)?;
    let book = repo.create(&book).await?;
    Ok((StatusCode::CREATED, Json(BookEnvelope { book })))
}

/// PUT /{isbn} — overwrite every field of an existing book. Identity comes
/// from the path; the body's isbn is validated but not written.
pub async fn update_book(
    State(repo): State<BookRepository>,
    Path(isbn): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = schema::decode(payload)?;
    let book = repo.update(&isbn, &book).await?;
    Ok(Json(BookEnvelope { book }))
}

/// DELETE /{isbn} — remove a book.
pub async fn delete_book(
    State(repo): State<BookRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<MessageEnvelope>, AppError> {
    repo.remove(&isbn).await?;
    Ok(Json(MessageEnvelope {
        message: "Book deleted",
    }))
}
