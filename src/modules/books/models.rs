use serde::{Deserialize, Serialize};

/// A catalog entry, keyed by ISBN. The same shape serves as table row,
/// request payload, and response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// International Standard Book Number; primary key.
    pub isbn: String,
    /// Product page URL.
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i64,
    pub publisher: String,
    pub title: String,
    pub year: i64,
}

/// `{ "book": {...} }` response envelope.
#[derive(Debug, Serialize)]
pub struct BookEnvelope {
    pub book: Book,
}

/// `{ "books": [...] }` response envelope.
#[derive(Debug, Serialize)]
pub struct BooksEnvelope {
    pub books: Vec<Book>,
}

/// `{ "message": "..." }` response envelope.
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub message: &'static str,
}
