//! Data access for the books table. One statement per call, no transactions
//! spanning operations; database errors propagate unchanged.

use sqlx::sqlite::SqlitePool;
use thiserror::Error;

use super::models::Book;

const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

#[derive(Debug, Error)]
pub enum BookRepoError {
    #[error("no book found with isbn '{0}'")]
    NotFound(String),

    #[error("a book with isbn '{0}' already exists")]
    Duplicate(String),

    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<BookRepoError> for libris_http::AppError {
    fn from(err: BookRepoError) -> Self {
        match err {
            BookRepoError::NotFound(isbn) => {
                Self::not_found(format!("There is no book with an isbn '{isbn}'"))
            }
            BookRepoError::Duplicate(isbn) => {
                Self::conflict(format!("A book with isbn '{isbn}' already exists"))
            }
            BookRepoError::Database(err) => Self::Internal(err.into()),
        }
    }
}

/// Repository over the `books` table. Cheap to clone; holds a pool handle.
#[derive(Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All books, ordered by title ascending.
    pub async fn list_all(&self) -> Result<Vec<Book>, BookRepoError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY title"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// The single book with the given isbn.
    pub async fn find_by_isbn(&self, isbn: &str) -> Result<Book, BookRepoError> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ?1"
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BookRepoError::NotFound(isbn.to_string()))
    }

    /// Insert a new book and return the persisted row.
    pub async fn create(&self, book: &Book) -> Result<Book, BookRepoError> {
        sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books ({BOOK_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                BookRepoError::Duplicate(book.isbn.clone())
            }
            _ => BookRepoError::Database(err),
        })
    }

    /// Overwrite all mutable fields of the row identified by `isbn` and
    /// return the updated row. The key column itself is never rewritten;
    /// identity comes from the path parameter.
    pub async fn update(&self, isbn: &str, book: &Book) -> Result<Book, BookRepoError> {
        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books
             SET amazon_url = ?1,
                 author = ?2,
                 language = ?3,
                 pages = ?4,
                 publisher = ?5,
                 title = ?6,
                 year = ?7
             WHERE isbn = ?8
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BookRepoError::NotFound(isbn.to_string()))
    }

    /// Delete the row identified by `isbn`.
    pub async fn remove(&self, isbn: &str) -> Result<(), BookRepoError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BookRepoError::NotFound(isbn.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books;
    use libris_db::{Db, MigrationScript};
    use libris_kernel::Module;

    async fn test_repo() -> BookRepository {
        let db = Db::connect("sqlite::memory:", 1).await.unwrap();
        let module = books::BooksModule::new();
        let scripts: Vec<MigrationScript<'_>> = module
            .migrations()
            .iter()
            .map(|m| MigrationScript {
                module: "books",
                id: m.id,
                sql: m.up,
            })
            .collect();
        db.apply_migrations(&scripts).await.unwrap();
        BookRepository::new(db.pool().clone())
    }

    fn sample_book() -> Book {
        Book {
            isbn: "0590353403".to_string(),
            amazon_url: "https://a.co/d/9xbC0He".to_string(),
            author: "J.K. Rowling".to_string(),
            language: "english".to_string(),
            pages: 309,
            publisher: "Scholastic Press".to_string(),
            title: "Harry Potter and the Sorcerer's Stone".to_string(),
            year: 1998,
        }
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let repo = test_repo().await;
        let book = sample_book();

        let created = repo.create(&book).await.unwrap();
        assert_eq!(created, book);

        let found = repo.find_by_isbn(&book.isbn).await.unwrap();
        assert_eq!(found, book);
    }

    #[tokio::test]
    async fn list_is_ordered_by_title() {
        let repo = test_repo().await;
        let mut zebra = sample_book();
        zebra.isbn = "1111111111".to_string();
        zebra.title = "Zebra Stories".to_string();
        let mut aardvark = sample_book();
        aardvark.isbn = "2222222222".to_string();
        aardvark.title = "Aardvark Tales".to_string();

        repo.create(&zebra).await.unwrap();
        repo.create(&aardvark).await.unwrap();

        let titles: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Aardvark Tales", "Zebra Stories"]);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let repo = test_repo().await;
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_isbn_is_classified() {
        let repo = test_repo().await;
        let book = sample_book();

        repo.create(&book).await.unwrap();
        let err = repo.create(&book).await.unwrap_err();
        assert!(matches!(err, BookRepoError::Duplicate(isbn) if isbn == book.isbn));
    }

    #[tokio::test]
    async fn update_overwrites_all_fields_keyed_on_path_isbn() {
        let repo = test_repo().await;
        let book = sample_book();
        repo.create(&book).await.unwrap();

        let mut updated = book.clone();
        updated.title = "Harry Potter and the Philosopher's Stone".to_string();

        let returned = repo.update(&book.isbn, &updated).await.unwrap();
        assert_eq!(returned, updated);

        let found = repo.find_by_isbn(&book.isbn).await.unwrap();
        assert_eq!(found.title, "Harry Potter and the Philosopher's Stone");
    }

    #[tokio::test]
    async fn missing_rows_surface_not_found() {
        let repo = test_repo().await;

        let err = repo.find_by_isbn("missing").await.unwrap_err();
        assert!(matches!(err, BookRepoError::NotFound(_)));

        let err = repo.update("missing", &sample_book()).await.unwrap_err();
        assert!(matches!(err, BookRepoError::NotFound(_)));

        let err = repo.remove("missing").await.unwrap_err();
        assert!(matches!(err, BookRepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one_row() {
        let repo = test_repo().await;
        let book = sample_book();
        repo.create(&book).await.unwrap();

        repo.remove(&book.isbn).await.unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());

        // A second delete is a miss, not a silent success.
        let err = repo.remove(&book.isbn).await.unwrap_err();
        assert!(matches!(err, BookRepoError::NotFound(_)));
    }
}
