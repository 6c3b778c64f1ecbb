//! Book repository trait and implementation

use crate::db::run_migrations;
use crate::error::{LibraryError, Result};
use crate::models::{Book, BookPatch};
use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};
use tracing::debug;

/// Durable book record store
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Create the schema if absent. Safe to call more than once.
    async fn initialize(&self) -> Result<()>;

    /// Find a book by its ID
    ///
    /// # Returns
    /// - `Ok(Some(book))` if found
    /// - `Ok(None)` if not found
    async fn find_by_id(&self, id: &str) -> Result<Option<Book>>;

    /// Insert a new book
    ///
    /// # Errors
    /// Returns `ConstraintViolation` if:
    /// - A book with the same ID already exists
    /// - A required field is missing or a value is out of range
    async fn insert(&self, book: &Book) -> Result<()>;

    /// Merge `patch` into the stored book and stamp `dateModified`
    ///
    /// `modified_at` is clamped so it never precedes `dateAdded`.
    ///
    /// # Errors
    /// - `NotFound` if no book has this ID
    /// - `ConstraintViolation` if the merged record is invalid
    async fn update(&self, id: &str, patch: &BookPatch, modified_at: &str) -> Result<Book>;

    /// Delete a book by ID
    ///
    /// # Errors
    /// Returns `NotFound` if no book has this ID
    async fn delete(&self, id: &str) -> Result<()>;

    /// Every book, newest `dateAdded` first
    async fn list_all(&self) -> Result<Vec<Book>>;
}

/// SQLite implementation of BookRepository
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    /// Create a new SQLite book repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn initialize(&self) -> Result<()> {
        run_migrations(&self.pool).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>> {
        let book = query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn insert(&self, book: &Book) -> Result<()> {
        book.validate()?;

        sqlx::query(
            r#"
            INSERT INTO books (
                id, title, author, isbn, genre, publisher,
                series, seriesNumber, theme, pages, publicationYear,
                language, description, coverImage,
                personalNotes, personalRating, isRead,
                dateAdded, dateModified
            ) VALUES (
                ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?,
                ?, ?, ?,
                ?, ?, ?,
                ?, ?
            )
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(&book.publisher)
        .bind(&book.series)
        .bind(book.series_number)
        .bind(&book.theme)
        .bind(book.pages)
        .bind(book.publication_year)
        .bind(&book.language)
        .bind(&book.description)
        .bind(&book.cover_image)
        .bind(&book.personal_notes)
        .bind(book.personal_rating)
        .bind(book.is_read)
        .bind(&book.date_added)
        .bind(&book.date_modified)
        .execute(&self.pool)
        .await?;

        debug!(book_id = %book.id, "Inserted book");
        Ok(())
    }

    async fn update(&self, id: &str, patch: &BookPatch, modified_at: &str) -> Result<Book> {
        let mut tx = self.pool.begin().await?;

        let mut book = query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| LibraryError::book_not_found(id))?;

        patch.apply_to(&mut book);
        book.date_modified = if modified_at < book.date_added.as_str() {
            book.date_added.clone()
        } else {
            modified_at.to_string()
        };
        book.validate()?;

        sqlx::query(
            r#"
            UPDATE books SET
                title = ?, author = ?, isbn = ?, genre = ?, publisher = ?,
                series = ?, seriesNumber = ?, theme = ?, pages = ?,
                publicationYear = ?, language = ?, description = ?,
                coverImage = ?, personalNotes = ?, personalRating = ?,
                isRead = ?, dateModified = ?
            WHERE id = ?
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(&book.publisher)
        .bind(&book.series)
        .bind(book.series_number)
        .bind(&book.theme)
        .bind(book.pages)
        .bind(book.publication_year)
        .bind(&book.language)
        .bind(&book.description)
        .bind(&book.cover_image)
        .bind(&book.personal_notes)
        .bind(book.personal_rating)
        .bind(book.is_read)
        .bind(&book.date_modified)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(book_id = %id, fields = ?patch.field_names(), "Updated book");
        Ok(book)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::book_not_found(id));
        }

        debug!(book_id = %id, "Deleted book");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Book>> {
        // rowid breaks ties between books added within the same millisecond
        let books = query_as::<_, Book>("SELECT * FROM books ORDER BY dateAdded DESC, rowid DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }
}
