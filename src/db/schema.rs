use super::filter::contains_folded;
use crate::db::*;
use crate::error::{AppError, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Arc;

const BOOK_COLUMNS: &str = "id, title, author_id, publish_date, page_count, description,
     cover_image, cover_image_type, created_at";

/// Database wrapper for thread-safe access.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Open in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        // author_id carries no foreign key; removing an author leaves its
        // books in place.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS authors (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS books (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                author_id TEXT NOT NULL,
                publish_date TEXT NOT NULL,
                page_count INTEGER NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                cover_image BLOB,
                cover_image_type TEXT,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_books_author ON books(author_id);
            CREATE INDEX IF NOT EXISTS idx_books_created ON books(created_at);
            "#,
        )
        .map_err(|e| AppError::Database(format!("Failed to initialize schema: {}", e)))?;

        Ok(())
    }

    /// Helper to convert a row to Book.
    fn row_to_book(row: &rusqlite::Row<'_>) -> rusqlite::Result<Book> {
        Ok(Book {
            id: row.get(0)?,
            title: row.get(1)?,
            author_id: row.get(2)?,
            publish_date: row.get(3)?,
            page_count: row.get(4)?,
            description: row.get(5)?,
            cover_image: row.get(6)?,
            cover_image_type: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    /// Helper to convert a row to Author.
    fn row_to_author(row: &rusqlite::Row<'_>) -> rusqlite::Result<Author> {
        Ok(Author {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    }

    /// Count stored books.
    pub fn book_count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .map_err(|e| AppError::Database(format!("Failed to count books: {}", e)))
    }
}

impl CatalogStore for Database {
    // ========== BOOK OPERATIONS ==========

    fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        let (where_clause, values) = filter.where_clause();
        let sql = format!("SELECT {} FROM books{}", BOOK_COLUMNS, where_clause);

        tracing::debug!(%sql, params = values.len(), "Finding books");

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| AppError::Database(format!("Failed to prepare query: {}", e)))?;

        let mut books = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), Self::row_to_book)
            .map_err(|e| AppError::Database(format!("Failed to find books: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Database(format!("Failed to collect books: {}", e)))?;

        books.retain(|book| filter.matches(book));
        Ok(books)
    }

    fn recent_books(&self, limit: usize) -> Result<Vec<Book>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM books ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                BOOK_COLUMNS
            ))
            .map_err(|e| AppError::Database(format!("Failed to prepare query: {}", e)))?;

        let books = stmt
            .query_map(params![limit as i64], Self::row_to_book)
            .map_err(|e| AppError::Database(format!("Failed to get recent books: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Database(format!("Failed to collect books: {}", e)))?;

        Ok(books)
    }

    fn find_book(&self, id: &str) -> Result<Option<Book>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {} FROM books WHERE id = ?1", BOOK_COLUMNS),
            params![id],
            Self::row_to_book,
        )
        .optional()
        .map_err(|e| AppError::Database(format!("Failed to get book: {}", e)))
    }

    fn save_book(&self, book: &Book) -> Result<()> {
        book.validate()?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO books
             (id, title, author_id, publish_date, page_count, description,
              cover_image, cover_image_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT (id) DO UPDATE SET
                title = excluded.title,
                author_id = excluded.author_id,
                publish_date = excluded.publish_date,
                page_count = excluded.page_count,
                description = excluded.description,
                cover_image = excluded.cover_image,
                cover_image_type = excluded.cover_image_type",
            params![
                book.id,
                book.title,
                book.author_id,
                book.publish_date,
                book.page_count,
                book.description,
                book.cover_image,
                book.cover_image_type,
                book.created_at,
            ],
        )
        .map_err(|e| AppError::Database(format!("Failed to save book: {}", e)))?;
        Ok(())
    }

    fn remove_book(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let rows = conn
            .execute("DELETE FROM books WHERE id = ?1", params![id])
            .map_err(|e| AppError::Database(format!("Failed to delete book: {}", e)))?;
        Ok(rows > 0)
    }

    // ========== AUTHOR OPERATIONS ==========

    fn find_authors(&self, name: Option<&str>) -> Result<Vec<Author>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT id, name, created_at FROM authors ORDER BY name")
            .map_err(|e| AppError::Database(format!("Failed to prepare query: {}", e)))?;

        let mut authors = stmt
            .query_map([], Self::row_to_author)
            .map_err(|e| AppError::Database(format!("Failed to find authors: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Database(format!("Failed to collect authors: {}", e)))?;

        if let Some(name) = name.filter(|n| !n.is_empty()) {
            authors.retain(|author| contains_folded(&author.name, name));
        }
        Ok(authors)
    }

    fn find_author(&self, id: &str) -> Result<Option<Author>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, name, created_at FROM authors WHERE id = ?1",
            params![id],
            Self::row_to_author,
        )
        .optional()
        .map_err(|e| AppError::Database(format!("Failed to get author: {}", e)))
    }

    fn save_author(&self, author: &Author) -> Result<()> {
        author.validate()?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO authors (id, name, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name",
            params![author.id, author.name, author.created_at],
        )
        .map_err(|e| AppError::Database(format!("Failed to save author: {}", e)))?;
        Ok(())
    }

    fn remove_author(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let rows = conn
            .execute("DELETE FROM authors WHERE id = ?1", params![id])
            .map_err(|e| AppError::Database(format!("Failed to delete author: {}", e)))?;
        Ok(rows > 0)
    }
}
