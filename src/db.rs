mod filter;
mod schema;

pub use filter::BookFilter;
pub use schema::Database;

use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Unique author ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: i64,
}

impl Author {
    /// Create a new author with a fresh ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now_timestamp(),
        }
    }

    /// Check the fields the store requires.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("author name is required".to_string()));
        }
        Ok(())
    }
}

/// Catalog book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique book ID.
    pub id: String,
    /// Book title.
    pub title: String,
    /// ID of the referenced author.
    pub author_id: String,
    /// Publication date, `None` when the submitted value could not be parsed.
    pub publish_date: Option<NaiveDate>,
    /// Page count, `None` when missing or not a number.
    pub page_count: Option<i64>,
    /// Free-form description.
    pub description: String,
    /// Raw cover image bytes.
    #[serde(skip)]
    pub cover_image: Option<Vec<u8>>,
    /// MIME type of the cover image.
    pub cover_image_type: Option<String>,
    /// Creation timestamp.
    pub created_at: i64,
}

impl Book {
    /// Create an empty book with a fresh ID.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: String::new(),
            author_id: String::new(),
            publish_date: None,
            page_count: None,
            description: String::new(),
            cover_image: None,
            cover_image_type: None,
            created_at: now_timestamp(),
        }
    }

    /// Check the fields the store requires.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        if self.author_id.trim().is_empty() {
            return Err(AppError::Validation("author is required".to_string()));
        }
        if self.publish_date.is_none() {
            return Err(AppError::Validation(
                "publish date is missing or invalid".to_string(),
            ));
        }
        if self.page_count.is_none() {
            return Err(AppError::Validation("page count is required".to_string()));
        }
        Ok(())
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

/// Persistence operations the HTTP layer depends on.
///
/// `save_*` insert or update by ID. `remove_*` return whether a row existed.
pub trait CatalogStore: Send + Sync {
    /// Books matching every active condition of `filter`.
    fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>>;
    /// Most recently created books, newest first.
    fn recent_books(&self, limit: usize) -> Result<Vec<Book>>;
    /// Book by ID.
    fn find_book(&self, id: &str) -> Result<Option<Book>>;
    /// Insert or update a book.
    fn save_book(&self, book: &Book) -> Result<()>;
    /// Delete a book.
    fn remove_book(&self, id: &str) -> Result<bool>;

    /// Authors, optionally restricted to a case-insensitive name substring.
    fn find_authors(&self, name: Option<&str>) -> Result<Vec<Author>>;
    /// Author by ID.
    fn find_author(&self, id: &str) -> Result<Option<Author>>;
    /// Insert or update an author.
    fn save_author(&self, author: &Author) -> Result<()>;
    /// Delete an author. Books referencing it are left untouched.
    fn remove_author(&self, id: &str) -> Result<bool>;
}

/// Parse a submitted date.
///
/// Accepts `YYYY-MM-DD` (what HTML date inputs send) and RFC 3339 timestamps.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Timestamp helper.
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}
