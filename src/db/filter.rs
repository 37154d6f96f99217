//! Conditional book query construction.

use crate::db::Book;
use chrono::NaiveDate;

/// Search conditions for books. Every `None` field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Inclusive upper bound on the publish date.
    pub published_before: Option<NaiveDate>,
    /// Inclusive lower bound on the publish date.
    pub published_after: Option<NaiveDate>,
    /// Exact author ID.
    pub author_id: Option<String>,
}

impl BookFilter {
    /// Filter matching every book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to titles containing `title`. An empty string is ignored.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.is_empty()).then_some(title);
        self
    }

    /// Restrict to books published on or before `date`.
    pub fn published_before(mut self, date: NaiveDate) -> Self {
        self.published_before = Some(date);
        self
    }

    /// Restrict to books published on or after `date`.
    pub fn published_after(mut self, date: NaiveDate) -> Self {
        self.published_after = Some(date);
        self
    }

    /// Restrict to books by one author.
    pub fn author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Whether `book` satisfies every active condition.
    pub fn matches(&self, book: &Book) -> bool {
        let title_ok = self
            .title
            .as_ref()
            .is_none_or(|title| contains_folded(&book.title, title));
        let before_ok = self
            .published_before
            .is_none_or(|before| book.publish_date.is_some_and(|d| d <= before));
        let after_ok = self
            .published_after
            .is_none_or(|after| book.publish_date.is_some_and(|d| d >= after));
        let author_ok = self
            .author_id
            .as_ref()
            .is_none_or(|author_id| &book.author_id == author_id);

        title_ok && before_ok && after_ok && author_ok
    }

    /// Build the `WHERE` clause (empty when no condition is active) and its
    /// positional parameters.
    ///
    /// The title condition is not part of the clause; callers apply it with
    /// [`BookFilter::matches`] on the rows returned.
    pub(crate) fn where_clause(&self) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(before) = self.published_before {
            conditions.push("publish_date <= ?");
            params.push(before.format("%Y-%m-%d").to_string());
        }
        if let Some(after) = self.published_after {
            conditions.push("publish_date >= ?");
            params.push(after.format("%Y-%m-%d").to_string());
        }
        if let Some(author_id) = &self.author_id {
            conditions.push("author_id = ?");
            params.push(author_id.clone());
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

/// Case-insensitive substring test using Unicode lowercase folding.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
