//! Book resource handlers.

use crate::cover::{self, CoverOutcome};
use crate::db::{self, Book, BookFilter};
use crate::error::{AppError, Result};
use crate::render::Page;
use crate::server::AppState;
use crate::server::handlers::{MethodOverride, redirect};
use axum::{
    Form,
    body::Body,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

const ERROR_CREATING: &str = "Error Creating Books";
const ERROR_UPDATING: &str = "Error Updating Book";
const ERROR_DELETING: &str = "Could not delete book";

/// Search parameters for the book list, echoed back to the page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Title substring.
    #[serde(default)]
    pub title: String,
    /// Latest publish date, inclusive.
    #[serde(default)]
    pub published_before: String,
    /// Earliest publish date, inclusive.
    #[serde(default)]
    pub published_after: String,
}

impl SearchOptions {
    /// Build a filter from the non-empty parameters.
    pub fn to_filter(&self) -> Result<BookFilter> {
        let mut filter = BookFilter::new().title(self.title.as_str());

        if !self.published_before.is_empty() {
            filter = filter.published_before(parse_bound("publishedBefore", &self.published_before)?);
        }
        if !self.published_after.is_empty() {
            filter = filter.published_after(parse_bound("publishedAfter", &self.published_after)?);
        }

        Ok(filter)
    }
}

fn parse_bound(name: &str, value: &str) -> Result<chrono::NaiveDate> {
    db::parse_date(value)
        .ok_or_else(|| AppError::InvalidInput(format!("{} is not a date: {}", name, value)))
}

/// Submitted book fields, shared by create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Author ID.
    #[serde(default)]
    pub author: String,
    /// Publish date as typed by the user.
    #[serde(default)]
    pub publish_date: String,
    /// Page count as typed by the user.
    #[serde(default)]
    pub page_count: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// JSON cover payload.
    pub cover: Option<String>,
}

impl BookForm {
    /// Overwrite every mutable field except the cover.
    fn apply_to(&self, book: &mut Book) {
        book.title = self.title.clone();
        book.author_id = self.author.clone();
        book.publish_date = db::parse_date(&self.publish_date);
        book.page_count = self.page_count.trim().parse().ok();
        book.description = self.description.clone();
    }
}

/// Query parameters of the detail page.
#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// Set to `delete` after a failed delete.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKind {
    New,
    Edit,
}

/// Book list with optional filters.
pub async fn list_books(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchOptions>, QueryRejection>,
) -> Response {
    let Ok(Query(search)) = query else {
        return redirect("/");
    };

    let books = match search
        .to_filter()
        .and_then(|filter| state.store.find_books(&filter))
    {
        Ok(books) => books,
        Err(e) => {
            tracing::warn!(error = %e, "Book search failed");
            return redirect("/");
        }
    };

    state.page(
        Page::BookIndex {
            books: &books,
            title: &search.title,
            published_before: &search.published_before,
            published_after: &search.published_after,
        },
        "/",
    )
}

/// Empty creation form.
pub async fn new_book(State(state): State<AppState>) -> Response {
    render_form_page(&state, &Book::new(), FormKind::New, false)
}

/// Create a book from the submitted form.
pub async fn create_book(State(state): State<AppState>, Form(form): Form<BookForm>) -> Response {
    let mut book = Book::new();
    form.apply_to(&mut book);
    let outcome = cover::apply_cover(&mut book, form.cover.as_deref());
    log_cover(&book, outcome);

    match state.store.save_book(&book) {
        Ok(()) => {
            tracing::info!(book = %book.id, title = %book.title, "Created book");
            redirect(&format!("/books/{}", book.id))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create book");
            render_form_page(&state, &book, FormKind::New, true)
        }
    }
}

/// Book detail with its author resolved.
pub async fn show_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: std::result::Result<Query<DetailQuery>, QueryRejection>,
) -> Response {
    let book = match load_book(&state, &id) {
        Ok(book) => book,
        Err(e) => {
            tracing::debug!(error = %e, "Book detail unavailable");
            return redirect("/");
        }
    };

    let author = match state.store.find_author(&book.author_id) {
        Ok(author) => author,
        Err(e) => {
            tracing::warn!(error = %e, book = %id, "Failed to resolve author");
            return redirect("/");
        }
    };

    let query = query.map(|Query(q)| q).unwrap_or_default();
    let error = (query.error.as_deref() == Some("delete")).then_some(ERROR_DELETING);

    state.page(
        Page::BookShow {
            book: &book,
            author: author.as_ref(),
            error,
        },
        "/",
    )
}

/// Edit form for an existing book.
pub async fn edit_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match load_book(&state, &id) {
        Ok(book) => render_form_page(&state, &book, FormKind::Edit, false),
        Err(e) => {
            tracing::debug!(error = %e, "Book edit form unavailable");
            redirect("/")
        }
    }
}

/// Overwrite a book with the submitted form.
///
/// The cover is only replaced when a non-empty payload is supplied.
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> Response {
    let mut book = match load_book(&state, &id) {
        Ok(book) => book,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot update book");
            return redirect("/");
        }
    };

    form.apply_to(&mut book);
    if let Some(payload) = form.cover.as_deref().filter(|c| !c.is_empty()) {
        let outcome = cover::apply_cover(&mut book, Some(payload));
        log_cover(&book, outcome);
    }

    match state.store.save_book(&book) {
        Ok(()) => {
            tracing::info!(book = %book.id, "Updated book");
            redirect(&format!("/books/{}", book.id))
        }
        Err(e) => {
            tracing::warn!(error = %e, book = %book.id, "Failed to update book");
            render_form_page(&state, &book, FormKind::Edit, true)
        }
    }
}

/// Delete a book.
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let book = match load_book(&state, &id) {
        Ok(book) => book,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot delete book");
            return redirect("/");
        }
    };

    match state.store.remove_book(&book.id) {
        Ok(_) => {
            tracing::info!(book = %book.id, "Deleted book");
            redirect("/books")
        }
        Err(e) => {
            tracing::warn!(error = %e, book = %book.id, "Failed to delete book");
            redirect(&format!("/books/{}?error=delete", book.id))
        }
    }
}

/// `POST /books/{id}?_method=PUT|DELETE` from HTML forms.
pub async fn override_book(
    state: State<AppState>,
    path: Path<String>,
    Query(method): Query<MethodOverride>,
    form: Form<BookForm>,
) -> Response {
    match method.method() {
        Some(Method::PUT) => update_book(state, path, form).await,
        Some(Method::DELETE) => delete_book(state, path).await,
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// Stored cover image.
pub async fn book_cover(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response<Body>> {
    let book = load_book(&state, &id)?;

    let (Some(data), Some(mime_type)) = (book.cover_image, book.cover_image_type) else {
        return Err(AppError::NotFound(format!("Cover not found: {}", id)));
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build cover response: {}", e)))?)
}

fn load_book(state: &AppState, id: &str) -> Result<Book> {
    state
        .store
        .find_book(id)?
        .ok_or_else(|| AppError::NotFound(format!("Book not found: {}", id)))
}

/// Render the new or edit form. Authors are always reloaded.
fn render_form_page(state: &AppState, book: &Book, form: FormKind, has_error: bool) -> Response {
    let authors = match state.store.find_authors(None) {
        Ok(authors) => authors,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load authors for book form");
            return redirect("/books");
        }
    };

    let page = match form {
        FormKind::New => Page::BookNew {
            book,
            authors: &authors,
            error: has_error.then_some(ERROR_CREATING),
        },
        FormKind::Edit => Page::BookEdit {
            book,
            authors: &authors,
            error: has_error.then_some(ERROR_UPDATING),
        },
    };

    let status = if has_error {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };

    state.page_with_status(status, page, "/books")
}

fn log_cover(book: &Book, outcome: CoverOutcome) {
    match outcome {
        CoverOutcome::Stored => {
            tracing::debug!(book = %book.id, mime = ?book.cover_image_type, "Stored cover image")
        }
        CoverOutcome::Rejected(reason) => {
            tracing::warn!(book = %book.id, %reason, "Ignoring cover payload")
        }
        CoverOutcome::Absent => {}
    }
}
