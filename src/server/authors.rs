//! Author resource handlers.

use crate::db::{Author, BookFilter};
use crate::error::{AppError, Result};
use crate::render::Page;
use crate::server::AppState;
use crate::server::handlers::{MethodOverride, redirect};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

/// Author list search parameters.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorSearch {
    /// Name substring.
    #[serde(default)]
    pub name: String,
}

/// Submitted author fields.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorForm {
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Author list with optional name filter.
pub async fn list_authors(
    State(state): State<AppState>,
    Query(search): Query<AuthorSearch>,
) -> Response {
    match state.store.find_authors(Some(&search.name)) {
        Ok(authors) => state.page(
            Page::AuthorIndex {
                authors: &authors,
                name: &search.name,
            },
            "/",
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Author search failed");
            redirect("/")
        }
    }
}

/// Empty creation form.
pub async fn new_author(State(state): State<AppState>) -> Response {
    state.page(
        Page::AuthorNew {
            author: &Author::new(""),
            error: None,
        },
        "/authors",
    )
}

/// Create an author.
pub async fn create_author(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> Response {
    let author = Author::new(form.name);

    match state.store.save_author(&author) {
        Ok(()) => {
            tracing::info!(author = %author.id, name = %author.name, "Created author");
            redirect(&format!("/authors/{}", author.id))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create author");
            state.page_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                Page::AuthorNew {
                    author: &author,
                    error: Some("Error creating Author"),
                },
                "/authors",
            )
        }
    }
}

/// Author detail with their books.
pub async fn show_author(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let loaded = load_author(&state, &id).and_then(|author| {
        let books = state.store.find_books(&BookFilter::new().author(&author.id))?;
        Ok((author, books))
    });

    match loaded {
        Ok((author, books)) => state.page(
            Page::AuthorShow {
                author: &author,
                books: &books,
            },
            "/",
        ),
        Err(e) => {
            tracing::debug!(error = %e, "Author detail unavailable");
            redirect("/")
        }
    }
}

/// Edit form for an existing author.
pub async fn edit_author(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match load_author(&state, &id) {
        Ok(author) => state.page(
            Page::AuthorEdit {
                author: &author,
                error: None,
            },
            "/authors",
        ),
        Err(e) => {
            tracing::debug!(error = %e, "Author edit form unavailable");
            redirect("/")
        }
    }
}

/// Rename an author.
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> Response {
    let mut author = match load_author(&state, &id) {
        Ok(author) => author,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot update author");
            return redirect("/");
        }
    };

    author.name = form.name;

    match state.store.save_author(&author) {
        Ok(()) => {
            tracing::info!(author = %author.id, "Updated author");
            redirect(&format!("/authors/{}", author.id))
        }
        Err(e) => {
            tracing::warn!(error = %e, author = %author.id, "Failed to update author");
            state.page_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                Page::AuthorEdit {
                    author: &author,
                    error: Some("Error updating Author"),
                },
                "/authors",
            )
        }
    }
}

/// Delete an author. Their books keep the dangling reference.
pub async fn delete_author(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let author = match load_author(&state, &id) {
        Ok(author) => author,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot delete author");
            return redirect("/");
        }
    };

    match state.store.remove_author(&author.id) {
        Ok(_) => {
            tracing::info!(author = %author.id, "Deleted author");
            redirect("/authors")
        }
        Err(e) => {
            tracing::warn!(error = %e, author = %author.id, "Failed to delete author");
            redirect(&format!("/authors/{}", author.id))
        }
    }
}

/// `POST /authors/{id}?_method=PUT|DELETE` from HTML forms.
pub async fn override_author(
    state: State<AppState>,
    path: Path<String>,
    Query(method): Query<MethodOverride>,
    form: Form<AuthorForm>,
) -> Response {
    match method.method() {
        Some(Method::PUT) => update_author(state, path, form).await,
        Some(Method::DELETE) => delete_author(state, path).await,
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

fn load_author(state: &AppState, id: &str) -> Result<Author> {
    state
        .store
        .find_author(id)?
        .ok_or_else(|| AppError::NotFound(format!("Author not found: {}", id)))
}
