//! Handlers and helpers shared by the resource routes.

use crate::render::Page;
use crate::server::AppState;
use axum::{
    extract::State,
    http::Method,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

/// Number of books on the home page.
const RECENT_BOOKS: usize = 10;

/// Home page with the most recently added books.
pub async fn index(State(state): State<AppState>) -> Response {
    let books = state.store.recent_books(RECENT_BOOKS).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load recent books");
        Vec::new()
    });

    state.page(Page::Home { books: &books }, "/books")
}

/// `_method` query parameter letting HTML forms issue PUT and DELETE.
#[derive(Debug, Default, Deserialize)]
pub struct MethodOverride {
    #[serde(rename = "_method")]
    method: Option<String>,
}

impl MethodOverride {
    /// The overriding method, if it is one the resource routes accept.
    pub fn method(&self) -> Option<Method> {
        match self.method.as_deref()?.to_ascii_uppercase().as_str() {
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        }
    }
}

/// Redirect with 303 See Other.
pub(crate) fn redirect(to: &str) -> Response {
    Redirect::to(to).into_response()
}
