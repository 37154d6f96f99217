//! Application state shared across handlers.

use crate::config::Config;
use crate::db::{CatalogStore, Database};
use crate::render::{HtmlRenderer, Page, Renderer};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Persistence collaborator.
    pub store: Arc<dyn CatalogStore>,
    /// View collaborator.
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    /// Create application state from explicit collaborators.
    pub fn new(
        config: Config,
        store: Arc<dyn CatalogStore>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            renderer,
        }
    }

    /// Create application state backed by a SQLite database and the HTML renderer.
    pub fn new_with_db(config: Config, db: Database) -> Self {
        let renderer = HtmlRenderer::new(config.server.title.clone());
        Self::new(config, Arc::new(db), Arc::new(renderer))
    }

    /// Render `page` with status 200, or redirect to `fallback` if rendering fails.
    pub fn page(&self, page: Page<'_>, fallback: &str) -> Response {
        self.page_with_status(StatusCode::OK, page, fallback)
    }

    /// Render `page` with `status`, or redirect to `fallback` if rendering fails.
    pub fn page_with_status(&self, status: StatusCode, page: Page<'_>, fallback: &str) -> Response {
        match self.renderer.render(&page) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, template = page.template(), "Failed to render page");
                Redirect::to(fallback).into_response()
            }
        }
    }
}
