//! HTTP server and routes.

mod authors;
mod books;
mod handlers;
mod state;

pub use books::SearchOptions;
pub use handlers::MethodOverride;
pub use state::AppState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let book_routes = Router::new()
        .route("/", get(books::list_books).post(books::create_book))
        .route("/new", get(books::new_book))
        .route(
            "/{id}",
            get(books::show_book)
                .put(books::update_book)
                .delete(books::delete_book)
                .post(books::override_book),
        )
        .route("/{id}/edit", get(books::edit_book))
        .route("/{id}/cover", get(books::book_cover));

    let author_routes = Router::new()
        .route("/", get(authors::list_authors).post(authors::create_author))
        .route("/new", get(authors::new_author))
        .route(
            "/{id}",
            get(authors::show_author)
                .put(authors::update_author)
                .delete(authors::delete_author)
                .post(authors::override_author),
        )
        .route("/{id}/edit", get(authors::edit_author));

    let max_body_bytes = state.config.server.max_body_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .nest("/books", book_routes)
        .nest("/authors", author_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
