//! bookshelf: a small server-rendered catalog of books and authors.
//!
//! Books can be searched by title and publish date range, created, edited
//! and deleted through HTML forms. Each book references an author and may
//! carry a cover image submitted as a base64 JSON payload.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Configuration and CLI.
pub mod config;
/// Cover image payloads.
pub mod cover;
/// Database operations.
pub mod db;
/// Error types.
pub mod error;
/// Page rendering.
pub mod render;
/// HTTP server.
pub mod server;


pub use config::{Cli, Command, Config};
pub use db::Database;
pub use error::{AppError, Result};
pub use server::AppState;
