//! Cover image payloads.
//!
//! Forms submit the cover as a JSON string `{"type": "<mime>", "data": "<base64>"}`.
//! Anything unusable is dropped without failing the request.

use crate::db::Book;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;

/// MIME types accepted as cover images.
pub const IMAGE_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

#[derive(Debug, Deserialize)]
struct CoverPayload {
    #[serde(rename = "type")]
    mime_type: Option<String>,
    data: Option<String>,
}

/// Result of applying a cover payload to a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverOutcome {
    /// No payload was supplied; the book is unchanged.
    Absent,
    /// The cover was decoded and stored on the book.
    Stored,
    /// The payload was unusable; the book is unchanged.
    Rejected(String),
}

/// Decode `encoded` and store it on `book` when it is an accepted image.
///
/// A missing, blank or `null` payload is `Absent`.
pub fn apply_cover(book: &mut Book, encoded: Option<&str>) -> CoverOutcome {
    let Some(encoded) = encoded.filter(|e| !e.trim().is_empty()) else {
        return CoverOutcome::Absent;
    };

    let payload = match serde_json::from_str::<Option<CoverPayload>>(encoded) {
        Ok(Some(payload)) => payload,
        Ok(None) => return CoverOutcome::Absent,
        Err(e) => return CoverOutcome::Rejected(format!("malformed payload: {}", e)),
    };

    let mime_type = match payload.mime_type {
        Some(t) if IMAGE_MIME_TYPES.contains(&t.as_str()) => t,
        Some(t) => return CoverOutcome::Rejected(format!("unsupported image type: {}", t)),
        None => return CoverOutcome::Rejected("missing image type".to_string()),
    };

    let Some(data) = payload.data else {
        return CoverOutcome::Rejected("missing image data".to_string());
    };

    match STANDARD.decode(data.trim()) {
        Ok(bytes) => {
            book.cover_image = Some(bytes);
            book.cover_image_type = Some(mime_type);
            CoverOutcome::Stored
        }
        Err(e) => CoverOutcome::Rejected(format!("invalid base64 data: {}", e)),
    }
}

/// `data:` URL for embedding the cover in a page.
pub fn data_url(book: &Book) -> Option<String> {
    match (&book.cover_image, &book.cover_image_type) {
        (Some(bytes), Some(mime_type)) => Some(format!(
            "data:{};charset=utf-8;base64,{}",
            mime_type,
            STANDARD.encode(bytes)
        )),
        _ => None,
    }
}
