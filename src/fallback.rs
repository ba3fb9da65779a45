//! The resilience boundary around external generation services.
//!
//! Title/description, article body, and cover image generation all follow the
//! same shape: try one external request, and on any failure produce local
//! content instead. [`attempt_or`] is that shape. Nothing that fails inside
//! `call` escapes it; the failure is logged and `fallback` runs.
//!
//! There are no retries. One attempt, then fallback.

use log::warn;
use thiserror::Error;

/// Why an external generation request did not produce usable output.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service answered with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run `call`; if it fails, log why and return `fallback()` instead.
///
/// `what` names the artifact in the log line (e.g. `"article body for 'x'"`).
pub fn attempt_or<T, C, F>(what: &str, call: C, fallback: F) -> T
where
    C: FnOnce() -> Result<T, ServiceError>,
    F: FnOnce() -> T,
{
    match call() {
        Ok(value) => value,
        Err(e) => {
            warn!("{what}: {e}; using fallback");
            fallback()
        }
    }
}
