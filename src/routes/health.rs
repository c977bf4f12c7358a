//! Health check endpoint for container orchestration.
//!
//! Returns 200 OK whenever the process can answer HTTP, regardless of whether
//! the spreadsheet settings are complete.

/// Health check handler.
pub async fn health() -> &'static str {
    "ok"
}
