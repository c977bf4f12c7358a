//! Sheet Append: an HTTP service that writes JSON payloads as spreadsheet rows.
//!
//! A `POST /` with a JSON object is validated, checked against the configured
//! spreadsheet settings, mapped onto the column table and appended to a Google
//! Sheets spreadsheet with a single `values.append` call.

pub mod config;
pub mod error;
pub mod http;
pub mod identifier;
pub mod middleware;
pub mod routes;
pub mod row;
pub mod sheets;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
