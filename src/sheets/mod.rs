//! Google Sheets access.
//!
//! Resolves service-account credentials from either a key file or inline JSON,
//! formats the append range, and performs the `values.append` call. Handlers
//! depend only on the [`RowAppender`] trait so tests can substitute a fake.

mod client;
mod credentials;
mod range;

pub use client::{AppendError, AppendOutcome, AppendRequest, GoogleSheetsAppender, RowAppender};
pub use credentials::{CredentialError, CredentialSource};
pub use range::AppendRange;
