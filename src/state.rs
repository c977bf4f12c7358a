//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::sheets::RowAppender;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// The configuration is fixed for the process lifetime; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub appender: Arc<dyn RowAppender>,
}

impl AppState {
    /// Creates a new application state from the given configuration and backend.
    pub fn new(config: AppConfig, appender: Arc<dyn RowAppender>) -> Self {
        Self {
            config: Arc::new(config),
            appender,
        }
    }
}
