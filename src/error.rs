use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::MissingConfig;
use crate::sheets::AppendError;

pub const NO_DATA_MESSAGE: &str = "Bad Request: No data provided.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Empty, absent or `{}` body
    #[error("{}", NO_DATA_MESSAGE)]
    NoData,

    /// Body present but not a JSON object
    #[error("Bad Request: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Configuration(#[from] MissingConfig),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Could not append to sheet: {0}")]
    Backend(String),
}

impl From<AppendError> for AppError {
    fn from(err: AppendError) -> Self {
        match err {
            AppendError::Authentication(message) => AppError::Authentication(message),
            AppendError::Backend(message) => AppError::Backend(message),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoData | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short category reported in the `error` field of 500 responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NoData | AppError::InvalidBody(_) => "bad_request",
            AppError::Configuration(_) => "configuration",
            AppError::Authentication(_) => "authentication",
            AppError::Backend(_) => "backend",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::NoData | AppError::InvalidBody(_) => {
                tracing::warn!(error = %self, "Rejected request body");
                json!({ "error": self.to_string() })
            }
            AppError::Configuration(missing) => {
                tracing::error!(missing = ?missing.missing, "Server configuration is incomplete");
                json!({
                    "status": "error",
                    "error": self.kind(),
                    "message": self.to_string(),
                    "details": missing.missing,
                })
            }
            AppError::Authentication(_) | AppError::Backend(_) => {
                tracing::error!(kind = self.kind(), error = %self, "Error appending to sheet");
                json!({
                    "status": "error",
                    "error": self.kind(),
                    "message": self.to_string(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_no_data() {
        let (status, body) = render(AppError::NoData).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Bad Request: No data provided." }));
    }

    #[tokio::test]
    async fn test_configuration_lists_missing_values() {
        let err = AppError::from(MissingConfig {
            missing: vec!["SPREADSHEET_ID", "GOOGLE_CREDENTIALS"],
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "configuration");
        assert_eq!(
            body["message"],
            "Server configuration is missing: SPREADSHEET_ID, GOOGLE_CREDENTIALS"
        );
        assert_eq!(body["details"], json!(["SPREADSHEET_ID", "GOOGLE_CREDENTIALS"]));
    }

    #[tokio::test]
    async fn test_backend_error_carries_detail() {
        let err = AppError::from(AppendError::Backend("Unable to parse range: Nope!A1".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "backend");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Unable to parse range"));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_authentication_error() {
        let err = AppError::from(AppendError::Authentication("bad key".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "authentication");
        assert_eq!(body["message"], "Authentication failed: bad key");
    }
}
