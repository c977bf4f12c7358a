//! Handler for appending a JSON payload as a spreadsheet row.
//!
//! Order of checks: body, then configuration, then credentials and the remote
//! call. A request rejected by the first two never reaches the backend.

use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::error::AppError;
use crate::identifier;
use crate::middleware::RequestId;
use crate::sheets::AppendRequest;
use crate::state::AppState;

pub const SUCCESS_MESSAGE: &str = "Data saved to Google Sheets successfully!";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    pub success: bool,
    pub status: &'static str,
    pub message: &'static str,
    /// Identifier written to the row
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_range: Option<String>,
}

/// Parse the raw body into a non-empty JSON object.
///
/// Content-Type is not checked. Empty bodies, `null`, `{}` and `[]` count as
/// no data; anything else that is not an object is rejected.
pub fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::NoData);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidBody(format!("Body is not valid JSON ({})", e)))?;

    match value {
        Value::Null => Err(AppError::NoData),
        Value::Object(map) if map.is_empty() => Err(AppError::NoData),
        Value::Array(items) if items.is_empty() => Err(AppError::NoData),
        Value::Object(map) => Ok(map),
        _ => Err(AppError::InvalidBody("Body must be a JSON object".to_string())),
    }
}

/// `POST /` - append one row.
#[instrument(name = "append::submit", skip_all, fields(request_id = %request_id.0))]
pub async fn submit(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<AppendResponse>, AppError> {
    let payload = parse_payload(&body)?;
    let target = state.config.sheets.guard()?;

    let row = state
        .config
        .row_layout()
        .build(&payload, &identifier::generate());
    tracing::debug!(id = %row.identifier, fields = payload.len(), "Built row");

    let outcome = state
        .appender
        .append_row(AppendRequest {
            spreadsheet_id: &target.spreadsheet_id,
            range: &target.range,
            credentials: &target.credentials,
            values: row.values,
        })
        .await?;

    tracing::info!(
        id = %row.identifier,
        updated_range = ?outcome.updated_range,
        "Row appended"
    );

    Ok(Json(AppendResponse {
        success: true,
        status: "success",
        message: SUCCESS_MESSAGE,
        id: row.identifier,
        updated_range: outcome.updated_range,
    }))
}

/// `OPTIONS /` - CORS preflight. Headers are added by the router layers.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bodies_are_no_data() {
        let bodies: [&[u8]; 6] = [b"", b"   \n", b"null", b"{}", b"[]", b" { } "];
        for body in bodies {
            assert!(
                matches!(parse_payload(body), Err(AppError::NoData)),
                "body {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        let err = parse_payload(b"{\"ID\": ").unwrap_err();
        assert!(matches!(err, AppError::InvalidBody(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_non_object_is_invalid() {
        let bodies: [&[u8]; 4] = [b"[1, 2]", b"\"text\"", b"42", b"true"];
        for body in bodies {
            assert!(matches!(parse_payload(body), Err(AppError::InvalidBody(_))));
        }
    }

    #[test]
    fn test_object_is_accepted() {
        let map = parse_payload(br#"{"ID": "X", "extra": null}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["ID"], "X");
    }

    #[test]
    fn test_success_response_shape() {
        let response = AppendResponse {
            success: true,
            status: "success",
            message: SUCCESS_MESSAGE,
            id: "X".to_string(),
            updated_range: Some("Sheet1!A2:J2".to_string()),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["status"], "success");
        assert_eq!(value["updatedRange"], "Sheet1!A2:J2");
    }
}
