//! Status pages reporting which settings are configured.
//!
//! Only SET/MISSING flags are exposed; spreadsheet IDs and credentials are
//! never echoed.

use axum::{extract::State, Json};

use crate::config::{
    ConfigPresence, CREDENTIALS_SETTING, ENV_SHEET_NAME, ENV_SPREADSHEET_ID,
};
use crate::state::AppState;

fn flag(present: bool) -> &'static str {
    if present {
        "SET"
    } else {
        "MISSING"
    }
}

fn render_status(presence: &ConfigPresence) -> String {
    format!(
        "Sheet append service is running.\n{}: {}\n{}: {}\n{}: {}\n",
        ENV_SPREADSHEET_ID,
        flag(presence.spreadsheet_id),
        ENV_SHEET_NAME,
        flag(presence.sheet_name),
        CREDENTIALS_SETTING,
        flag(presence.credentials),
    )
}

/// `GET /` - plain-text status with configuration presence.
pub async fn index(State(state): State<AppState>) -> String {
    render_status(&state.config.sheets.presence())
}

/// `GET /config` - presence flags as JSON.
pub async fn config_flags(State(state): State<AppState>) -> Json<ConfigPresence> {
    Json(state.config.sheets.presence())
}
