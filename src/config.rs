//! Configuration loading and constants.
//!
//! Configuration is assembled once at startup from an optional TOML file and the
//! process environment, then shared read-only with every request. Values that the
//! append path needs (spreadsheet, sheet, credentials) are allowed to be absent at
//! startup; the per-request guard in [`SheetsConfig::guard`] reports them instead.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::row::{default_columns, ColumnSpec, RowLayout};
use crate::sheets::{AppendRange, CredentialSource};

// =============================================================================
// Defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listening port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Seconds to wait for in-flight requests on shutdown
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

/// Sheet used when neither the file nor the environment names one
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "sheet_append=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_SPREADSHEET_ID: &str = "SPREADSHEET_ID";
pub const ENV_SHEET_NAME: &str = "SHEET_NAME";
pub const ENV_CREDENTIALS_FILE: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const ENV_CREDENTIALS_JSON: &str = "GOOGLE_CREDENTIALS";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ANCHOR_TOP_LEFT: &str = "ANCHOR_TOP_LEFT";
pub const ENV_FORCE_LITERAL_DATE: &str = "FORCE_LITERAL_DATE";

/// Name reported by the guard when no credential source is configured.
/// Either credential variable satisfies it.
pub const CREDENTIALS_SETTING: &str = ENV_CREDENTIALS_JSON;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Spreadsheet target and credentials
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Column-mapping table, in spreadsheet column order
    #[serde(default = "default_columns")]
    pub columns: Vec<ColumnSpec>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            sheets: SheetsConfig::default(),
            columns: default_columns(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Graceful shutdown drain period in seconds (default: 30)
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }
}

/// Spreadsheet settings. Empty strings are treated the same as unset values.
#[derive(Clone, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    #[serde(default = "SheetsConfig::default_sheet_name")]
    pub sheet_name: Option<String>,
    /// Path to a service-account key file
    pub credentials_file: Option<PathBuf>,
    /// Inline service-account key JSON; takes precedence over `credentials_file`
    pub credentials_json: Option<String>,
    /// Append against `<sheet>!A1` rather than the bare sheet name
    #[serde(default = "SheetsConfig::default_anchor_top_left")]
    pub anchor_top_left: bool,
    /// Write the date column as literal text instead of letting the backend parse it
    #[serde(default)]
    pub force_literal_date: bool,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheet_name: Self::default_sheet_name(),
            credentials_file: None,
            credentials_json: None,
            anchor_top_left: Self::default_anchor_top_left(),
            force_literal_date: false,
        }
    }
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("credentials_file", &self.credentials_file)
            .field(
                "credentials_json",
                &self.credentials_json.as_ref().map(|_| "<redacted>"),
            )
            .field("anchor_top_left", &self.anchor_top_left)
            .field("force_literal_date", &self.force_literal_date)
            .finish()
    }
}

/// Which required settings are present. Never carries the values themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigPresence {
    #[serde(rename = "SPREADSHEET_ID")]
    pub spreadsheet_id: bool,
    #[serde(rename = "GOOGLE_CREDENTIALS")]
    pub credentials: bool,
    #[serde(rename = "SHEET_NAME")]
    pub sheet_name: bool,
    #[serde(rename = "allSet")]
    pub all_set: bool,
}

/// A fully configured append destination, produced by the guard.
#[derive(Debug, Clone)]
pub struct AppendTarget {
    pub spreadsheet_id: String,
    pub range: AppendRange,
    pub credentials: CredentialSource,
}

/// Required settings that were absent when a request arrived.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Server configuration is missing: {}", .missing.join(", "))]
pub struct MissingConfig {
    pub missing: Vec<&'static str>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl SheetsConfig {
    fn default_sheet_name() -> Option<String> {
        Some(DEFAULT_SHEET_NAME.to_string())
    }

    fn default_anchor_top_left() -> bool {
        true
    }

    /// Resolve the configured credential source, preferring inline JSON.
    pub fn credentials(&self) -> Option<CredentialSource> {
        if let Some(json) = non_empty(self.credentials_json.as_ref()) {
            return Some(CredentialSource::InlineJson(json.to_string()));
        }
        self.credentials_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| CredentialSource::FilePath(path.clone()))
    }

    pub fn presence(&self) -> ConfigPresence {
        let spreadsheet_id = non_empty(self.spreadsheet_id.as_ref()).is_some();
        let credentials = self.credentials().is_some();
        let sheet_name = non_empty(self.sheet_name.as_ref()).is_some();
        ConfigPresence {
            spreadsheet_id,
            credentials,
            sheet_name,
            all_set: spreadsheet_id && credentials && sheet_name,
        }
    }

    /// Confirm every required value is set and build the append destination.
    ///
    /// Runs on every request, before any credential is read.
    pub fn guard(&self) -> Result<AppendTarget, MissingConfig> {
        let spreadsheet_id = non_empty(self.spreadsheet_id.as_ref());
        let sheet_name = non_empty(self.sheet_name.as_ref());
        let credentials = self.credentials();

        match (spreadsheet_id, sheet_name, credentials) {
            (Some(spreadsheet_id), Some(sheet_name), Some(credentials)) => Ok(AppendTarget {
                spreadsheet_id: spreadsheet_id.to_string(),
                range: AppendRange::new(sheet_name, self.anchor_top_left),
                credentials,
            }),
            (spreadsheet_id, sheet_name, credentials) => {
                let mut missing = Vec::new();
                if spreadsheet_id.is_none() {
                    missing.push(ENV_SPREADSHEET_ID);
                }
                if sheet_name.is_none() {
                    missing.push(ENV_SHEET_NAME);
                }
                if credentials.is_none() {
                    missing.push(CREDENTIALS_SETTING);
                }
                Err(MissingConfig { missing })
            }
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Validation(format!(
            "{} must be true or false, got '{}'",
            name, other
        ))),
    }
}

impl AppConfig {
    /// Load configuration from the process environment and an optional TOML file.
    pub fn from_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load(path, |key| std::env::var(key).ok())
    }

    /// Load configuration, reading environment overrides through `env`.
    pub fn load<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents)?
            }
            None => AppConfig::default(),
        };
        config.apply_env(env)?;

        if config.columns.is_empty() {
            return Err(ConfigError::Validation(
                "No columns configured. Add [[columns]] sections or omit them for the default layout"
                    .to_string(),
            ));
        }

        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env(ENV_SPREADSHEET_ID) {
            self.sheets.spreadsheet_id = Some(value);
        }
        if let Some(value) = env(ENV_SHEET_NAME) {
            self.sheets.sheet_name = Some(value);
        }
        if let Some(value) = env(ENV_CREDENTIALS_FILE) {
            self.sheets.credentials_file = Some(PathBuf::from(value));
        }
        if let Some(value) = env(ENV_CREDENTIALS_JSON) {
            self.sheets.credentials_json = Some(value);
        }
        if let Some(value) = env(ENV_HOST) {
            self.http.host = value;
        }
        if let Some(value) = env(ENV_PORT) {
            self.http.port = value.trim().parse().map_err(|_| {
                ConfigError::Validation(format!(
                    "{} must be a port number, got '{}'",
                    ENV_PORT, value
                ))
            })?;
        }
        if let Some(value) = env(ENV_ANCHOR_TOP_LEFT) {
            self.sheets.anchor_top_left = parse_bool(ENV_ANCHOR_TOP_LEFT, &value)?;
        }
        if let Some(value) = env(ENV_FORCE_LITERAL_DATE) {
            self.sheets.force_literal_date = parse_bool(ENV_FORCE_LITERAL_DATE, &value)?;
        }
        Ok(())
    }

    /// Row layout derived from the column table and the literal-date switch.
    pub fn row_layout(&self) -> RowLayout<'_> {
        RowLayout::new(&self.columns, self.sheets.force_literal_date)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::ColumnKind;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn complete_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_SPREADSHEET_ID, "sheet-123"),
            (ENV_SHEET_NAME, "Deliveries"),
            (ENV_CREDENTIALS_FILE, "/etc/keys/service.json"),
        ]
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = AppConfig::load(None, env_from(&[])).unwrap();
        assert_eq!(config.http.host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
        assert_eq!(config.sheets.sheet_name.as_deref(), Some(DEFAULT_SHEET_NAME));
        assert!(config.sheets.anchor_top_left);
        assert!(!config.sheets.force_literal_date);
        assert_eq!(config.columns.len(), 10);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::load(
            None,
            env_from(&[
                (ENV_PORT, "9090"),
                (ENV_HOST, "127.0.0.1"),
                (ENV_FORCE_LITERAL_DATE, "TRUE"),
                (ENV_ANCHOR_TOP_LEFT, "0"),
            ]),
        )
        .unwrap();
        assert_eq!(config.http.port, 9090);
        assert_eq!(config.http.host, "127.0.0.1");
        assert!(config.sheets.force_literal_date);
        assert!(!config.sheets.anchor_top_left);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = AppConfig::load(None, env_from(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        let err =
            AppConfig::load(None, env_from(&[(ENV_FORCE_LITERAL_DATE, "maybe")])).unwrap_err();
        assert!(err.to_string().contains(ENV_FORCE_LITERAL_DATE));
    }

    #[test]
    fn test_file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[http]
port = 3000

[sheets]
spreadsheet_id = "from-file"
sheet_name = "Orders"
force_literal_date = true

[[columns]]
field = "ID"
kind = "identifier"

[[columns]]
field = "WHEN"
kind = "date"

[[columns]]
field = "AMOUNT"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config =
            AppConfig::load(Some(file.path()), env_from(&[(ENV_SPREADSHEET_ID, "from-env")]))
                .unwrap();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.sheets.spreadsheet_id.as_deref(), Some("from-env"));
        assert_eq!(config.sheets.sheet_name.as_deref(), Some("Orders"));
        assert!(config.sheets.force_literal_date);
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.columns[1].kind, ColumnKind::Date);
        assert_eq!(config.columns[2].kind, ColumnKind::Value);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_example_config_matches_default_layout() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/example.toml");
        let config = AppConfig::load(Some(path.as_path()), env_from(&[])).unwrap();
        assert_eq!(config.columns, default_columns());
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
        assert!(config.sheets.spreadsheet_id.is_none());
    }

    #[test]
    fn test_empty_column_table_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "columns = []").unwrap();
        let err = AppConfig::load(Some(file.path()), env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/sheet-append.toml")), env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_guard_complete() {
        let config = AppConfig::load(None, env_from(&complete_env())).unwrap();
        let target = config.sheets.guard().unwrap();
        assert_eq!(target.spreadsheet_id, "sheet-123");
        assert_eq!(target.range.as_ref(), "'Deliveries'!A1");
        assert!(matches!(target.credentials, CredentialSource::FilePath(_)));
        assert!(config.sheets.presence().all_set);
    }

    #[test]
    fn test_guard_reports_each_missing_value() {
        let config = AppConfig::load(None, env_from(&[(ENV_SHEET_NAME, "")])).unwrap();
        let err = config.sheets.guard().unwrap_err();
        assert_eq!(
            err.missing,
            vec![ENV_SPREADSHEET_ID, ENV_SHEET_NAME, CREDENTIALS_SETTING]
        );
        assert!(err.to_string().starts_with("Server configuration is missing"));

        let presence = config.sheets.presence();
        assert!(!presence.spreadsheet_id);
        assert!(!presence.sheet_name);
        assert!(!presence.credentials);
        assert!(!presence.all_set);
    }

    #[test]
    fn test_guard_only_spreadsheet_missing() {
        let env: Vec<_> = complete_env()
            .into_iter()
            .filter(|(k, _)| *k != ENV_SPREADSHEET_ID)
            .collect();
        let config = AppConfig::load(None, env_from(&env)).unwrap();
        assert_eq!(config.sheets.guard().unwrap_err().missing, vec![ENV_SPREADSHEET_ID]);
    }

    #[test]
    fn test_inline_credentials_win_over_file() {
        let mut env = complete_env();
        env.push((ENV_CREDENTIALS_JSON, "{\"client_email\":\"a@b\"}"));
        let config = AppConfig::load(None, env_from(&env)).unwrap();
        assert!(matches!(
            config.sheets.credentials(),
            Some(CredentialSource::InlineJson(_))
        ));
    }

    #[test]
    fn test_empty_inline_credentials_fall_back_to_file() {
        let mut env = complete_env();
        env.push((ENV_CREDENTIALS_JSON, ""));
        let config = AppConfig::load(None, env_from(&env)).unwrap();
        assert!(matches!(
            config.sheets.credentials(),
            Some(CredentialSource::FilePath(_))
        ));
    }

    #[test]
    fn test_debug_redacts_inline_credentials() {
        let config = AppConfig::load(
            None,
            env_from(&[(ENV_CREDENTIALS_JSON, "{\"private_key\":\"secret-material\"}")]),
        )
        .unwrap();
        let rendered = format!("{:?}", config.sheets);
        assert!(!rendered.contains("secret-material"));
        assert!(rendered.contains("<redacted>"));
    }
}
