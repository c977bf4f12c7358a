//! Sheet Append: JSON-over-HTTP to Google Sheets.
//!
//! This is the application entry point. It initializes tracing, loads configuration
//! from the environment (and an optional TOML file), sets up the Axum router with
//! the Google Sheets backend, and starts the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheet_append::config::{AppConfig, LoggingConfig, DEFAULT_LOG_FILTER};
use sheet_append::http::start_server;
use sheet_append::sheets::GoogleSheetsAppender;
use sheet_append::{create_router, AppState};

/// Sheet Append: append JSON payloads as rows to a Google Sheets spreadsheet
#[derive(Parser, Debug)]
#[command(name = "sheet-append", version, about)]
struct Args {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "sheet_append=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(filter: &str, logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration first: the log format lives in it
    let config = AppConfig::from_env(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    let presence = config.sheets.presence();
    tracing::info!(
        spreadsheet_id = presence.spreadsheet_id,
        sheet_name = presence.sheet_name,
        credentials = config.sheets.credentials().map(|c| c.kind()).unwrap_or("missing"),
        anchor_top_left = config.sheets.anchor_top_left,
        force_literal_date = config.sheets.force_literal_date,
        columns = config.columns.len(),
        "Loaded configuration"
    );
    if !presence.all_set {
        tracing::warn!("Spreadsheet configuration is incomplete; appends will fail until it is set");
    }
    if config.sheets.credentials_json.is_some() && config.sheets.credentials_file.is_some() {
        tracing::info!("Both inline and file credentials are set; using inline credentials");
    }

    let http_config = config.http.clone();
    let state = AppState::new(config, Arc::new(GoogleSheetsAppender::new()?));
    let app = create_router(state);

    start_server(app, &http_config).await?;

    Ok(())
}
