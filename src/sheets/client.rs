use async_trait::async_trait;
use google_sheets4::api::{Scope, ValueRange};
use google_sheets4::hyper::client::HttpConnector;
use google_sheets4::{hyper, hyper_rustls, oauth2, Sheets};
use serde_json::Value;
use tracing::instrument;

use super::credentials::{CredentialError, CredentialSource};
use super::range::AppendRange;

/// Let the backend parse numbers and dates as if typed into the UI.
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;
type HttpsClient = hyper::Client<HttpsConnector>;
type SheetsHub = Sheets<HttpsConnector>;

/// A single-row append.
#[derive(Debug)]
pub struct AppendRequest<'a> {
    pub spreadsheet_id: &'a str,
    pub range: &'a AppendRange,
    pub credentials: &'a CredentialSource,
    pub values: Vec<Value>,
}

/// What the backend reported after appending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Range the row was written to, e.g. `Sheet1!A42:J42`
    pub updated_range: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppendError {
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Backend(String),
}

impl From<CredentialError> for AppendError {
    fn from(err: CredentialError) -> Self {
        AppendError::Authentication(err.to_string())
    }
}

/// Appends one row to a spreadsheet.
///
/// The call is a single remote operation: it either writes the whole row or
/// nothing. There is no retry.
#[async_trait]
pub trait RowAppender: Send + Sync {
    async fn append_row(&self, request: AppendRequest<'_>) -> Result<AppendOutcome, AppendError>;
}

/// [`RowAppender`] backed by the Google Sheets v4 API.
///
/// The HTTPS connection pool is shared; the authenticator is built per call
/// from the request's credential source.
#[derive(Clone)]
pub struct GoogleSheetsAppender {
    client: HttpsClient,
}

impl GoogleSheetsAppender {
    /// Fails when the platform's root certificates cannot be loaded.
    pub fn new() -> Result<Self, std::io::Error> {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();
        Ok(Self {
            client: hyper::Client::builder().build(connector),
        })
    }

    async fn hub(&self, credentials: &CredentialSource) -> Result<SheetsHub, AppendError> {
        let key = credentials.service_account_key().await?;
        let auth = oauth2::ServiceAccountAuthenticator::with_client(key, self.client.clone())
            .build()
            .await
            .map_err(|e| {
                AppendError::Authentication(format!("could not create authenticator: {}", e))
            })?;
        Ok(Sheets::new(self.client.clone(), auth))
    }
}

fn classify(err: google_sheets4::Error) -> AppendError {
    if matches!(err, google_sheets4::Error::MissingToken(_)) {
        AppendError::Authentication(format!("could not obtain access token: {}", err))
    } else {
        AppendError::Backend(err.to_string())
    }
}

#[async_trait]
impl RowAppender for GoogleSheetsAppender {
    #[instrument(
        name = "sheets::append_row",
        skip(self, request),
        fields(
            spreadsheet_id = %request.spreadsheet_id,
            range = %request.range,
            credentials = request.credentials.kind(),
            cells = request.values.len(),
        )
    )]
    async fn append_row(&self, request: AppendRequest<'_>) -> Result<AppendOutcome, AppendError> {
        let hub = self.hub(request.credentials).await?;

        let value_range = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(vec![request.values]),
        };

        let (_, response) = hub
            .spreadsheets()
            .values_append(value_range, request.spreadsheet_id, request.range.as_ref())
            .value_input_option(VALUE_INPUT_OPTION)
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .map_err(classify)?;

        let updated_range = response.updates.and_then(|updates| updates.updated_range);
        tracing::debug!(updated_range = ?updated_range, "Sheets append completed");

        Ok(AppendOutcome { updated_range })
    }
}
