use std::path::PathBuf;

use google_sheets4::oauth2;

/// Where the service-account key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Path to a key file on disk
    FilePath(PathBuf),
    /// The key JSON itself
    InlineJson(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("could not read service account key at '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse inline service account key: {0}")]
    Parse(std::io::Error),
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::FilePath(path) => f.debug_tuple("FilePath").field(path).finish(),
            CredentialSource::InlineJson(_) => f.write_str("InlineJson(<redacted>)"),
        }
    }
}

impl CredentialSource {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialSource::FilePath(_) => "file",
            CredentialSource::InlineJson(_) => "inline",
        }
    }

    /// Read and parse the key. Called on every append, so a replaced key file
    /// is picked up without a restart.
    pub async fn service_account_key(&self) -> Result<oauth2::ServiceAccountKey, CredentialError> {
        match self {
            CredentialSource::FilePath(path) => oauth2::read_service_account_key(path)
                .await
                .map_err(|source| CredentialError::Read {
                    path: path.display().to_string(),
                    source,
                }),
            CredentialSource::InlineJson(json) => {
                oauth2::parse_service_account_key(json).map_err(CredentialError::Parse)
            }
        }
    }
}
