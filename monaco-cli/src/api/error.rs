//! Error taxonomy for the sync client

use thiserror::Error;

/// Errors surfaced by [`crate::api::DynatraceClient`] operations.
///
/// Every operation stops at the first failing HTTP call and returns that
/// call's error unchanged.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No remote object of the family carries the requested name
    #[error("404 - no config found with name '{name}' for API {api}")]
    NotFound { api: String, name: String },

    /// The server answered with a non-2xx status
    #[error("{method} {url} failed with HTTP {status}: {body}")]
    Http {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    /// The request could not be completed at all (connect, timeout, TLS, ...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The token cannot be carried in an `Authorization` header
    #[error("API token is not a valid HTTP header value")]
    InvalidToken(#[source] reqwest::header::InvalidHeaderValue),

    /// The server answered 2xx but the body could not be decoded
    #[error("malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid extension '{name}': {reason}")]
    InvalidExtension { name: String, reason: String },

    /// The local extension is older than the one already installed
    #[error(
        "extension '{name}' has version {local}, which is lower than the installed version {remote}"
    )]
    ExtensionDowngrade {
        name: String,
        local: String,
        remote: String,
    },

    #[error("failed to package extension archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error while writing extension archive: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Whether this error is the negative-lookup case of `read_by_name`
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound { .. })
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Http { status, .. } => Some(*status),
            SyncError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
