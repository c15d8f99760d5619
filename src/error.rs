use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by commands and the API client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Octopus server returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Invalid server URL '{0}'")]
    InvalidServerUrl(String),

    #[error("API key contains characters that can't be sent in a header")]
    InvalidApiKey,

    #[error("Failed to serialise output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} output is not implemented")]
    Unsupported(&'static str),

    #[error("Cancelled before the query finished")]
    Cancelled,
}
