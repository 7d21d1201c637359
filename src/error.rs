use thiserror::Error;

/// Errors raised by the client library
#[derive(Error, Debug)]
pub enum SolrError {
    /// Configuration errors (bad handle parameters, missing resolver, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A server is configured but no live handle could be obtained
    #[error("Server unavailable: {0}")]
    Unavailable(String),

    /// The engine rejected or failed the request
    #[error("Request failed: {0}")]
    Request(String),

    /// The response body could not be decoded
    #[error("Response decode error: {0}")]
    Decode(String),

    /// A server-record store collaborator failed
    #[error("Store error: {0}")]
    Store(String),
}

impl SolrError {
    /// True for the error class callers typically report and continue on
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SolrError::Unavailable(_))
    }
}

/// Conversion from reqwest::Error
impl From<reqwest::Error> for SolrError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            SolrError::Unavailable(err.to_string())
        } else {
            SolrError::Request(err.to_string())
        }
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for SolrError {
    fn from(err: serde_json::Error) -> Self {
        SolrError::Decode(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SolrError>;
