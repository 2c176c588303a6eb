//! Unified error types for pastehunt.
//!
//! Every variant carries a stable code prefix so log lines and API error
//! bodies can be grepped regardless of the message text.

/// Unified error types for the pastehunt workspace.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., blank query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Document did not have the expected shape.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::FetchTimeout(_) => "FETCH_TIMEOUT",
            Error::FetchTooLarge(_) => "FETCH_TOO_LARGE",
            Error::HttpError(_) => "HTTP_ERROR",
            Error::ParseFailed(_) => "PARSE_FAILED",
        }
    }

    /// Whether the error came from the network layer rather than from input or markup.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::FetchTimeout(_) | Error::FetchTooLarge(_) | Error::HttpError(_))
    }
}
