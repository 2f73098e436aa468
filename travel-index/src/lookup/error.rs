//! Lookup error types.

/// Errors from the weather and flight services.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the API key
    #[error("unauthorized: check the API key")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The service has nothing for the query
    #[error("no results for {query:?}")]
    NotFound { query: String },

    /// Client cannot be used, e.g. no API key
    #[error("not configured: {0}")]
    NotConfigured(String),
}
