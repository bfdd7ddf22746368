//! Places API error types.

/// Errors that can occur when fetching opening hours from the Places API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// API key or place ID not configured
    #[error("missing Google API key or place ID")]
    Config,

    /// Network failure (DNS, timeout, connection reset, ...)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 HTTP status
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Response body was not valid JSON
    #[error("invalid JSON from Google Places: {0}")]
    Json(String),

    /// API reported an `error_message`
    #[error("API error: {0}")]
    Api(String),

    /// API `status` field was not `OK`
    #[error("Places API status: {0}")]
    ApiStatus(String),

    /// Response carried no `weekday_text` array
    #[error("no opening hours available")]
    NoHours,
}
