use thiserror::Error;

/// Why a poll produced no snapshot.
///
/// The `Display` text is exactly what the signal field shows after `Error: `.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Non-2xx HTTP status
    #[error("HTTP {0}: Server error")]
    Status(u16),
    /// The body parsed but carried an `error` descriptor
    #[error("{}", .details.as_deref().unwrap_or(.error.as_str()))]
    Reported {
        error: String,
        details: Option<String>,
    },
    /// Network/request error
    #[error("{0}")]
    Request(String),
    /// Body was not a valid snapshot
    #[error("{0}")]
    Decode(String),
}
