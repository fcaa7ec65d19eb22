//! Client error type.

/// Result alias for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network or transport failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP response
    #[error("HTTP error {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// `detail` or `message` from the error body
        message: String,
    },

    /// The envelope reported `status: error`
    #[error("request rejected: {0}")]
    Rejected(String),

    /// A successful envelope without the payload the endpoint promises
    #[error("response missing {0}")]
    MissingData(&'static str),

    /// Payload did not match the endpoint contract
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local file could not be read for upload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entity does not exist
    #[error("not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Human-readable message suitable for a notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
