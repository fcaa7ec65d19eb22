//! Authentication errors.

use missiondesk_client::ApiError;
use missiondesk_storage::StorageError;

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised by [`crate::AuthService`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session record could not be read or written
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    /// An operation needs a signed-in user
    #[error("not signed in")]
    NotSignedIn,

    /// Email or password is blank
    #[error("email and password are required")]
    MissingCredentials,
}

impl AuthError {
    /// Human-readable message suitable for a notice.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
