//! Session store abstraction.

use async_trait::async_trait;
use missiondesk_core::User;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence for the minimal session record (user id and email).
///
/// This is the only client-side state that survives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted user, if any.
    async fn load_user(&self) -> Result<Option<User>>;

    /// Persist the signed-in user, replacing any previous record.
    async fn save_user(&self, user: &User) -> Result<()>;

    /// Forget the persisted user. Clearing an empty store is not an error.
    async fn clear_user(&self) -> Result<()>;
}
