//! In-memory session store.

use missiondesk_core::User;
use tokio::sync::Mutex;
use super::{Result, SessionStore};

/// Session store that forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    user: Mutex<Option<User>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session.
    pub fn with_user(user: User) -> Self {
        Self { user: Mutex::new(Some(user)) }
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn load_user(&self) -> Result<Option<User>> {
        Ok(self.user.lock().await.clone())
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        *self.user.lock().await = Some(user.clone());
        Ok(())
    }

    async fn clear_user(&self) -> Result<()> {
        *self.user.lock().await = None;
        Ok(())
    }
}
