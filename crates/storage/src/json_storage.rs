//! JSON file session store.
//!
//! Stores the session record as `session.json` inside a `.missiondesk`
//! directory, next to a `saved_at` marker so stale sessions are visible when
//! inspecting the file by hand.

use std::path::{Path, PathBuf};
use missiondesk_core::{Time, User};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;
use super::{Result, SessionStore};

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    user: User,
    saved_at: Time,
}

/// File-based session store.
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    root: PathBuf,
}

impl JsonSessionStore {
    /// Create the store, creating `root` if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Location of the session file.
    pub fn session_path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }
}

#[async_trait::async_trait]
impl SessionStore for JsonSessionStore {
    async fn load_user(&self) -> Result<Option<User>> {
        let file: Option<SessionFile> = read_json(&self.session_path()).await?;
        Ok(file.map(|f| f.user))
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        let file = SessionFile {
            user: user.clone(),
            saved_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(self.session_path(), json.as_bytes()).await?;
        debug!("Saved session for {}", user.email);
        Ok(())
    }

    async fn clear_user(&self) -> Result<()> {
        fs::remove_file(self.session_path()).await.or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
        })?;
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
