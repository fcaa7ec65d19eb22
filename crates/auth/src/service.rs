//! Authentication service.

use missiondesk_client::{AuthApi, Credentials};
use missiondesk_core::User;
use missiondesk_storage::SessionStore;
use tracing::{info, warn};
use crate::error::{AuthError, Result};

/// Holds the signed-in user and keeps the persisted session in step with it.
pub struct AuthService<A: AuthApi, S: SessionStore> {
    api: A,
    store: S,
    user: Option<User>,
}

impl<A: AuthApi, S: SessionStore> AuthService<A, S> {
    /// Create a signed-out service. Call [`Self::initialize`] to restore a
    /// persisted session.
    pub fn new(api: A, store: S) -> Self {
        Self { api, store, user: None }
    }

    /// Restore the persisted user, if any.
    pub async fn initialize(&mut self) -> Result<Option<&User>> {
        self.user = self.store.load_user().await?;
        if let Some(user) = &self.user {
            info!("Restored session for {}", user.email);
        }
        Ok(self.user.as_ref())
    }

    /// Sign in an existing account.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<&User> {
        let credentials = validate_credentials(email, password)?;
        let id = self.api.sign_in(&credentials).await?;
        self.establish(User::new(id, credentials.email)).await
    }

    /// Create an account and sign it in.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<&User> {
        let credentials = validate_credentials(email, password)?;
        let id = self.api.sign_up(&credentials).await?;
        info!("Registered {}", credentials.email);
        self.establish(User::new(id, credentials.email)).await
    }

    /// Sign out remotely, then clear local state.
    ///
    /// Local state is cleared even when the backend call fails; that failure
    /// is still returned.
    pub async fn sign_out(&mut self) -> Result<()> {
        let remote = self.api.sign_out().await;
        self.teardown().await?;

        if let Err(e) = remote {
            warn!("Remote sign-out failed: {}", e);
            return Err(e.into());
        }
        info!("Signed out");
        Ok(())
    }

    /// Forget the in-memory and persisted session.
    pub async fn teardown(&mut self) -> Result<()> {
        self.user = None;
        self.store.clear_user().await?;
        Ok(())
    }

    /// The signed-in user.
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The signed-in user, or [`AuthError::NotSignedIn`].
    pub fn require_user(&self) -> Result<&User> {
        self.user.as_ref().ok_or(AuthError::NotSignedIn)
    }

    /// Backend used by this service.
    pub fn api(&self) -> &A {
        &self.api
    }

    async fn establish(&mut self, user: User) -> Result<&User> {
        self.store.save_user(&user).await?;
        info!("Signed in as {} ({})", user.email, user.id);
        Ok(self.user.insert(user))
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<Credentials> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(Credentials::new(email, password))
}
