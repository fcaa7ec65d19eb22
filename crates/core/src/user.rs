//! User record mirrored from the backend session.

use serde::{Deserialize, Serialize};
use crate::id::UserId;

/// The signed-in user, as persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier
    pub id: UserId,

    /// Sign-in email
    pub email: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    /// Create a user record from an id and email.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: None,
        }
    }
}
