//! Mission action errors.

use missiondesk_client::ApiError;
use crate::guard::ActionKind;

/// Result alias for mission actions.
pub type Result<T> = std::result::Result<T, ActionError>;

/// Errors raised by [`crate::MissionActions`].
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The same action is still running
    #[error("{0} is already running")]
    Busy(ActionKind),

    /// Input was rejected before any call was made
    #[error("{field}: {message}")]
    Invalid {
        /// Offending input
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Save requested without a generated report
    #[error("no report to save")]
    NothingToSave,

    /// Sending invitations needs a generated survey form
    #[error("generate a survey form first")]
    MissingForm,

    /// A backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ActionError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ActionError::Invalid { field, message: message.into() }
    }

    /// Human-readable message suitable for a notice.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
