//! Session management.
//!
//! Sign-in state lives in an explicit [`AuthService`] that callers construct,
//! initialise and tear down, rather than in process-wide globals.

#![warn(missing_docs)]

pub mod error;
pub mod service;

pub use error::{AuthError, Result};
pub use service::AuthService;
