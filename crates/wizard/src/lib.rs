//! Two-step mission creation.
//!
//! Step one names the mission; step two collects its scope, optionally
//! generated from an uploaded document. [`MissionWizard`] enforces the
//! field rules and the bounded repeatable lists.

#![warn(missing_docs)]

pub mod form;
pub mod wizard;

pub use form::{
    MissionForm, MAX_CONTEXT_CHARS, MAX_OBJECTIVES, MIN_CONSTRAINTS, MIN_NAME_CHARS, MIN_OBJECTIVES,
};
pub use wizard::{MissionWizard, Result, WizardError, WizardStep};
