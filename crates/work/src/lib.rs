//! Mission actions.
//!
//! Research, survey, invitation email, data analysis, final report, document
//! upload and backend settings. Each action reports its outcome as a notice
//! and refuses to start while the same action is still in flight.

#![warn(missing_docs)]

pub mod error;
pub mod guard;
pub mod naming;
pub mod recipients;
pub mod settings;
pub mod actions;

pub use error::{ActionError, Result};
pub use guard::{ActionGuard, ActionKind, ActionTicket};
pub use naming::{analysis_file_name, file_safe_name, final_report_file_name, research_file_name};
pub use recipients::{parse_recipients, with_form_link};
pub use settings::{DEFAULT_ENV_FILE, KNOWN_KEYS};
pub use actions::{validate_data_file, MissionActions, DEFAULT_BUCKET, MAX_DATA_FILE_BYTES};
