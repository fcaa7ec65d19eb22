//! HTTP client for the MissionDesk backend.
//!
//! Every endpoint answers with the same envelope (status, optional data,
//! optional message). This crate decodes the envelope once and hands typed
//! values to the rest of the workspace, so no caller ever inspects raw JSON.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod envelope;
pub mod contract;
pub mod api;
pub mod http;
pub mod memory;

pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use envelope::{ApiResponse, ResponseStatus};
pub use contract::{
    Credentials, EmailDraftRequest, FileUpload, FinalReportRequest, PdfReceipt, PdfRequest,
    ReportKind, ResearchRequest, SendEmailRequest, SurveyForm, SurveyRequest,
};
pub use api::{AuthApi, Backend, FileApi, IntelligenceApi, MissionApi};
pub use http::ApiClient;
pub use memory::{InMemoryBackend, StoredUpload};
