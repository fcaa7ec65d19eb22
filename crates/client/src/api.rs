//! Endpoint contracts grouped by concern.
//!
//! [`crate::ApiClient`] implements every trait over HTTP and
//! [`crate::InMemoryBackend`] implements them without a network. Services in
//! other crates depend on the narrowest trait they need.

use async_trait::async_trait;
use missiondesk_core::{CreateMission, Mission, MissionId, MissionUpdate, ScopeOutput, UserId};
use crate::contract::{
    Credentials, EmailDraftRequest, FileUpload, FinalReportRequest, PdfReceipt, PdfRequest,
    ResearchRequest, SendEmailRequest, SurveyForm, SurveyRequest,
};
use crate::error::Result;

/// Account endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /users/signup`; returns the new user's id.
    async fn sign_up(&self, credentials: &Credentials) -> Result<UserId>;

    /// `POST /users/signin`; returns the user's id.
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId>;

    /// `POST /users/signout`.
    async fn sign_out(&self) -> Result<()>;
}

/// Mission CRUD endpoints.
#[async_trait]
pub trait MissionApi: Send + Sync {
    /// `POST /missions`.
    async fn create_mission(&self, mission: &CreateMission) -> Result<Mission>;

    /// `GET /missions`.
    async fn list_missions(&self) -> Result<Vec<Mission>>;

    /// `GET /missions/{id}`.
    async fn get_mission(&self, id: &MissionId) -> Result<Mission>;

    /// `GET /users/{id}/missions`.
    async fn user_missions(&self, user_id: &UserId) -> Result<Vec<Mission>>;

    /// `PUT /missions`.
    async fn update_mission(&self, id: &MissionId, update: &MissionUpdate) -> Result<()>;

    /// `DELETE /missions/{id}`.
    async fn delete_mission(&self, id: &MissionId) -> Result<()>;
}

/// AI-backed generation endpoints.
#[async_trait]
pub trait IntelligenceApi: Send + Sync {
    /// `POST /research`; returns the markdown report.
    async fn deep_research(&self, request: &ResearchRequest) -> Result<String>;

    /// `POST /survey`.
    async fn create_survey(&self, request: &SurveyRequest) -> Result<SurveyForm>;

    /// `POST /email/generate`; returns the message body.
    async fn generate_email(&self, request: &EmailDraftRequest) -> Result<String>;

    /// `POST /email/send`.
    async fn send_email(&self, request: &SendEmailRequest) -> Result<()>;

    /// `POST /eda`; returns the analysis report.
    async fn run_eda(&self, mission_name: &str, file: &FileUpload) -> Result<String>;

    /// `POST /report/final`; returns the report text.
    async fn generate_final_report(&self, request: &FinalReportRequest) -> Result<String>;

    /// `POST /report/pdf`.
    async fn convert_report_to_pdf(&self, request: &PdfRequest) -> Result<PdfReceipt>;

    /// `POST /scope`; generates a scope bundle from a document.
    async fn generate_scope(&self, subject: &str, sector: &str, document: &FileUpload) -> Result<ScopeOutput>;
}

/// File and settings endpoints.
#[async_trait]
pub trait FileApi: Send + Sync {
    /// `POST /files/upload`.
    async fn upload_file(&self, bucket: &str, folder: &str, file: &FileUpload) -> Result<()>;

    /// `POST /env/set`.
    async fn set_environment_variable(&self, key: &str, value: &str, env_file: &str) -> Result<()>;
}

/// Everything the backend offers.
pub trait Backend: AuthApi + MissionApi + IntelligenceApi + FileApi {}

impl<T: AuthApi + MissionApi + IntelligenceApi + FileApi> Backend for T {}
