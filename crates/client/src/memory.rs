//! In-memory backend for tests and offline use.

use std::collections::{HashMap, HashSet};
use async_trait::async_trait;
use chrono::Utc;
use missiondesk_core::{CreateMission, Mission, MissionId, MissionUpdate, ScopeOutput, UserId};
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::{AuthApi, FileApi, IntelligenceApi, MissionApi};
use crate::contract::{
    Credentials, EmailDraftRequest, FileUpload, FinalReportRequest, PdfReceipt, PdfRequest,
    ResearchRequest, SendEmailRequest, SurveyForm, SurveyRequest,
};
use crate::error::{ApiError, Result};

/// A file received by [`FileApi::upload_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Target bucket
    pub bucket: String,
    /// Folder inside the bucket
    pub folder: String,
    /// Uploaded file name
    pub file_name: String,
    /// Size in bytes
    pub size: usize,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, (UserId, String)>,
    signed_in: Option<UserId>,
    missions: Vec<Mission>,
    next_id: u64,
    uploads: Vec<StoredUpload>,
    pdfs: Vec<String>,
    env: HashMap<String, String>,
    sent: Vec<SendEmailRequest>,
    failures: HashSet<String>,
    calls: Vec<String>,
    scope: ScopeOutput,
}

impl State {
    /// Record the call and fail it when requested.
    fn enter(&mut self, operation: &str) -> Result<()> {
        self.calls.push(operation.to_string());
        if self.failures.contains(operation) {
            debug!("Injected failure for {}", operation);
            return Err(ApiError::Rejected(format!("{} failed", operation)));
        }
        Ok(())
    }

    fn position(&self, id: &MissionId) -> Result<usize> {
        self.missions
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("mission {}", id)))
    }
}

/// Backend that keeps every record in process memory.
///
/// Generated content is deterministic so callers can assert on it. Any
/// operation can be made to fail with [`InMemoryBackend::fail_on`], using the
/// trait method name as the key.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with missions.
    pub fn with_missions(missions: Vec<Mission>) -> Self {
        let next_id = missions.len() as u64;
        Self {
            state: Mutex::new(State {
                missions,
                next_id,
                ..Default::default()
            }),
        }
    }

    /// Scope bundle returned by `generate_scope`.
    pub async fn set_scope(&self, scope: ScopeOutput) {
        self.state.lock().await.scope = scope;
    }

    /// Make `operation` fail until [`Self::recover`] is called.
    pub async fn fail_on(&self, operation: &str) {
        self.state.lock().await.failures.insert(operation.to_string());
    }

    /// Stop failing `operation`.
    pub async fn recover(&self, operation: &str) {
        self.state.lock().await.failures.remove(operation);
    }

    /// Snapshot of stored missions.
    pub async fn missions(&self) -> Vec<Mission> {
        self.state.lock().await.missions.clone()
    }

    /// Files uploaded so far.
    pub async fn uploads(&self) -> Vec<StoredUpload> {
        self.state.lock().await.uploads.clone()
    }

    /// File names of converted PDFs.
    pub async fn pdfs(&self) -> Vec<String> {
        self.state.lock().await.pdfs.clone()
    }

    /// Messages sent so far.
    pub async fn sent_emails(&self) -> Vec<SendEmailRequest> {
        self.state.lock().await.sent.clone()
    }

    /// Value of an environment variable set through the settings endpoint.
    pub async fn env_var(&self, key: &str) -> Option<String> {
        self.state.lock().await.env.get(key).cloned()
    }

    /// Names of every operation invoked, in order.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    /// Currently signed-in user.
    pub async fn signed_in(&self) -> Option<UserId> {
        self.state.lock().await.signed_in.clone()
    }
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<UserId> {
        let mut state = self.state.lock().await;
        state.enter("sign_up")?;

        if state.accounts.contains_key(&credentials.email) {
            return Err(ApiError::Rejected("User already registered".to_string()));
        }
        let id = UserId::new(format!("u-{}", state.accounts.len() + 1));
        state
            .accounts
            .insert(credentials.email.clone(), (id.clone(), credentials.password.clone()));
        state.signed_in = Some(id.clone());
        Ok(id)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId> {
        let mut state = self.state.lock().await;
        state.enter("sign_in")?;

        let id = match state.accounts.get(&credentials.email) {
            Some((id, password)) if *password == credentials.password => id.clone(),
            _ => return Err(ApiError::Rejected("Invalid login credentials".to_string())),
        };
        state.signed_in = Some(id.clone());
        Ok(id)
    }

    async fn sign_out(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter("sign_out")?;
        state.signed_in = None;
        Ok(())
    }
}

#[async_trait]
impl MissionApi for InMemoryBackend {
    async fn create_mission(&self, mission: &CreateMission) -> Result<Mission> {
        let mut state = self.state.lock().await;
        state.enter("create_mission")?;

        let user_id = mission
            .user_id
            .clone()
            .or_else(|| state.signed_in.clone())
            .ok_or_else(|| ApiError::Rejected("user_id is required".to_string()))?;

        state.next_id += 1;
        let created = Mission {
            id: MissionId::new(format!("m-{}", state.next_id)),
            name: mission.name.clone(),
            context: mission.context.clone(),
            problem: mission.problem.clone(),
            tools: mission.tools.clone(),
            constraints: mission.constraints.clone(),
            kpis: mission.kpis.clone(),
            objectives: mission.objectives.clone(),
            created_at: Utc::now(),
            user_id,
            report_path: None,
            form_url: None,
            form_id: None,
        };
        state.missions.push(created.clone());
        Ok(created)
    }

    async fn list_missions(&self) -> Result<Vec<Mission>> {
        let mut state = self.state.lock().await;
        state.enter("list_missions")?;
        Ok(state.missions.clone())
    }

    async fn get_mission(&self, id: &MissionId) -> Result<Mission> {
        let mut state = self.state.lock().await;
        state.enter("get_mission")?;
        let index = state.position(id)?;
        Ok(state.missions[index].clone())
    }

    async fn user_missions(&self, user_id: &UserId) -> Result<Vec<Mission>> {
        let mut state = self.state.lock().await;
        state.enter("user_missions")?;
        Ok(state
            .missions
            .iter()
            .filter(|m| &m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_mission(&self, id: &MissionId, update: &MissionUpdate) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter("update_mission")?;
        let index = state.position(id)?;
        state.missions[index].apply(update);
        Ok(())
    }

    async fn delete_mission(&self, id: &MissionId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter("delete_mission")?;
        let index = state.position(id)?;
        state.missions.remove(index);
        Ok(())
    }
}

#[async_trait]
impl IntelligenceApi for InMemoryBackend {
    async fn deep_research(&self, request: &ResearchRequest) -> Result<String> {
        let mut state = self.state.lock().await;
        state.enter("deep_research")?;

        let mut report = format!("# Research: {}\n\n{}\n", request.mission_name, request.context);
        for objective in &request.objectives {
            report.push_str(&format!("\n- {}", objective));
        }
        Ok(report)
    }

    async fn create_survey(&self, request: &SurveyRequest) -> Result<SurveyForm> {
        let mut state = self.state.lock().await;
        state.enter("create_survey")?;

        let slug: String = request
            .title
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Ok(SurveyForm {
            form_url: format!("https://forms.local/r/{}", slug),
            form_id: Some(slug),
        })
    }

    async fn generate_email(&self, request: &EmailDraftRequest) -> Result<String> {
        let mut state = self.state.lock().await;
        state.enter("generate_email")?;
        Ok(format!(
            "Hello,\n\nWe are studying: {}\n\nThank you for your time.",
            request.problematique
        ))
    }

    async fn send_email(&self, request: &SendEmailRequest) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter("send_email")?;
        state.sent.push(request.clone());
        Ok(())
    }

    async fn run_eda(&self, mission_name: &str, file: &FileUpload) -> Result<String> {
        let mut state = self.state.lock().await;
        state.enter("run_eda")?;
        Ok(format!(
            "# Analysis of {} for {}\n\n{} bytes inspected.",
            file.file_name,
            mission_name,
            file.len()
        ))
    }

    async fn generate_final_report(&self, request: &FinalReportRequest) -> Result<String> {
        let mut state = self.state.lock().await;
        state.enter("generate_final_report")?;
        Ok(format!(
            "# Final report: {}\n\n## Objectives\n{}",
            request.mission_name, request.objective
        ))
    }

    async fn convert_report_to_pdf(&self, request: &PdfRequest) -> Result<PdfReceipt> {
        let mut state = self.state.lock().await;
        state.enter("convert_report_to_pdf")?;
        let path = format!("{}/{}.pdf", request.mission_name, request.file_name);
        state.pdfs.push(request.file_name.clone());
        Ok(PdfReceipt { report_path: Some(path) })
    }

    async fn generate_scope(&self, _subject: &str, _sector: &str, _document: &FileUpload) -> Result<ScopeOutput> {
        let mut state = self.state.lock().await;
        state.enter("generate_scope")?;
        Ok(state.scope.clone())
    }
}

#[async_trait]
impl FileApi for InMemoryBackend {
    async fn upload_file(&self, bucket: &str, folder: &str, file: &FileUpload) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter("upload_file")?;
        state.uploads.push(StoredUpload {
            bucket: bucket.to_string(),
            folder: folder.to_string(),
            file_name: file.file_name.clone(),
            size: file.len(),
        });
        Ok(())
    }

    async fn set_environment_variable(&self, key: &str, value: &str, _env_file: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter("set_environment_variable")?;
        state.env.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
