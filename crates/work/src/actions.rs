//! Mission action service.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use missiondesk_client::{
    Backend, EmailDraftRequest, FileUpload, FinalReportRequest, PdfReceipt, PdfRequest, ReportKind,
    ResearchRequest, SendEmailRequest, SurveyForm, SurveyRequest,
};
use missiondesk_core::{Mission, MissionUpdate, Notice, Notifier};
use tracing::{debug, error, info, warn};
use ulid::Ulid;

use crate::error::{ActionError, Result};
use crate::guard::{ActionGuard, ActionKind, ActionTicket};
use crate::naming::{analysis_file_name, final_report_file_name, research_file_name};
use crate::recipients::{parse_recipients, with_form_link};
use crate::settings::{is_known_key, DEFAULT_ENV_FILE};

/// Bucket receiving uploaded documents unless configured otherwise.
pub const DEFAULT_BUCKET: &str = "missions";

/// Largest accepted analysis data file.
pub const MAX_DATA_FILE_BYTES: usize = 10 * 1024 * 1024;

const DATA_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

const DEFAULT_SUBJECT: &str = "Invitation to take part in our survey";

/// Check an analysis data file before it is sent.
pub fn validate_data_file(file: &FileUpload) -> Result<()> {
    let supported = file
        .extension()
        .is_some_and(|ext| DATA_EXTENSIONS.contains(&ext.as_str()));
    if !supported {
        return Err(ActionError::invalid("file", "unsupported format, use CSV or Excel"));
    }
    if file.len() > MAX_DATA_FILE_BYTES {
        return Err(ActionError::invalid("file", "file is too large (max 10MB)"));
    }
    Ok(())
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Runs AI-backed and file actions against one mission at a time.
pub struct MissionActions<B: Backend> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
    guard: ActionGuard,
    bucket: String,
}

impl<B: Backend> MissionActions<B> {
    /// Create the service.
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            guard: ActionGuard::new(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    /// Upload documents into `bucket` instead of the default.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// In-flight tracking, shared with front ends that disable controls.
    pub fn guard(&self) -> &ActionGuard {
        &self.guard
    }

    /// Run deep research for the mission and return the markdown report.
    pub async fn research(&self, mission: &Mission) -> Result<String> {
        let _ticket = self.begin(ActionKind::Research)?;
        let request = ResearchRequest {
            context: text(&mission.context),
            problematique: text(&mission.problem),
            objectives: mission.objectives.clone(),
            mission_name: mission.name.clone(),
        };

        debug!("Starting research for {}", mission.id);
        let report = self
            .backend
            .deep_research(&request)
            .await
            .map_err(|e| self.failed("Research", e))?;

        self.notifier.notify(Notice::success("Research complete"));
        Ok(report)
    }

    /// Export a research report as PDF, named after `now`'s date.
    pub async fn save_research_pdf(&self, mission: &Mission, report: &str, now: DateTime<Utc>) -> Result<PdfReceipt> {
        let receipt = self
            .save_pdf(mission, report, ReportKind::Research, research_file_name(now.date_naive()))
            .await?;
        self.notifier.notify(Notice::success("Report saved"));
        Ok(receipt)
    }

    /// Generate a survey form and attach it to the mission.
    ///
    /// The returned form always carries an id.
    pub async fn create_survey(&self, mission: &Mission, title: &str) -> Result<SurveyForm> {
        let title = title.trim();
        if title.is_empty() {
            return Err(self.failed("Survey generation", ActionError::invalid("title", "a form title is required")));
        }
        let _ticket = self.begin(ActionKind::Survey)?;

        let request = SurveyRequest {
            title: title.to_string(),
            context: text(&mission.context),
            problematique: text(&mission.problem),
            objectives: mission.objectives.clone(),
        };
        let mut form = self
            .backend
            .create_survey(&request)
            .await
            .map_err(|e| self.failed("Survey generation", e))?;

        let form_id = form
            .form_id
            .take()
            .unwrap_or_else(|| format!("form-{}", Ulid::new()));
        self.backend
            .update_mission(&mission.id, &MissionUpdate::form(form.form_url.clone(), form_id.clone()))
            .await
            .map_err(|e| self.failed("Survey generation", e))?;

        info!("Survey {} attached to mission {}", form_id, mission.id);
        self.notifier.notify(Notice::success("Survey form generated"));
        form.form_id = Some(form_id);
        Ok(form)
    }

    /// Draft an invitation message for the mission.
    pub async fn generate_email(&self, mission: &Mission) -> Result<String> {
        let _ticket = self.begin(ActionKind::GenerateEmail)?;
        let request = EmailDraftRequest {
            contexte: text(&mission.context),
            objectifs: mission.objectives.clone(),
            problematique: text(&mission.problem),
        };

        let message = self
            .backend
            .generate_email(&request)
            .await
            .map_err(|e| self.failed("Email generation", e))?;
        self.notifier.notify(Notice::success("Email message generated"));
        Ok(message)
    }

    /// Send the invitation with the survey link appended.
    ///
    /// `form_url` overrides the link stored on the mission. Returns the number
    /// of recipients.
    pub async fn send_email(
        &self,
        mission: &Mission,
        recipients: &str,
        message: &str,
        subject: Option<&str>,
        form_url: Option<&str>,
    ) -> Result<usize> {
        let link = form_url
            .or(mission.form_url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| self.failed("Email sending", ActionError::MissingForm))?;
        let to_emails = parse_recipients(recipients).map_err(|e| self.failed("Email sending", e))?;
        let _ticket = self.begin(ActionKind::SendEmail)?;

        let request = SendEmailRequest {
            to_emails,
            subject: subject
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_SUBJECT)
                .to_string(),
            text_content: with_form_link(message, link),
        };
        self.backend
            .send_email(&request)
            .await
            .map_err(|e| self.failed("Email sending", e))?;

        let count = request.to_emails.len();
        info!("Sent {} invitation(s) for mission {}", count, mission.id);
        self.notifier.notify(Notice::success(format!("{} email(s) sent", count)));
        Ok(count)
    }

    /// Run exploratory data analysis on a CSV or Excel file.
    pub async fn analyze(&self, mission: &Mission, file: &FileUpload) -> Result<String> {
        validate_data_file(file).map_err(|e| self.failed("Analysis", e))?;
        let _ticket = self.begin(ActionKind::Analysis)?;

        debug!("Analyzing {} ({} bytes) for {}", file.file_name, file.len(), mission.id);
        let report = self
            .backend
            .run_eda(&mission.name, file)
            .await
            .map_err(|e| self.failed("Analysis", e))?;

        self.notifier.notify(Notice::success("Analysis complete"));
        Ok(report)
    }

    /// Export an analysis report as PDF.
    pub async fn save_analysis_pdf(&self, mission: &Mission, report: &str, now: DateTime<Utc>) -> Result<PdfReceipt> {
        let receipt = self
            .save_pdf(mission, report, ReportKind::Analysis, analysis_file_name(&mission.name, now))
            .await?;
        self.notifier.notify(Notice::success("Report saved"));
        Ok(receipt)
    }

    /// Generate the final mission report.
    pub async fn final_report(&self, mission: &Mission) -> Result<String> {
        let _ticket = self.begin(ActionKind::FinalReport)?;
        let request = FinalReportRequest {
            mission_name: mission.name.clone(),
            context: text(&mission.context),
            problematique: text(&mission.problem),
            objective: mission.objectives_text(),
        };

        let report = self
            .backend
            .generate_final_report(&request)
            .await
            .map_err(|e| self.failed("Report generation", e))?;
        self.notifier.notify(Notice::success("Report generated"));
        Ok(report)
    }

    /// Export the final report as PDF and attach it to the mission, which
    /// marks the mission completed.
    ///
    /// A failed attach is reported but does not fail the save.
    pub async fn save_final_report(&self, mission: &Mission, report: &str, now: DateTime<Utc>) -> Result<PdfReceipt> {
        let receipt = self
            .save_pdf(mission, report, ReportKind::FinalReport, final_report_file_name(&mission.name, now))
            .await?;

        let Some(path) = receipt.report_path.as_deref().filter(|p| !p.trim().is_empty()) else {
            self.notifier.notify(Notice::success("Report saved"));
            return Ok(receipt);
        };

        match self.backend.update_mission(&mission.id, &MissionUpdate::report(path)).await {
            Ok(()) => {
                info!("Mission {} completed with report {}", mission.id, path);
                self.notifier.notify(Notice::success("Report saved and mission updated"));
            }
            Err(e) => {
                warn!("Report saved but mission {} was not updated: {}", mission.id, e);
                self.notifier
                    .notify(Notice::success("Report saved but the mission could not be updated"));
            }
        }
        Ok(receipt)
    }

    /// Upload documents into the mission's folder. Stops at the first failure.
    pub async fn upload_documents(&self, mission: &Mission, files: &[FileUpload]) -> Result<usize> {
        if files.is_empty() {
            return Err(self.failed("Upload", ActionError::invalid("files", "select at least one file")));
        }
        let _ticket = self.begin(ActionKind::Upload)?;

        for file in files {
            debug!("Uploading {} to {}/{}", file.file_name, self.bucket, mission.name);
            self.backend
                .upload_file(&self.bucket, &mission.name, file)
                .await
                .map_err(|e| self.failed("Upload", e))?;
        }

        self.notifier
            .notify(Notice::success(format!("{} file(s) uploaded", files.len())));
        Ok(files.len())
    }

    /// Store a backend environment variable.
    pub async fn set_key(&self, key: &str, value: &str, env_file: Option<&str>) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(self.failed("Settings update", ActionError::invalid("key", "a key name is required")));
        }
        if !is_known_key(key) {
            warn!("{} is not a key the backend is known to read", key);
        }
        let _ticket = self.begin(ActionKind::Settings)?;

        let env_file = env_file.unwrap_or(DEFAULT_ENV_FILE);
        self.backend
            .set_environment_variable(key, value, env_file)
            .await
            .map_err(|e| self.failed("Settings update", e))?;

        info!("Set {} in {}", key, env_file);
        self.notifier.notify(Notice::success(format!("{} saved", key)));
        Ok(())
    }

    async fn save_pdf(&self, mission: &Mission, report: &str, kind: ReportKind, file_name: String) -> Result<PdfReceipt> {
        if report.trim().is_empty() {
            return Err(self.failed("Save", ActionError::NothingToSave));
        }
        let _ticket = self.begin(ActionKind::SavePdf)?;

        let request = PdfRequest {
            markdown_content: report.to_string(),
            report_type: kind,
            file_name,
            mission_name: mission.name.clone(),
        };
        debug!("Exporting {} for {}", request.file_name, mission.id);
        self.backend
            .convert_report_to_pdf(&request)
            .await
            .map_err(|e| self.failed("Save", e))
    }

    fn begin(&self, kind: ActionKind) -> Result<ActionTicket> {
        self.guard.try_begin(kind).ok_or_else(|| {
            debug!("Refusing to start {} twice", kind);
            ActionError::Busy(kind)
        })
    }

    fn failed(&self, action: &str, err: impl Into<ActionError>) -> ActionError {
        let err = err.into();
        error!("{} failed: {}", action, err);
        self.notifier
            .notify(Notice::error(format!("{} failed: {}", action, err.user_message())));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use missiondesk_client::{ApiError, InMemoryBackend, MissionApi};
    use missiondesk_core::{CreateMission, MemoryNotifier, UserId};

    struct Fixture {
        backend: Arc<InMemoryBackend>,
        notifier: Arc<MemoryNotifier>,
        actions: MissionActions<InMemoryBackend>,
        mission: Mission,
    }

    async fn fixture() -> Fixture {
        let backend = Arc::new(InMemoryBackend::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let mission = backend
            .create_mission(&CreateMission {
                name: "Retail pricing".to_string(),
                context: Some("Grocery chains".to_string()),
                problem: Some("Why are margins falling?".to_string()),
                objectives: vec!["benchmark".to_string(), "forecast".to_string()],
                user_id: Some(UserId::from("u-1")),
                ..Default::default()
            })
            .await
            .unwrap();
        let actions = MissionActions::new(backend.clone(), notifier.clone());
        Fixture { backend, notifier, actions, mission }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 15, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_research_and_save() {
        let f = fixture().await;
        let report = f.actions.research(&f.mission).await.unwrap();
        assert!(report.contains("Retail pricing"));
        assert!(report.contains("- forecast"));

        let receipt = f.actions.save_research_pdf(&f.mission, &report, at()).await.unwrap();
        assert!(receipt.report_path.is_some());
        assert_eq!(f.backend.pdfs().await, vec!["research_report_2025-10-15"]);
    }

    #[tokio::test]
    async fn test_saving_empty_report_is_refused() {
        let f = fixture().await;
        let result = f.actions.save_research_pdf(&f.mission, "  ", at()).await;
        assert!(matches!(result, Err(ActionError::NothingToSave)));
        assert!(f.backend.pdfs().await.is_empty());
    }

    #[tokio::test]
    async fn test_survey_attaches_form() {
        let f = fixture().await;
        let form = f.actions.create_survey(&f.mission, "Pricing survey").await.unwrap();

        let stored = f.backend.get_mission(&f.mission.id).await.unwrap();
        assert_eq!(stored.form_url.as_deref(), Some(form.form_url.as_str()));
        assert_eq!(stored.form_id, form.form_id);

        assert!(f.actions.create_survey(&f.mission, "  ").await.is_err());
        assert!(f.notifier.last().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_send_email_requires_form_and_valid_recipients() {
        let f = fixture().await;
        let result = f.actions.send_email(&f.mission, "a@x.io", "Hi", None, None).await;
        assert!(matches!(result, Err(ActionError::MissingForm)));

        let link = Some("https://forms.local/r/abc");
        let result = f.actions.send_email(&f.mission, "nope", "Hi", None, link).await;
        assert!(matches!(result, Err(ActionError::Invalid { .. })));
        assert!(f.backend.sent_emails().await.is_empty());

        let sent = f
            .actions
            .send_email(&f.mission, "a@x.io, b@y.org", "Hi", None, link)
            .await
            .unwrap();
        assert_eq!(sent, 2);

        let email = &f.backend.sent_emails().await[0];
        assert_eq!(email.subject, DEFAULT_SUBJECT);
        assert!(email.text_content.ends_with("https://forms.local/r/abc"));
    }

    #[tokio::test]
    async fn test_analysis_validates_file() {
        let f = fixture().await;

        let pdf = FileUpload::new("notes.pdf", vec![1]);
        assert!(matches!(
            f.actions.analyze(&f.mission, &pdf).await,
            Err(ActionError::Invalid { field: "file", .. })
        ));

        let huge = FileUpload::new("big.csv", vec![0; MAX_DATA_FILE_BYTES + 1]);
        assert!(f.actions.analyze(&f.mission, &huge).await.is_err());
        assert!(!f.backend.calls().await.iter().any(|c| c == "run_eda"));

        let csv = FileUpload::new("sales.CSV", b"a,b\n1,2\n".to_vec());
        let report = f.actions.analyze(&f.mission, &csv).await.unwrap();
        assert!(report.contains("sales.CSV"));

        f.actions.save_analysis_pdf(&f.mission, &report, at()).await.unwrap();
        let name = &f.backend.pdfs().await[0];
        assert!(name.starts_with("analysis-Retail_pricing-"));
    }

    #[tokio::test]
    async fn test_final_report_completes_mission() {
        let f = fixture().await;
        let report = f.actions.final_report(&f.mission).await.unwrap();
        assert!(report.contains("benchmark, forecast"));

        f.actions.save_final_report(&f.mission, &report, at()).await.unwrap();
        let stored = f.backend.get_mission(&f.mission.id).await.unwrap();
        assert!(stored.is_completed());
        assert_eq!(
            f.notifier.last().unwrap(),
            Notice::success("Report saved and mission updated")
        );
    }

    #[tokio::test]
    async fn test_final_report_attach_failure_is_tolerated() {
        let f = fixture().await;
        f.backend.fail_on("update_mission").await;

        let receipt = f.actions.save_final_report(&f.mission, "# Done", at()).await.unwrap();
        assert!(receipt.report_path.is_some());
        assert!(!f.backend.get_mission(&f.mission.id).await.unwrap().is_completed());
    }

    #[tokio::test]
    async fn test_failed_call_notifies_and_releases() {
        let f = fixture().await;
        f.backend.fail_on("deep_research").await;

        let err = f.actions.research(&f.mission).await.unwrap_err();
        assert!(matches!(err, ActionError::Api(ApiError::Rejected(_))));
        assert!(f.notifier.last().unwrap().is_error());
        assert!(!f.actions.guard().is_running(ActionKind::Research));
    }

    #[tokio::test]
    async fn test_busy_action_is_refused() {
        let f = fixture().await;
        let _held = f.actions.guard().try_begin(ActionKind::FinalReport).unwrap();

        let result = f.actions.final_report(&f.mission).await;
        assert!(matches!(result, Err(ActionError::Busy(ActionKind::FinalReport))));
        assert!(f.backend.calls().await.iter().all(|c| c != "generate_final_report"));
    }

    #[tokio::test]
    async fn test_uploads_go_to_mission_folder() {
        let f = fixture().await;
        let actions = MissionActions::new(f.backend.clone(), f.notifier.clone()).with_bucket("docs");
        let files = vec![FileUpload::new("a.pdf", vec![1]), FileUpload::new("b.docx", vec![2, 3])];

        assert_eq!(actions.upload_documents(&f.mission, &files).await.unwrap(), 2);
        let uploads = f.backend.uploads().await;
        assert_eq!(uploads.len(), 2);
        assert!(uploads.iter().all(|u| u.bucket == "docs" && u.folder == "Retail pricing"));

        assert!(actions.upload_documents(&f.mission, &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_set_key() {
        let f = fixture().await;
        f.actions.set_key("OPENAI_API_KEY", "sk-1", None).await.unwrap();
        assert_eq!(f.backend.env_var("OPENAI_API_KEY").await.as_deref(), Some("sk-1"));
        assert!(f.actions.set_key(" ", "x", None).await.is_err());
    }
}
