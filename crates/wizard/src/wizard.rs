//! Wizard state machine.

use std::sync::Arc;
use missiondesk_client::{ApiError, FileUpload, IntelligenceApi, MissionApi};
use missiondesk_core::{Mission, Notice, Notifier, User};
use tracing::{debug, error, info};
use crate::form::MissionForm;

/// Result alias for wizard operations.
pub type Result<T> = std::result::Result<T, WizardError>;

/// Wizard errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// A field failed validation
    #[error("{field}: {message}")]
    Validation {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Auto-fill needs a document
    #[error("select a document to generate the scope")]
    NoDocument,

    /// The command does not apply to the current step
    #[error("not available in the {0:?} step")]
    WrongStep(WizardStep),

    /// A backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WizardError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        WizardError::Validation { field, message: message.into() }
    }
}

/// Where the wizard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Step one: the mission name
    Basics,
    /// Step two: context, objectives, constraints and the rest
    Scope,
    /// The mission was created
    Closed,
}

/// Collects a new mission over two steps and creates it.
pub struct MissionWizard {
    step: WizardStep,
    form: MissionForm,
    document: Option<FileUpload>,
    notifier: Arc<dyn Notifier>,
}

impl MissionWizard {
    /// A fresh wizard on step one.
    pub fn open(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            step: WizardStep::Basics,
            form: MissionForm::default(),
            document: None,
            notifier,
        }
    }

    /// Current step.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Collected fields.
    pub fn form(&self) -> &MissionForm {
        &self.form
    }

    /// Edit the collected fields.
    pub fn form_mut(&mut self) -> &mut MissionForm {
        &mut self.form
    }

    /// Document attached for auto-fill.
    pub fn document(&self) -> Option<&FileUpload> {
        self.document.as_ref()
    }

    /// Attach the document used by [`Self::auto_fill`].
    pub fn attach_document(&mut self, document: FileUpload) {
        self.document = Some(document);
    }

    /// Validate step one and move to step two. Stays put on error.
    pub fn next(&mut self) -> Result<()> {
        self.require_step(WizardStep::Basics)?;
        self.form.validate_basics()?;
        self.step = WizardStep::Scope;
        Ok(())
    }

    /// Return to step one, keeping every field.
    pub fn back(&mut self) -> Result<()> {
        self.require_step(WizardStep::Scope)?;
        self.step = WizardStep::Basics;
        Ok(())
    }

    /// Generate scope fields from the attached document.
    ///
    /// On failure every field is left as it was.
    pub async fn auto_fill(&mut self, api: &impl IntelligenceApi) -> Result<()> {
        self.require_step(WizardStep::Scope)?;
        let Some(document) = &self.document else {
            self.notifier.notify(Notice::error("Select a document to generate the scope"));
            return Err(WizardError::NoDocument);
        };

        let sector = self.form.sector.as_deref().unwrap_or("");
        debug!("Generating scope for {} from {}", self.form.name, document.file_name);

        match api.generate_scope(self.form.name.trim(), sector, document).await {
            Ok(scope) => {
                self.form.apply_scope(scope);
                info!("Scope generated for {}", self.form.name);
                self.notifier.notify(Notice::success("Scope generated"));
                Ok(())
            }
            Err(e) => {
                error!("Scope generation failed: {}", e);
                self.notifier.notify(Notice::error(format!(
                    "Scope generation failed: {}",
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    /// Validate step two and create the mission for `user`.
    ///
    /// Success closes the wizard. On failure it stays on step two so the
    /// submit can be retried.
    pub async fn submit(&mut self, api: &impl MissionApi, user: &User) -> Result<Mission> {
        self.require_step(WizardStep::Scope)?;
        self.form.validate_basics()?;
        self.form.validate_scope()?;

        let payload = self.form.to_payload(user.id.clone());
        match api.create_mission(&payload).await {
            Ok(mission) => {
                info!("Created mission {} ({})", mission.name, mission.id);
                self.step = WizardStep::Closed;
                Ok(mission)
            }
            Err(e) => {
                error!("Mission creation failed: {}", e);
                self.notifier.notify(Notice::error(format!(
                    "Failed to create the mission: {}",
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    fn require_step(&self, step: WizardStep) -> Result<()> {
        if self.step == step {
            Ok(())
        } else {
            Err(WizardError::WrongStep(self.step))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use missiondesk_client::InMemoryBackend;
    use missiondesk_core::{MemoryNotifier, ScopeOutput, UserId};

    fn wizard() -> (MissionWizard, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        (MissionWizard::open(notifier.clone()), notifier)
    }

    fn user() -> User {
        User::new(UserId::from("u-1"), "ana@example.com")
    }

    #[test]
    fn test_short_name_does_not_advance() {
        let (mut wizard, _) = wizard();
        wizard.form_mut().name = "ab".to_string();

        assert!(matches!(wizard.next(), Err(WizardError::Validation { .. })));
        assert_eq!(wizard.step(), WizardStep::Basics);
    }

    #[test]
    fn test_back_keeps_fields() {
        let (mut wizard, _) = wizard();
        wizard.form_mut().name = "Pricing".to_string();
        wizard.next().unwrap();
        wizard.form_mut().context = "retail".to_string();

        wizard.back().unwrap();
        assert_eq!(wizard.step(), WizardStep::Basics);
        assert_eq!(wizard.form().context, "retail");
        assert!(matches!(wizard.back(), Err(WizardError::WrongStep(WizardStep::Basics))));
    }

    #[tokio::test]
    async fn test_submit_creates_and_closes() {
        let backend = InMemoryBackend::new();
        let (mut wizard, _) = wizard();
        wizard.form_mut().name = "Pricing".to_string();
        wizard.next().unwrap();
        wizard.form_mut().update_objective(0, "benchmark");

        let mission = wizard.submit(&backend, &user()).await.unwrap();
        assert_eq!(mission.name, "Pricing");
        assert_eq!(mission.objectives, vec!["benchmark"]);
        assert_eq!(mission.user_id, UserId::from("u-1"));
        assert_eq!(wizard.step(), WizardStep::Closed);
    }

    #[tokio::test]
    async fn test_submit_rechecks_name_edited_after_next() {
        let backend = InMemoryBackend::new();
        let (mut wizard, _) = wizard();
        wizard.form_mut().name = "Pricing".to_string();
        wizard.next().unwrap();
        wizard.form_mut().name = "  ".to_string();

        let result = wizard.submit(&backend, &user()).await;
        assert!(matches!(result, Err(WizardError::Validation { field: "name", .. })));
        assert_eq!(wizard.step(), WizardStep::Scope);
        assert!(backend.missions().await.is_empty());
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_stays_for_retry() {
        let backend = InMemoryBackend::new();
        backend.fail_on("create_mission").await;
        let (mut wizard, notifier) = wizard();
        wizard.form_mut().name = "Pricing".to_string();
        wizard.next().unwrap();

        assert!(wizard.submit(&backend, &user()).await.is_err());
        assert_eq!(wizard.step(), WizardStep::Scope);
        assert!(notifier.last().unwrap().is_error());

        backend.recover("create_mission").await;
        assert!(wizard.submit(&backend, &user()).await.is_ok());
    }

    #[tokio::test]
    async fn test_auto_fill_requires_document() {
        let backend = InMemoryBackend::new();
        let (mut wizard, notifier) = wizard();
        wizard.form_mut().name = "Pricing".to_string();
        wizard.next().unwrap();

        assert!(matches!(wizard.auto_fill(&backend).await, Err(WizardError::NoDocument)));
        assert!(notifier.last().unwrap().is_error());
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_auto_fill_overwrites_scope_fields() {
        let backend = InMemoryBackend::new();
        backend
            .set_scope(ScopeOutput {
                context: "generated".to_string(),
                problem: "why".to_string(),
                objectives: vec!["one".to_string()],
                constraints: Vec::new(),
                kpis: "nps".to_string(),
                tools: "survey".to_string(),
            })
            .await;

        let (mut wizard, _) = wizard();
        wizard.form_mut().name = "Pricing".to_string();
        wizard.next().unwrap();
        wizard.form_mut().context = "manual".to_string();
        wizard.attach_document(FileUpload::new("brief.pdf", b"%PDF".to_vec()));

        wizard.auto_fill(&backend).await.unwrap();
        let form = wizard.form();
        assert_eq!(form.context, "generated");
        assert_eq!(form.objectives(), ["one", ""]);
        assert_eq!(form.constraints(), [""]);
        assert_eq!(form.tools, "survey");
    }

    #[tokio::test]
    async fn test_failed_auto_fill_keeps_fields() {
        let backend = InMemoryBackend::new();
        backend.fail_on("generate_scope").await;

        let (mut wizard, _) = wizard();
        wizard.form_mut().name = "Pricing".to_string();
        wizard.next().unwrap();
        wizard.form_mut().context = "manual".to_string();
        wizard.attach_document(FileUpload::new("brief.pdf", vec![1]));

        assert!(wizard.auto_fill(&backend).await.is_err());
        assert_eq!(wizard.form().context, "manual");
    }
}
