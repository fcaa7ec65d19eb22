//! reqwest implementation of the endpoint traits.

use async_trait::async_trait;
use missiondesk_core::{CreateMission, Mission, MissionId, MissionUpdate, ScopeOutput, UserId};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::api::{AuthApi, FileApi, IntelligenceApi, MissionApi};
use crate::config::ClientConfig;
use crate::contract::{
    extract_user_id, Credentials, EmailDraft, EmailDraftRequest, FileUpload, FinalReportRequest,
    PdfReceipt, PdfRequest, ReportPayload, ResearchRequest, SendEmailRequest, SurveyForm,
    SurveyRequest,
};
use crate::envelope::{decode, decode_one, error_detail, normalize_pairs, ApiResponse};
use crate::error::{ApiError, Result};

/// HTTP client for the MissionDesk backend.
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client
    client: Client,

    /// Backend base URL
    base_url: String,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = ClientBuilder::new().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and unwrap the envelope.
    async fn call(&self, endpoint: &str, request: RequestBuilder) -> Result<Option<Value>> {
        debug!("Calling {}", endpoint);

        let response = request.send().await.map_err(|e| {
            error!("API request to {} failed: {}", endpoint, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_detail(&body);
            error!("API request to {} failed with {}: {}", endpoint, status, message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<Value> = serde_json::from_str(&body)?;
        envelope.into_result()
    }

    async fn call_data(&self, endpoint: &str, request: RequestBuilder, what: &'static str) -> Result<Value> {
        match self.call(endpoint, request).await? {
            Some(Value::Null) | None => Err(ApiError::MissingData(what)),
            Some(value) => Ok(value),
        }
    }

    async fn post_json(&self, endpoint: &str, body: &impl serde::Serialize, what: &'static str) -> Result<Value> {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.call_data(endpoint, request, what).await
    }

    async fn post_form(&self, endpoint: &str, form: Form, what: &'static str) -> Result<Value> {
        let request = self.client.post(self.url(endpoint)).multipart(form);
        self.call_data(endpoint, request, what).await
    }

    async fn authenticate(&self, endpoint: &str, credentials: &Credentials) -> Result<UserId> {
        let data = self.post_json(endpoint, credentials, "user").await?;
        extract_user_id(&data).ok_or(ApiError::MissingData("user id"))
    }

    async fn missions_at(&self, endpoint: &str) -> Result<Vec<Mission>> {
        let request = self.client.get(self.url(endpoint));
        match self.call(endpoint, request).await? {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(value) => decode(value),
        }
    }
}

fn file_part(file: &FileUpload) -> Result<Part> {
    let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    match &file.mime {
        Some(mime) => Ok(part.mime_str(mime)?),
        None => Ok(part),
    }
}

fn report(value: Value) -> Result<String> {
    let payload: ReportPayload = decode(value)?;
    payload.into_text().ok_or(ApiError::MissingData("report"))
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn sign_up(&self, credentials: &Credentials) -> Result<UserId> {
        self.authenticate("/users/signup", credentials).await
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId> {
        self.authenticate("/users/signin", credentials).await
    }

    async fn sign_out(&self) -> Result<()> {
        let request = self.client.post(self.url("/users/signout"));
        self.call("/users/signout", request).await?;
        Ok(())
    }
}

#[async_trait]
impl MissionApi for ApiClient {
    async fn create_mission(&self, mission: &CreateMission) -> Result<Mission> {
        let data = self.post_json("/missions", &json!({ "data": mission }), "mission").await?;
        decode_one(data, "mission")
    }

    async fn list_missions(&self) -> Result<Vec<Mission>> {
        self.missions_at("/missions").await
    }

    async fn get_mission(&self, id: &MissionId) -> Result<Mission> {
        let endpoint = format!("/missions/{}", id);
        let request = self.client.get(self.url(&endpoint));
        match self.call(&endpoint, request).await? {
            Some(Value::Null) | None => Err(ApiError::NotFound(format!("mission {}", id))),
            Some(value) => decode_one(value, "mission"),
        }
    }

    async fn user_missions(&self, user_id: &UserId) -> Result<Vec<Mission>> {
        self.missions_at(&format!("/users/{}/missions", user_id)).await
    }

    async fn update_mission(&self, id: &MissionId, update: &MissionUpdate) -> Result<()> {
        let body = json!({ "mission_id": id, "updated_data": update });
        let request = self.client.put(self.url("/missions")).json(&body);
        self.call("/missions", request).await?;
        Ok(())
    }

    async fn delete_mission(&self, id: &MissionId) -> Result<()> {
        let endpoint = format!("/missions/{}", id);
        let request = self.client.delete(self.url(&endpoint));
        self.call(&endpoint, request).await?;
        Ok(())
    }
}

#[async_trait]
impl IntelligenceApi for ApiClient {
    async fn deep_research(&self, request: &ResearchRequest) -> Result<String> {
        report(self.post_json("/research", request, "report").await?)
    }

    async fn create_survey(&self, request: &SurveyRequest) -> Result<SurveyForm> {
        decode(self.post_json("/survey", request, "form").await?)
    }

    async fn generate_email(&self, request: &EmailDraftRequest) -> Result<String> {
        let draft: EmailDraft = decode(self.post_json("/email/generate", request, "email").await?)?;
        Ok(draft.email_content)
    }

    async fn send_email(&self, request: &SendEmailRequest) -> Result<()> {
        let http = self.client.post(self.url("/email/send")).json(request);
        self.call("/email/send", http).await?;
        Ok(())
    }

    async fn run_eda(&self, mission_name: &str, file: &FileUpload) -> Result<String> {
        let form = Form::new()
            .text("mission_name", mission_name.to_string())
            .part("file", file_part(file)?);
        report(self.post_form("/eda", form, "report").await?)
    }

    async fn generate_final_report(&self, request: &FinalReportRequest) -> Result<String> {
        report(self.post_json("/report/final", request, "report").await?)
    }

    async fn convert_report_to_pdf(&self, request: &PdfRequest) -> Result<PdfReceipt> {
        let http = self.client.post(self.url("/report/pdf")).json(request);
        match self.call("/report/pdf", http).await? {
            Some(Value::Null) | None => Ok(PdfReceipt::default()),
            Some(value) => decode(value),
        }
    }

    async fn generate_scope(&self, subject: &str, sector: &str, document: &FileUpload) -> Result<ScopeOutput> {
        let form = Form::new()
            .text("subject", subject.to_string())
            .text("sector", sector.to_string())
            .part("doc", file_part(document)?);
        let data = self.post_form("/scope", form, "scope").await?;
        decode(normalize_pairs(data))
    }
}

#[async_trait]
impl FileApi for ApiClient {
    async fn upload_file(&self, bucket: &str, folder: &str, file: &FileUpload) -> Result<()> {
        let form = Form::new()
            .text("bucket_name", bucket.to_string())
            .text("bucket_folder", folder.to_string())
            .part("file", file_part(file)?);
        let request = self.client.post(self.url("/files/upload")).multipart(form);
        self.call("/files/upload", request).await?;
        Ok(())
    }

    async fn set_environment_variable(&self, key: &str, value: &str, env_file: &str) -> Result<()> {
        let form = Form::new()
            .text("key", key.to_string())
            .text("value", value.to_string())
            .text("env_file", env_file.to_string());
        let request = self.client.post(self.url("/env/set")).multipart(form);
        self.call("/env/set", request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new(ClientConfig::new("http://api.local:8000/")).unwrap();
        assert_eq!(client.base_url(), "http://api.local:8000");
        assert_eq!(client.url("/missions"), "http://api.local:8000/missions");
    }

    #[test]
    fn test_file_part_rejects_bad_mime() {
        let mut upload = FileUpload::new("x.csv", vec![1]);
        assert!(file_part(&upload).is_ok());

        upload.mime = Some("not a mime".to_string());
        assert!(matches!(file_part(&upload), Err(ApiError::Transport(_))));
    }

    #[test]
    fn test_report_payload() {
        assert_eq!(report(serde_json::json!({"report": "# R"})).unwrap(), "# R");
        assert!(matches!(
            report(serde_json::json!({"report": ""})),
            Err(ApiError::MissingData("report"))
        ));
        assert!(matches!(report(serde_json::json!({})), Err(ApiError::MissingData("report"))));
    }
}
