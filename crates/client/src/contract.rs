//! Request and response types for each endpoint.

use std::path::Path;
use missiondesk_core::UserId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use crate::envelope::normalize_pairs;
use crate::error::Result;

/// Email and password for sign-up and sign-in.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Bundle credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Find the user id in a sign-in or sign-up payload.
///
/// The backend answers with either `{"user": {"id": ..}, "session": ..}` or
/// the same record as `[["user", {..}], ["session", {..}]]`.
pub fn extract_user_id(data: &Value) -> Option<UserId> {
    let normalized = normalize_pairs(data.clone());
    let candidates = [
        normalized.get("user"),
        Some(&normalized),
        data.get(0).and_then(|pair| pair.get(1)),
    ];

    let found = candidates
        .into_iter()
        .flatten()
        .find_map(|candidate| match candidate.get("id")? {
            Value::String(id) if !id.is_empty() => Some(UserId::new(id.clone())),
            Value::Number(n) => Some(UserId::new(n.to_string())),
            _ => None,
        });
    found
}

/// Deep research request.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchRequest {
    /// Mission context
    pub context: String,
    /// Problem statement
    pub problematique: String,
    /// Objectives
    pub objectives: Vec<String>,
    /// Mission name
    pub mission_name: String,
}

/// Survey form generation request.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyRequest {
    /// Form title
    pub title: String,
    /// Mission context
    pub context: String,
    /// Problem statement
    pub problematique: String,
    /// Objectives
    pub objectives: Vec<String>,
}

/// A generated survey form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurveyForm {
    /// Public form URL
    pub form_url: String,
    /// Form identifier, when the provider returns one
    #[serde(default, deserialize_with = "lenient_string")]
    pub form_id: Option<String>,
}

/// Invitation message generation request.
#[derive(Debug, Clone, Serialize)]
pub struct EmailDraftRequest {
    /// Mission context
    pub contexte: String,
    /// Objectives
    pub objectifs: Vec<String>,
    /// Problem statement
    pub problematique: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmailDraft {
    pub email_content: String,
}

/// Outgoing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendEmailRequest {
    /// Recipients
    pub to_emails: Vec<String>,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub text_content: String,
}

/// Final report request. Objectives travel as one comma-joined string.
#[derive(Debug, Clone, Serialize)]
pub struct FinalReportRequest {
    /// Mission name
    pub mission_name: String,
    /// Mission context
    pub context: String,
    /// Problem statement
    pub problematique: String,
    /// Objectives, joined
    pub objective: String,
}

/// Kind of document being converted to PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Deep research output
    Research,
    /// Exploratory data analysis output
    Analysis,
    /// Final mission report
    FinalReport,
}

/// Markdown to PDF conversion request.
#[derive(Debug, Clone, Serialize)]
pub struct PdfRequest {
    /// Markdown source
    pub markdown_content: String,
    /// Document kind
    pub report_type: ReportKind,
    /// Target file name, without extension
    pub file_name: String,
    /// Owning mission name
    pub mission_name: String,
}

/// Result of a PDF conversion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PdfReceipt {
    /// Stored location of the PDF
    #[serde(default)]
    pub report_path: Option<String>,
}

/// Payload carrying a generated report, in whatever shape the generator
/// produced it.
#[derive(Debug, Deserialize)]
pub(crate) struct ReportPayload {
    pub report: Option<Value>,
}

impl ReportPayload {
    pub(crate) fn into_text(self) -> Option<String> {
        let text = report_text(&self.report?);
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Flatten report content into markdown text.
///
/// Strings pass through; `{ "text": .. }` objects yield their text; lists are
/// flattened item by item, one per line; anything else is pretty JSON.
pub fn report_text(content: &Value) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other
                    .get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => match map.get("text").and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => serde_json::to_string_pretty(content).unwrap_or_default(),
        },
        other => other.to_string(),
    }
}

/// A file queued for multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Name sent to the backend
    pub file_name: String,
    /// MIME type, if known
    pub mime: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Build an upload from memory.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name).map(str::to_string);
        Self { file_name, mime, bytes }
    }

    /// Read an upload from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    /// Lower-case extension of the file name.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for empty files.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_lowercase();
    Some(match ext.as_str() {
        "csv" => "text/csv",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        _ => return None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
