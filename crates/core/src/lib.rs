//! MissionDesk core data models.
//!
//! This crate defines the plain records shared by every other crate:
//! missions, users, the dashboard filter state, the scope bundle returned
//! by document auto-fill, and the notices surfaced to the user.

#![warn(missing_docs)]

// Core identities
mod id;

// Missions and users
mod mission;
mod user;
mod scope;

// List view filters
mod filter;

// User-facing notifications
mod notice;

// Re-exports
pub use id::{MissionId, UserId};

pub use mission::{CreateMission, Mission, MissionUpdate};
pub use user::User;
pub use scope::ScopeOutput;

pub use filter::{FilterState, ParseFilterError, PeriodFilter, StatusFilter};

pub use notice::{MemoryNotifier, Notice, NoticeLevel, Notifier};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Serde helpers for backend fields whose shape drifts between a string and
/// a list of strings.
pub mod string_list {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<Option<String>>),
        Text(String),
    }

    /// Deserialize a list of strings from either a JSON array, a
    /// JSON-encoded array inside a string, or a single plain string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<Raw> = Option::deserialize(deserializer)?;
        Ok(match raw {
            None => Vec::new(),
            Some(Raw::List(items)) => items.into_iter().flatten().collect(),
            Some(Raw::Text(text)) => from_text(&text),
        })
    }

    /// Interpret a free-text field as a list.
    pub fn from_text(text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        if trimmed.starts_with('[') {
            if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
                return items;
            }
        }
        vec![trimmed.to_string()]
    }
}

/// Serde helper for text fields the backend sometimes sends as `null`.
pub mod nullable_string {
    use serde::{Deserialize, Deserializer};

    /// Deserialize a string, reading `null` as empty.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Lenient timestamp parsing for backend `created_at` values.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Accepts RFC 3339 as well as naive `YYYY-MM-DDTHH:MM:SS[.f]` values,
    /// which are read as UTC.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    /// Parse a timestamp string.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()?;
        Some(naive.and_utc())
    }
}
