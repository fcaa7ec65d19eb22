//! Mission model - the primary user-created work item.

use serde::{Deserialize, Serialize};
use crate::id::{MissionId, UserId};
use crate::Time;

/// A mission around which research, survey, analysis and report actions
/// are organised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Unique identifier
    pub id: MissionId,

    /// Mission name
    pub name: String,

    /// Free-text context
    #[serde(default)]
    pub context: Option<String>,

    /// Reformulated problem statement
    #[serde(default)]
    pub problem: Option<String>,

    /// Tools available to the mission
    #[serde(default, rename = "outils")]
    pub tools: Option<String>,

    /// Constraints
    #[serde(default, rename = "contraintes", deserialize_with = "crate::string_list::deserialize")]
    pub constraints: Vec<String>,

    /// KPI description
    #[serde(default)]
    pub kpis: Option<String>,

    /// Objectives
    #[serde(default, rename = "objectif", deserialize_with = "crate::string_list::deserialize")]
    pub objectives: Vec<String>,

    /// Creation timestamp
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub created_at: Time,

    /// Owning user
    pub user_id: UserId,

    /// Generated final report location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,

    /// External survey form URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_url: Option<String>,

    /// External survey form identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
}

impl Mission {
    /// A mission is completed once a final report has been attached.
    pub fn is_completed(&self) -> bool {
        self.report_path
            .as_deref()
            .is_some_and(|path| !path.trim().is_empty())
    }

    /// Objectives joined into a single sentence.
    pub fn objectives_text(&self) -> String {
        self.objectives.join(", ")
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: &MissionUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(context) = &update.context {
            self.context = Some(context.clone());
        }
        if let Some(problem) = &update.problem {
            self.problem = Some(problem.clone());
        }
        if let Some(tools) = &update.tools {
            self.tools = Some(tools.clone());
        }
        if let Some(kpis) = &update.kpis {
            self.kpis = Some(kpis.clone());
        }
        if let Some(constraints) = &update.constraints {
            self.constraints = constraints.clone();
        }
        if let Some(objectives) = &update.objectives {
            self.objectives = objectives.clone();
        }
        if let Some(report_path) = &update.report_path {
            self.report_path = Some(report_path.clone());
        }
        if let Some(form_url) = &update.form_url {
            self.form_url = Some(form_url.clone());
        }
        if let Some(form_id) = &update.form_id {
            self.form_id = Some(form_id.clone());
        }
    }
}

/// Payload for creating a mission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateMission {
    /// Mission name
    pub name: String,

    /// Free-text context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Objectives, blanks already removed
    #[serde(default, rename = "objectif")]
    pub objectives: Vec<String>,

    /// Reformulated problem statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    /// Constraints, blanks already removed
    #[serde(default, rename = "contraintes")]
    pub constraints: Vec<String>,

    /// KPI description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpis: Option<String>,

    /// Tools
    #[serde(default, rename = "outils", skip_serializing_if = "Option::is_none")]
    pub tools: Option<String>,

    /// Owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Partial mission update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionUpdate {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// New problem statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    /// New tools
    #[serde(default, rename = "outils", skip_serializing_if = "Option::is_none")]
    pub tools: Option<String>,
    /// New KPI description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpis: Option<String>,
    /// Replacement constraint list
    #[serde(default, rename = "contraintes", skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
    /// Replacement objective list
    #[serde(default, rename = "objectif", skip_serializing_if = "Option::is_none")]
    pub objectives: Option<Vec<String>>,
    /// Generated report location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
    /// Survey form URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_url: Option<String>,
    /// Survey form identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
}

impl MissionUpdate {
    /// Attach a generated report, which marks the mission completed.
    pub fn report(path: impl Into<String>) -> Self {
        Self {
            report_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Attach a generated survey form.
    pub fn form(url: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            form_url: Some(url.into()),
            form_id: Some(id.into()),
            ..Default::default()
        }
    }

    /// True when the update would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
