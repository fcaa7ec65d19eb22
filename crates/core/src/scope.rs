//! Scope ("cadrage") bundle produced by document auto-fill.

use serde::{Deserialize, Serialize};

/// Structured description of a mission generated from an uploaded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeOutput {
    /// Mission context
    #[serde(default, deserialize_with = "crate::nullable_string::deserialize")]
    pub context: String,

    /// Reformulated problem statement
    #[serde(default, rename = "problematique", deserialize_with = "crate::nullable_string::deserialize")]
    pub problem: String,

    /// Objectives
    #[serde(default, deserialize_with = "crate::string_list::deserialize")]
    pub objectives: Vec<String>,

    /// KPI description
    #[serde(default, deserialize_with = "crate::nullable_string::deserialize")]
    pub kpis: String,

    /// Constraints
    #[serde(default, rename = "contraintes", deserialize_with = "crate::string_list::deserialize")]
    pub constraints: Vec<String>,

    /// Tools
    #[serde(default, rename = "outils", deserialize_with = "crate::nullable_string::deserialize")]
    pub tools: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_text_fields_read_as_empty() {
        let scope: ScopeOutput = serde_json::from_value(json!({
            "context": null,
            "problematique": null,
            "objectives": ["grow"],
            "kpis": null,
            "contraintes": null,
            "outils": null
        }))
        .unwrap();

        assert_eq!(scope.context, "");
        assert_eq!(scope.problem, "");
        assert_eq!(scope.objectives, vec!["grow"]);
        assert_eq!(scope.tools, "");
        assert!(scope.constraints.is_empty());
    }
}
