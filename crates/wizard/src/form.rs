//! Wizard form fields and their rules.

use missiondesk_core::{CreateMission, ScopeOutput, UserId};
use crate::wizard::{Result, WizardError};

/// Shortest accepted mission name, after trimming.
pub const MIN_NAME_CHARS: usize = 3;

/// Longest accepted context.
pub const MAX_CONTEXT_CHARS: usize = 500;

/// Fewest objective slots.
pub const MIN_OBJECTIVES: usize = 2;

/// Most objective slots.
pub const MAX_OBJECTIVES: usize = 4;

/// Fewest constraint slots.
pub const MIN_CONSTRAINTS: usize = 1;

/// Everything the wizard collects.
///
/// List fields are slots: blank entries are kept while editing and dropped
/// when the creation payload is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionForm {
    /// Mission name
    pub name: String,
    /// Free-text context
    pub context: String,
    /// Constraint slots
    constraints: Vec<String>,
    /// Reformulated problem statement
    pub problem: String,
    /// Objective slots
    objectives: Vec<String>,
    /// KPI description
    pub kpis: String,
    /// Tools
    pub tools: String,
    /// Sector hint for scope generation
    pub sector: Option<String>,
}

impl Default for MissionForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            context: String::new(),
            constraints: vec![String::new(); MIN_CONSTRAINTS],
            problem: String::new(),
            objectives: vec![String::new(); MIN_OBJECTIVES],
            kpis: String::new(),
            tools: String::new(),
            sector: None,
        }
    }
}

impl MissionForm {
    /// Constraint slots.
    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }

    /// Objective slots.
    pub fn objectives(&self) -> &[String] {
        &self.objectives
    }

    /// Whether another objective slot may be added.
    pub fn can_add_objective(&self) -> bool {
        self.objectives.len() < MAX_OBJECTIVES
    }

    /// Whether an objective slot may be removed.
    pub fn can_remove_objective(&self) -> bool {
        self.objectives.len() > MIN_OBJECTIVES
    }

    /// Whether a constraint slot may be removed.
    pub fn can_remove_constraint(&self) -> bool {
        self.constraints.len() > MIN_CONSTRAINTS
    }

    /// Append a blank objective slot. No-op at the maximum.
    pub fn add_objective(&mut self) {
        if self.can_add_objective() {
            self.objectives.push(String::new());
        }
    }

    /// Remove objective `index`. No-op at the minimum or out of range.
    pub fn remove_objective(&mut self, index: usize) {
        if self.can_remove_objective() && index < self.objectives.len() {
            self.objectives.remove(index);
        }
    }

    /// Replace the text of objective `index`.
    pub fn update_objective(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.objectives.get_mut(index) {
            *slot = value.into();
        }
    }

    /// Append a blank constraint slot.
    pub fn add_constraint(&mut self) {
        self.constraints.push(String::new());
    }

    /// Remove constraint `index`. The last slot is never removed.
    pub fn remove_constraint(&mut self, index: usize) {
        if self.can_remove_constraint() && index < self.constraints.len() {
            self.constraints.remove(index);
        }
    }

    /// Replace the text of constraint `index`.
    pub fn update_constraint(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.constraints.get_mut(index) {
            *slot = value.into();
        }
    }

    /// Fill objective slots from a list, growing or shrinking to fit.
    pub fn set_objectives<I, T>(&mut self, objectives: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.objectives = bounded_objectives(objectives.into_iter().map(Into::into).collect());
    }

    /// Fill constraint slots from a list.
    pub fn set_constraints<I, T>(&mut self, constraints: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut constraints: Vec<String> = constraints.into_iter().map(Into::into).collect();
        if constraints.is_empty() {
            constraints.push(String::new());
        }
        self.constraints = constraints;
    }

    /// Overwrite scope fields with a generated bundle.
    pub fn apply_scope(&mut self, scope: ScopeOutput) {
        self.context = scope.context;
        self.problem = scope.problem;
        self.kpis = scope.kpis;
        self.tools = scope.tools;
        self.set_constraints(scope.constraints);
        self.set_objectives(scope.objectives);
    }

    /// Step one rules.
    pub fn validate_basics(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(WizardError::invalid("name", "mission name is required"));
        }
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(WizardError::invalid(
                "name",
                format!("mission name needs at least {} characters", MIN_NAME_CHARS),
            ));
        }
        Ok(())
    }

    /// Step two rules.
    pub fn validate_scope(&self) -> Result<()> {
        if self.context.chars().count() > MAX_CONTEXT_CHARS {
            return Err(WizardError::invalid(
                "context",
                format!("context is limited to {} characters", MAX_CONTEXT_CHARS),
            ));
        }
        Ok(())
    }

    /// Build the creation payload, dropping blank slots.
    pub fn to_payload(&self, user_id: UserId) -> CreateMission {
        CreateMission {
            name: self.name.trim().to_string(),
            context: non_blank(&self.context),
            objectives: filled(&self.objectives),
            problem: non_blank(&self.problem),
            constraints: filled(&self.constraints),
            kpis: non_blank(&self.kpis),
            tools: non_blank(&self.tools),
            user_id: Some(user_id),
        }
    }
}

fn bounded_objectives(mut objectives: Vec<String>) -> Vec<String> {
    objectives.truncate(MAX_OBJECTIVES);
    while objectives.len() < MIN_OBJECTIVES {
        objectives.push(String::new());
    }
    objectives
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn filled(slots: &[String]) -> Vec<String> {
    slots
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_form_slots() {
        let form = MissionForm::default();
        assert_eq!(form.objectives().len(), 2);
        assert_eq!(form.constraints().len(), 1);
        assert!(form.can_add_objective());
        assert!(!form.can_remove_objective());
        assert!(!form.can_remove_constraint());
    }

    #[test]
    fn test_objective_bounds_hold_for_any_sequence() {
        let mut form = MissionForm::default();
        // Deterministic pseudo-random walk over add/remove.
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            if seed % 2 == 0 {
                form.add_objective();
            } else {
                form.remove_objective((seed as usize / 2) % 5);
            }
            let n = form.objectives().len();
            assert!((MIN_OBJECTIVES..=MAX_OBJECTIVES).contains(&n), "len {}", n);
        }
    }

    #[test]
    fn test_remove_at_minimum_is_noop() {
        let mut form = MissionForm::default();
        form.update_objective(0, "a");
        form.update_objective(1, "b");
        form.remove_objective(0);
        assert_eq!(form.objectives(), ["a", "b"]);

        form.add_objective();
        form.add_objective();
        form.add_objective();
        assert_eq!(form.objectives().len(), 4);
        assert!(!form.can_add_objective());
    }

    #[test]
    fn test_constraints_keep_one_slot() {
        let mut form = MissionForm::default();
        form.remove_constraint(0);
        assert_eq!(form.constraints().len(), 1);

        form.add_constraint();
        form.update_constraint(1, "budget");
        form.remove_constraint(0);
        assert_eq!(form.constraints(), ["budget"]);
    }

    #[test]
    fn test_name_rules() {
        let mut form = MissionForm { name: "ab".to_string(), ..Default::default() };
        assert!(matches!(
            form.validate_basics(),
            Err(WizardError::Validation { field: "name", .. })
        ));

        form.name = "  ab  ".to_string();
        assert!(form.validate_basics().is_err());

        form.name = "Abc".to_string();
        assert!(form.validate_basics().is_ok());
    }

    #[test]
    fn test_context_limit() {
        let mut form = MissionForm { context: "é".repeat(500), ..Default::default() };
        assert!(form.validate_scope().is_ok());
        form.context.push('x');
        assert!(form.validate_scope().is_err());
    }

    #[test]
    fn test_apply_scope_normalises_lists() {
        let mut form = MissionForm::default();
        form.apply_scope(ScopeOutput {
            context: "ctx".to_string(),
            objectives: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            ..Default::default()
        });
        assert_eq!(form.context, "ctx");
        assert_eq!(form.objectives().len(), 4);
        assert_eq!(form.constraints(), [""]);

        form.apply_scope(ScopeOutput {
            objectives: vec!["only".into()],
            constraints: vec!["x".into(), "y".into()],
            ..Default::default()
        });
        assert_eq!(form.objectives(), ["only", ""]);
        assert_eq!(form.constraints(), ["x", "y"]);

        form.apply_scope(ScopeOutput::default());
        assert_eq!(form.objectives(), ["", ""]);
    }

    #[test]
    fn test_payload_drops_blanks() {
        let mut form = MissionForm { name: " Audit ".to_string(), ..Default::default() };
        form.update_objective(0, "grow");
        form.update_objective(1, "   ");
        form.add_constraint();
        form.update_constraint(1, "budget");

        let payload = form.to_payload(UserId::from("u-1"));
        assert_eq!(payload.name, "Audit");
        assert_eq!(payload.objectives, vec!["grow"]);
        assert_eq!(payload.constraints, vec!["budget"]);
        assert!(payload.context.is_none());
        assert_eq!(payload.user_id, Some(UserId::from("u-1")));
    }
}
