//! One-at-a-time guard per action kind.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Actions that may not overlap with themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Deep research
    Research,
    /// Survey form generation
    Survey,
    /// Invitation message generation
    GenerateEmail,
    /// Invitation sending
    SendEmail,
    /// Data analysis
    Analysis,
    /// Final report generation
    FinalReport,
    /// PDF conversion of any report
    SavePdf,
    /// Document upload
    Upload,
    /// Backend settings
    Settings,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ActionKind::Research => "research",
            ActionKind::Survey => "survey generation",
            ActionKind::GenerateEmail => "email generation",
            ActionKind::SendEmail => "email sending",
            ActionKind::Analysis => "analysis",
            ActionKind::FinalReport => "report generation",
            ActionKind::SavePdf => "PDF export",
            ActionKind::Upload => "upload",
            ActionKind::Settings => "settings update",
        };
        f.write_str(label)
    }
}

/// Tracks which actions are in flight.
#[derive(Debug, Clone, Default)]
pub struct ActionGuard {
    running: Arc<Mutex<HashSet<ActionKind>>>,
}

impl ActionGuard {
    /// Create a guard with nothing running.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `kind` as running. Returns `None` when it already is.
    ///
    /// The returned ticket releases the action when dropped.
    pub fn try_begin(&self, kind: ActionKind) -> Option<ActionTicket> {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        running.insert(kind).then(|| ActionTicket {
            kind,
            running: Arc::clone(&self.running),
        })
    }

    /// Whether `kind` is currently running.
    pub fn is_running(&self, kind: ActionKind) -> bool {
        self.running
            .lock()
            .map(|running| running.contains(&kind))
            .unwrap_or(false)
    }
}

/// Proof that an action is running. Dropping it ends the action.
#[derive(Debug)]
pub struct ActionTicket {
    kind: ActionKind,
    running: Arc<Mutex<HashSet<ActionKind>>>,
}

impl ActionTicket {
    /// The action this ticket holds.
    pub fn kind(&self) -> ActionKind {
        self.kind
    }
}

impl Drop for ActionTicket {
    fn drop(&mut self) {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        running.remove(&self.kind);
    }
}
