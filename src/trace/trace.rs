use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::state::report::ReconcileReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Bootstrapped,
    Allocated,
    Updated,
    Deleted,
    Archived,
    SubmissionRepointed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,

    /// `before_form_save`, `before_form_delete`, `bootstrap`
    pub hook: String,
    pub persistence_identifier: String,

    pub kind: TraceKind,
    pub identifier: Option<String>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(hook: &str, persistence_identifier: &str, kind: TraceKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            hook: hook.to_string(),
            persistence_identifier: persistence_identifier.to_string(),
            kind,
            identifier: None,
            detail: None,
        }
    }

    pub fn with_identifier(mut self, identifier: impl ToString) -> Self {
        self.identifier = Some(identifier.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

/// One event per change recorded in the report.
pub fn report_events(hook: &str, persistence_identifier: &str, report: &ReconcileReport) -> Vec<TraceEvent> {
    let mut events = Vec::new();

    for id in &report.bootstrapped {
        events.push(TraceEvent::now(hook, persistence_identifier, TraceKind::Bootstrapped).with_identifier(id));
    }
    for field in &report.allocated {
        events.push(
            TraceEvent::now(hook, persistence_identifier, TraceKind::Allocated)
                .with_identifier(&field.assigned)
                .with_detail(format!("{} ({})", field.previous, field.element_type)),
        );
    }
    for id in &report.updated {
        events.push(TraceEvent::now(hook, persistence_identifier, TraceKind::Updated).with_identifier(id));
    }
    for id in &report.deleted {
        events.push(TraceEvent::now(hook, persistence_identifier, TraceKind::Deleted).with_identifier(id));
    }

    events
}
