//! Status vocabularies for workflow executions and their sections.
//!
//! Workflow-level statuses are a closed set owned by the orchestrator, so
//! they are modeled as an enum. Section statuses are extensible (deciders
//! and plugins introduce their own), and the edit session deliberately
//! performs no legality checks on them, so they stay an open string newtype
//! with named constants for the values the console itself reasons about.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall status of a workflow execution as reported by the orchestrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    /// Execution is running and accepting operator edits.
    InProgress,
    /// Execution is waiting on an unmet condition; still editable.
    Blocked,
    /// A cancel request has been submitted but not yet honored.
    CancelRequested,
    /// Execution ended after a cancel request was honored.
    Cancelled,
    /// Execution finished successfully.
    Completed,
    /// Execution ended in failure.
    Failed,
    /// Execution exceeded its allotted time.
    TimedOut,
    /// Execution was forcibly terminated by an operator.
    Terminated,
    /// Execution was closed and restarted as a fresh run.
    ContinuedAsNew,
}

impl WorkflowStatus {
    /// Whether the execution is in a live state where section parameters
    /// may still be corrected by an operator.
    pub fn is_live(self) -> bool {
        matches!(self, WorkflowStatus::InProgress | WorkflowStatus::Blocked)
    }

    /// Whether the execution has reached a closed state.
    pub fn is_closed(self) -> bool {
        !matches!(
            self,
            WorkflowStatus::InProgress | WorkflowStatus::Blocked | WorkflowStatus::CancelRequested
        )
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkflowStatus::InProgress => "IN_PROGRESS",
            WorkflowStatus::Blocked => "BLOCKED",
            WorkflowStatus::CancelRequested => "CANCEL_REQUESTED",
            WorkflowStatus::Cancelled => "CANCELLED",
            WorkflowStatus::Completed => "COMPLETED",
            WorkflowStatus::Failed => "FAILED",
            WorkflowStatus::TimedOut => "TIMED_OUT",
            WorkflowStatus::Terminated => "TERMINATED",
            WorkflowStatus::ContinuedAsNew => "CONTINUED_AS_NEW",
        };
        f.write_str(label)
    }
}

/// Status of a single workflow section.
///
/// Kept as an open string: the set of section statuses is defined by the
/// orchestrator's deciders, not by this console, and the edit session
/// accepts any value an operator assigns. Equality is plain string equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SectionStatus(String);

impl SectionStatus {
    /// Sentinel submitted when edited parameters should cause a section to
    /// be re-evaluated by the orchestrator.
    pub const READY: &'static str = "READY";

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// The re-evaluation sentinel as a status value.
    pub fn ready() -> Self {
        Self(Self::READY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionStatus {
    fn from(status: &str) -> Self {
        Self(status.to_string())
    }
}

impl From<String> for SectionStatus {
    fn from(status: String) -> Self {
        Self(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_status_uses_wire_spelling() {
        let status: WorkflowStatus = serde_json::from_str("\"IN_PROGRESS\"").expect("parse status");
        assert_eq!(status, WorkflowStatus::InProgress);
        assert_eq!(serde_json::to_string(&WorkflowStatus::TimedOut).unwrap(), "\"TIMED_OUT\"");
        assert_eq!(WorkflowStatus::ContinuedAsNew.to_string(), "CONTINUED_AS_NEW");
    }

    #[test]
    fn live_states_are_editable_only() {
        assert!(WorkflowStatus::InProgress.is_live());
        assert!(WorkflowStatus::Blocked.is_live());
        assert!(!WorkflowStatus::CancelRequested.is_live());
        assert!(!WorkflowStatus::Completed.is_live());
    }

    #[test]
    fn cancel_requested_is_not_closed() {
        assert!(!WorkflowStatus::CancelRequested.is_closed());
        assert!(WorkflowStatus::Terminated.is_closed());
    }

    #[test]
    fn section_status_is_transparent_and_open() {
        let status: SectionStatus = serde_json::from_str("\"DISMISSED\"").expect("parse status");
        assert_eq!(status, SectionStatus::from("DISMISSED"));
        assert_eq!(serde_json::to_string(&SectionStatus::ready()).unwrap(), "\"READY\"");
    }
}
