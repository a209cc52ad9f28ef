//! Wire payloads exchanged with the orchestrator's workflow endpoints.
//!
//! `ExecutionDetail` is the shape returned by the workflow detail read;
//! `UpdateSet` is the shape submitted back when an operator applies edits.
//! Section and parameter order is author order and is preserved via
//! `IndexMap`. `params` carries no serde default on purpose: a section
//! delivered without its parameter map is a malformed response, not an
//! empty one.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::status::{SectionStatus, WorkflowStatus};

/// Full detail for one workflow execution as returned by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDetail {
    /// Overall execution status.
    pub status: WorkflowStatus,
    /// Free-form `key:value` tags attached at initiation.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Sections keyed by name, in decider order.
    pub sections: IndexMap<String, SectionDetail>,
}

/// Detail for a single section within an execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionDetail {
    /// Current section status.
    pub status: SectionStatus,
    /// Whether operators may correct this section's parameters while the
    /// workflow is live.
    #[serde(default)]
    pub fixable: bool,
    /// Parameter values keyed by name. Required: absence is malformed.
    pub params: IndexMap<String, Value>,
    /// Decider annotations accumulated for this section.
    #[serde(default)]
    pub notes: Vec<String>,
    /// Chronological processing events for this section.
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
}

/// One entry in a section's processing timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// Severity/category of the event.
    pub event_type: TimelineKind,
    /// Human-readable event text.
    pub message: String,
    /// When the event occurred, if the orchestrator recorded it.
    #[serde(default)]
    pub when: Option<DateTime<Utc>>,
}

/// Timeline event categories used by the orchestrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineKind {
    Note,
    Warning,
    Error,
    Success,
}

/// Minimal set of section-level changes submitted as a workflow update.
///
/// Keyed by section name; sections with nothing to change are absent.
pub type UpdateSet = IndexMap<String, SectionUpdate>;

/// Changes submitted for one section.
///
/// A `SectionUpdate` always carries a status: either the status the
/// operator explicitly assigned, or the re-evaluation sentinel forced by
/// parameter edits. `params` holds only the edited values and is omitted
/// from the payload when empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionUpdate {
    /// Edited parameter values keyed by name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, Value>,
    /// Status to assign to the section.
    pub status: SectionStatus,
}
