//! Edit-session state management.
//!
//! An [`EditSession`] owns the editable in-memory projection of one
//! workflow execution. Loading structures the orchestrator's raw detail
//! payload into a tree of sections and parameters, snapshotting baselines
//! (`original` values, `original_status`) exactly once. Mutations track
//! per-field edits against those baselines, and the session-level pending
//! flag is recomputed after every mutation so it never drifts from the
//! state it summarizes.

use indexmap::IndexMap;
use serde_json::Value;
use steward_types::{ExecutionDetail, SectionStatus, TimelineEvent, UpdateSet, ValueKind, WorkflowStatus};

use crate::error::SessionError;
use crate::session::diff;

/// One editable parameter value with its load-time baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    original: Value,
    current: Value,
    kind: ValueKind,
    edited: bool,
    editing: bool,
    editable: bool,
}

impl Parameter {
    fn from_raw(raw: Value, editable: bool) -> Self {
        Self {
            kind: ValueKind::classify(&raw),
            original: raw.clone(),
            current: raw,
            edited: false,
            editing: false,
            editable,
        }
    }

    /// Value as loaded from the orchestrator.
    pub fn original(&self) -> &Value {
        &self.original
    }

    /// Current working value.
    pub fn current(&self) -> &Value {
        &self.current
    }

    /// Presentation classification computed at load time.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether the working value differs from the baseline.
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// Whether the parameter currently has UI edit focus.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Whether the parameter may be mutated at all.
    pub fn is_editable(&self) -> bool {
        self.editable
    }
}

/// One named unit of work within an execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    status: SectionStatus,
    original_status: SectionStatus,
    editing_status: bool,
    fixable: bool,
    params: IndexMap<String, Parameter>,
    notes: Vec<String>,
    timeline: Vec<TimelineEvent>,
}

impl Section {
    /// Current (possibly operator-assigned) status.
    pub fn status(&self) -> &SectionStatus {
        &self.status
    }

    /// Status snapshotted at load time; never mutated afterwards.
    pub fn original_status(&self) -> &SectionStatus {
        &self.original_status
    }

    /// Whether the status differs from its load-time baseline.
    pub fn status_changed(&self) -> bool {
        self.status != self.original_status
    }

    /// Whether the status picker currently has UI focus.
    pub fn is_editing_status(&self) -> bool {
        self.editing_status
    }

    /// Whether this section's parameters may be corrected while the
    /// workflow is live.
    pub fn is_fixable(&self) -> bool {
        self.fixable
    }

    /// Parameters keyed by name, in decider order.
    pub fn params(&self) -> &IndexMap<String, Parameter> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    /// Decider annotations for this section.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Chronological processing events for this section.
    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.timeline
    }
}

/// The structured, editable projection of one workflow execution.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowExecution {
    status: WorkflowStatus,
    editable: bool,
    tags: Vec<String>,
    sections: IndexMap<String, Section>,
}

impl WorkflowExecution {
    /// Overall execution status.
    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// Whether the execution was in a live state when loaded.
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Free-form `key:value` tags attached at initiation.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Sections keyed by name, in decider order.
    pub fn sections(&self) -> &IndexMap<String, Section> {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }
}

/// Holds one execution's editable tree and tracks pending edits against
/// the loaded baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    execution: WorkflowExecution,
    pending_edits: bool,
}

impl EditSession {
    /// Structure a raw detail payload into a fresh session.
    ///
    /// Fails with [`SessionError::MalformedResponse`] when the payload does
    /// not have the expected shape; no partially-initialized tree is ever
    /// produced. After a successful load every parameter is unedited and
    /// [`has_pending_edits`](Self::has_pending_edits) is false.
    pub fn load(raw: &Value) -> Result<Self, SessionError> {
        let detail: ExecutionDetail = serde_json::from_value(raw.clone()).map_err(|e| SessionError::MalformedResponse {
            detail: e.to_string(),
        })?;
        Ok(Self::from_detail(detail))
    }

    /// Build a session from an already-structured detail payload.
    pub fn from_detail(detail: ExecutionDetail) -> Self {
        let workflow_live = detail.status.is_live();
        let mut sections = IndexMap::with_capacity(detail.sections.len());
        for (name, section) in detail.sections {
            let editable = workflow_live && section.fixable;
            let params = section
                .params
                .into_iter()
                .map(|(param_name, raw)| (param_name, Parameter::from_raw(raw, editable)))
                .collect();
            sections.insert(
                name,
                Section {
                    original_status: section.status.clone(),
                    status: section.status,
                    editing_status: false,
                    fixable: section.fixable,
                    params,
                    notes: section.notes,
                    timeline: section.timeline,
                },
            );
        }

        Self {
            execution: WorkflowExecution {
                status: detail.status,
                editable: workflow_live,
                tags: detail.tags,
                sections,
            },
            pending_edits: false,
        }
    }

    /// Read-only view of the execution tree.
    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.execution.sections.get(name)
    }

    /// Whether any parameter edit or section status change is pending.
    pub fn has_pending_edits(&self) -> bool {
        self.pending_edits
    }

    /// Give a parameter UI edit focus.
    pub fn begin_parameter_edit(&mut self, section_name: &str, param_name: &str) -> Result<(), SessionError> {
        let param = self.editable_param_mut(section_name, param_name)?;
        param.editing = true;
        Ok(())
    }

    /// Assign a new working value to a parameter.
    ///
    /// The target must exist and be editable; otherwise the session is left
    /// unchanged. `edited` is recomputed as `current != original` and the
    /// session-wide pending flag is refreshed.
    pub fn set_parameter_value(&mut self, section_name: &str, param_name: &str, value: Value) -> Result<(), SessionError> {
        let param = self.editable_param_mut(section_name, param_name)?;
        param.current = value;
        param.edited = param.current != param.original;
        param.editing = false;
        self.refresh_pending();
        Ok(())
    }

    /// Abandon a parameter edit, restoring the loaded baseline.
    pub fn cancel_parameter_edit(&mut self, section_name: &str, param_name: &str) -> Result<(), SessionError> {
        let param = self.param_mut(section_name, param_name)?;
        param.current = param.original.clone();
        param.edited = false;
        param.editing = false;
        self.refresh_pending();
        Ok(())
    }

    /// Give a section's status picker UI focus.
    pub fn begin_status_edit(&mut self, section_name: &str) -> Result<(), SessionError> {
        let section = self.section_mut(section_name)?;
        section.editing_status = true;
        Ok(())
    }

    /// Assign a section status.
    ///
    /// Any value is accepted; legality is the orchestrator's concern. The
    /// "changed" determination is purely `status != original_status`.
    pub fn set_section_status(&mut self, section_name: &str, status: SectionStatus) -> Result<(), SessionError> {
        let section = self.section_mut(section_name)?;
        section.status = status;
        section.editing_status = false;
        self.refresh_pending();
        Ok(())
    }

    /// Restore every section status and parameter value to its loaded
    /// baseline. Idempotent.
    pub fn revert_all(&mut self) {
        for section in self.execution.sections.values_mut() {
            section.status = section.original_status.clone();
            section.editing_status = false;
            for param in section.params.values_mut() {
                param.current = param.original.clone();
                param.edited = false;
                param.editing = false;
            }
        }
        self.pending_edits = false;
    }

    /// Assemble the minimal update set for the current state.
    ///
    /// Pure: identical state always yields an equal result and nothing is
    /// mutated.
    pub fn compute_diff(&self) -> UpdateSet {
        diff::assemble_updates(&self.execution)
    }

    /// Optimistically override the overall status after a cancel or
    /// terminate acknowledgement; the next reload reconciles the rest of
    /// the tree.
    pub(crate) fn set_workflow_status(&mut self, status: WorkflowStatus) {
        self.execution.status = status;
    }

    fn section_mut(&mut self, section_name: &str) -> Result<&mut Section, SessionError> {
        self.execution
            .sections
            .get_mut(section_name)
            .ok_or_else(|| SessionError::UnknownSection {
                section: section_name.to_string(),
            })
    }

    fn param_mut(&mut self, section_name: &str, param_name: &str) -> Result<&mut Parameter, SessionError> {
        let section = self
            .execution
            .sections
            .get_mut(section_name)
            .ok_or_else(|| SessionError::UnknownSection {
                section: section_name.to_string(),
            })?;
        section.params.get_mut(param_name).ok_or_else(|| SessionError::NotEditable {
            section: section_name.to_string(),
            param: param_name.to_string(),
            detail: "no parameter by that name".to_string(),
        })
    }

    fn editable_param_mut(&mut self, section_name: &str, param_name: &str) -> Result<&mut Parameter, SessionError> {
        let workflow_live = self.execution.editable;
        let param = self.param_mut(section_name, param_name)?;
        if !param.editable {
            let detail = if workflow_live {
                "section is not fixable"
            } else {
                "workflow is not in a live state"
            };
            return Err(SessionError::NotEditable {
                section: section_name.to_string(),
                param: param_name.to_string(),
                detail: detail.to_string(),
            });
        }
        Ok(param)
    }

    fn refresh_pending(&mut self) {
        self.pending_edits = !self.compute_diff().is_empty();
    }
}
