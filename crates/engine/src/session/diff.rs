//! Minimal update-set assembly.
//!
//! A section appears in the update set only when it has at least one edited
//! parameter or an explicitly changed status. Parameter edits force the
//! section back to the re-evaluation sentinel so the orchestrator picks the
//! corrected values up, unless the operator also assigned a status
//! explicitly, in which case the explicit status wins.

use indexmap::IndexMap;
use steward_types::{SectionStatus, SectionUpdate, UpdateSet};

use crate::session::state::WorkflowExecution;

/// Collect the minimal set of section-level changes to submit.
pub fn assemble_updates(execution: &WorkflowExecution) -> UpdateSet {
    let mut updates = UpdateSet::new();

    for (section_name, section) in execution.sections() {
        let mut param_updates = IndexMap::new();
        for (param_name, param) in section.params() {
            if param.is_edited() {
                param_updates.insert(param_name.clone(), param.current().clone());
            }
        }

        let status = if section.status_changed() {
            Some(section.status().clone())
        } else if !param_updates.is_empty() {
            Some(SectionStatus::ready())
        } else {
            None
        };

        if let Some(status) = status {
            updates.insert(
                section_name.clone(),
                SectionUpdate {
                    params: param_updates,
                    status,
                },
            );
        }
    }

    updates
}
