//! Error taxonomy surfaced to the presentation layer.

use thiserror::Error;

/// Errors reported by edit-session operations and the execution driver.
///
/// None of these corrupt session state: a failed load leaves the previous
/// tree (if any) untouched, a rejected mutation changes nothing, and a
/// failed submission preserves pending edits for retry or revert.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The orchestrator returned detail data the session cannot structure.
    #[error("malformed workflow detail: {detail}")]
    MalformedResponse { detail: String },
    /// A mutation addressed a parameter that is missing or not editable.
    #[error("parameter '{section}.{param}' is not editable: {detail}")]
    NotEditable {
        section: String,
        param: String,
        detail: String,
    },
    /// A mutation addressed a section that does not exist.
    #[error("no section named '{section}'")]
    UnknownSection { section: String },
    /// A read round trip to the orchestrator failed before any state change.
    #[error("workflow detail request failed: {detail}")]
    RequestFailed { detail: String },
    /// A write round trip to the orchestrator failed; edits are preserved.
    #[error("workflow update rejected: {detail}")]
    SubmissionFailed { detail: String },
}
