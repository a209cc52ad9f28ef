//! Shared type definitions for the Steward operator console.
//!
//! Everything the engine, API client, and CLI agree on lives here: the
//! status vocabularies used by the orchestrator, the wire payloads returned
//! by its workflow detail endpoint, the update payload submitted back, and
//! the value-kind classification applied to parameter values at load time.

pub mod detail;
pub mod status;
pub mod value;

pub use detail::{ExecutionDetail, SectionDetail, SectionUpdate, TimelineEvent, TimelineKind, UpdateSet};
pub use status::{SectionStatus, WorkflowStatus};
pub use value::ValueKind;
