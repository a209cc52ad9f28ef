//! Workflow edit-session runtime.
//!
//! This module groups the pieces that hold and mutate the editable
//! projection of one workflow execution: the state tree with its load-time
//! baselines, the minimal-diff assembly over that tree, and the async view
//! driver that sequences orchestrator round trips.

pub mod diff;
pub mod state;
pub mod view;
