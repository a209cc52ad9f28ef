//! # Steward Engine
//!
//! The engine holds the client-side editable projection of one workflow
//! execution: its sections, their parameters, and the per-field edits an
//! operator has made against the loaded baseline. From that projection it
//! computes the minimal update payload to submit back to the orchestrator.
//!
//! ## Key pieces
//!
//! - **`session`**: the [`EditSession`] state tree, diff assembly, and the
//!   async [`ExecutionView`] driver that sequences load/submit/cancel calls
//! - **`client`**: the [`WorkflowApi`] seam the driver talks through,
//!   implemented for the real [`steward_api::DashboardClient`] and easily
//!   mocked in tests
//! - **`error`**: the [`SessionError`] taxonomy reported to the
//!   presentation layer
//!
//! All mutation is synchronous and runs to completion; the only asynchrony
//! is the read and write round trips to the orchestrator, and a failed
//! round trip never leaves the session partially mutated.

pub mod client;
pub mod error;
pub mod session;

pub use client::WorkflowApi;
pub use error::SessionError;
pub use session::state::{EditSession, Parameter, Section, WorkflowExecution};
pub use session::view::ExecutionView;
