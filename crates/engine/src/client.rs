//! The API seam between the edit session and the orchestrator.
//!
//! [`ExecutionView`](crate::session::view::ExecutionView) talks to the
//! orchestrator only through the [`WorkflowApi`] trait, so tests can drive
//! the full load/edit/submit cycle against an in-memory double while the
//! CLI wires in the real [`DashboardClient`].

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use steward_api::DashboardClient;
use steward_types::UpdateSet;

/// Asynchronous contract for the orchestrator's workflow endpoints.
///
/// All methods resolve to either success or an error value; callers control
/// sequencing and no call mutates session state by itself.
#[async_trait]
pub trait WorkflowApi {
    /// Fetch the raw detail payload for `(workflow_id, run_id)`.
    async fn workflow_detail(&self, workflow_id: &str, run_id: &str) -> Result<Value>;

    /// Submit a section update set for `(workflow_id, run_id)`.
    async fn post_update(&self, workflow_id: &str, run_id: &str, updates: &UpdateSet) -> Result<()>;

    /// Request cooperative cancellation of the execution.
    async fn post_cancel(&self, workflow_id: &str, run_id: &str) -> Result<()>;

    /// Forcibly terminate the execution with an optional audit reason.
    async fn post_terminate(&self, workflow_id: &str, run_id: &str, reason: Option<&str>, details: Option<&str>) -> Result<()>;
}

#[async_trait]
impl WorkflowApi for DashboardClient {
    async fn workflow_detail(&self, workflow_id: &str, run_id: &str) -> Result<Value> {
        DashboardClient::workflow_detail(self, workflow_id, run_id).await
    }

    async fn post_update(&self, workflow_id: &str, run_id: &str, updates: &UpdateSet) -> Result<()> {
        self.update_workflow(workflow_id, run_id, updates).await
    }

    async fn post_cancel(&self, workflow_id: &str, run_id: &str) -> Result<()> {
        self.cancel_workflow(workflow_id, run_id).await
    }

    async fn post_terminate(&self, workflow_id: &str, run_id: &str, reason: Option<&str>, details: Option<&str>) -> Result<()> {
        self.terminate_workflow(workflow_id, run_id, reason, details).await
    }
}
