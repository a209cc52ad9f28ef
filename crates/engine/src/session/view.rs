//! Asynchronous driver for one open execution view.
//!
//! An [`ExecutionView`] owns one `(workflow_id, run_id)` pair, the API
//! client it was constructed with, and the current [`EditSession`], if one
//! has been loaded. It sequences the orchestrator round trips explicitly:
//! a refresh replaces the session tree wholesale, a submit posts the
//! computed update set and re-baselines on success, and cancel/terminate
//! acknowledgements update the overall status optimistically without a
//! full reload. A failed round trip never partially mutates the session.

use tracing::debug;

use steward_types::WorkflowStatus;

use crate::client::WorkflowApi;
use crate::error::SessionError;
use crate::session::state::EditSession;

/// Drives load/submit/cancel/terminate for one workflow execution.
pub struct ExecutionView<C> {
    client: C,
    workflow_id: String,
    run_id: String,
    session: Option<EditSession>,
}

impl<C: WorkflowApi> ExecutionView<C> {
    /// Create a view for one execution. No network call is made until
    /// [`refresh`](Self::refresh).
    pub fn new(client: C, workflow_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            client,
            workflow_id: workflow_id.into(),
            run_id: run_id.into(),
            session: None,
        }
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The loaded session, if any.
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Mutable access for edit operations.
    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    /// Fetch fresh detail and replace the session tree wholesale.
    ///
    /// On any failure the previous session (if one was loaded) is left
    /// exactly as it was, pending edits included.
    pub async fn refresh(&mut self) -> Result<&EditSession, SessionError> {
        let raw = self
            .client
            .workflow_detail(&self.workflow_id, &self.run_id)
            .await
            .map_err(|e| SessionError::RequestFailed { detail: format!("{e:#}") })?;
        let session = EditSession::load(&raw)?;
        debug!(workflow_id = %self.workflow_id, run_id = %self.run_id, "loaded workflow detail");
        Ok(&*self.session.insert(session))
    }

    /// Submit the pending update set, if there is one.
    ///
    /// Returns `Ok(false)` when nothing was pending and no call was made.
    /// On acceptance the session is re-loaded so all baselines reflect what
    /// the orchestrator now holds; on failure the pending edits stay
    /// untouched for retry or revert.
    pub async fn submit(&mut self) -> Result<bool, SessionError> {
        let Some(session) = &self.session else {
            return Ok(false);
        };
        let updates = session.compute_diff();
        if updates.is_empty() {
            return Ok(false);
        }

        self.client
            .post_update(&self.workflow_id, &self.run_id, &updates)
            .await
            .map_err(|e| SessionError::SubmissionFailed { detail: format!("{e:#}") })?;
        debug!(workflow_id = %self.workflow_id, sections = updates.len(), "update accepted");

        self.refresh().await?;
        Ok(true)
    }

    /// Request cooperative cancellation.
    ///
    /// On acknowledgement the overall status is set to `CANCEL_REQUESTED`
    /// locally; the next refresh reconciles the full tree.
    pub async fn request_cancel(&mut self) -> Result<(), SessionError> {
        self.client
            .post_cancel(&self.workflow_id, &self.run_id)
            .await
            .map_err(|e| SessionError::SubmissionFailed { detail: format!("{e:#}") })?;
        if let Some(session) = &mut self.session {
            session.set_workflow_status(WorkflowStatus::CancelRequested);
        }
        Ok(())
    }

    /// Forcibly terminate the execution with an optional audit reason.
    ///
    /// On acknowledgement the overall status is set to `TERMINATED`
    /// locally; the next refresh reconciles the full tree.
    pub async fn terminate(&mut self, reason: Option<&str>, details: Option<&str>) -> Result<(), SessionError> {
        self.client
            .post_terminate(&self.workflow_id, &self.run_id, reason, details)
            .await
            .map_err(|e| SessionError::SubmissionFailed { detail: format!("{e:#}") })?;
        if let Some(session) = &mut self.session {
            session.set_workflow_status(WorkflowStatus::Terminated);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use steward_types::{SectionStatus, UpdateSet};

    /// In-memory orchestrator double: serves a swappable detail payload and
    /// records every call it receives.
    #[derive(Clone, Default)]
    struct MockApi {
        detail: Arc<Mutex<Value>>,
        calls: Arc<Mutex<Vec<String>>>,
        updates: Arc<Mutex<Vec<UpdateSet>>>,
        fail_writes: bool,
    }

    impl MockApi {
        fn serving(detail: Value) -> Self {
            Self {
                detail: Arc::new(Mutex::new(detail)),
                ..Self::default()
            }
        }

        fn swap_detail(&self, detail: Value) {
            *self.detail.lock().unwrap() = detail;
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WorkflowApi for MockApi {
        async fn workflow_detail(&self, _workflow_id: &str, _run_id: &str) -> Result<Value> {
            self.calls.lock().unwrap().push("detail".into());
            Ok(self.detail.lock().unwrap().clone())
        }

        async fn post_update(&self, _workflow_id: &str, _run_id: &str, updates: &UpdateSet) -> Result<()> {
            self.calls.lock().unwrap().push("update".into());
            if self.fail_writes {
                bail!("503 service unavailable");
            }
            self.updates.lock().unwrap().push(updates.clone());
            Ok(())
        }

        async fn post_cancel(&self, _workflow_id: &str, _run_id: &str) -> Result<()> {
            self.calls.lock().unwrap().push("cancel".into());
            if self.fail_writes {
                bail!("503 service unavailable");
            }
            Ok(())
        }

        async fn post_terminate(&self, _workflow_id: &str, _run_id: &str, reason: Option<&str>, _details: Option<&str>) -> Result<()> {
            self.calls.lock().unwrap().push(format!("terminate:{}", reason.unwrap_or("-")));
            Ok(())
        }
    }

    fn live_detail() -> Value {
        json!({
            "status": "IN_PROGRESS",
            "sections": {
                "A": {"status": "READY", "fixable": true, "params": {"x": "1"}}
            }
        })
    }

    #[tokio::test]
    async fn refresh_loads_a_clean_session() {
        let api = MockApi::serving(live_detail());
        let mut view = ExecutionView::new(api.clone(), "wf-1", "run-1");

        let session = view.refresh().await.expect("refresh");
        assert!(!session.has_pending_edits());
        assert_eq!(api.calls(), vec!["detail"]);
    }

    #[tokio::test]
    async fn submit_posts_the_diff_and_rebaselines() {
        let api = MockApi::serving(live_detail());
        let mut view = ExecutionView::new(api.clone(), "wf-1", "run-1");
        view.refresh().await.unwrap();
        view.session_mut().unwrap().set_parameter_value("A", "x", json!("2")).unwrap();

        // The orchestrator applies the edit and serves the updated tree.
        let mut applied = live_detail();
        applied["sections"]["A"]["params"]["x"] = json!("2");
        api.swap_detail(applied);

        let submitted = view.submit().await.expect("submit");
        assert!(submitted);
        assert_eq!(api.calls(), vec!["detail", "update", "detail"]);

        let posted = api.updates.lock().unwrap()[0].clone();
        assert_eq!(posted["A"].params["x"], json!("2"));
        assert_eq!(posted["A"].status, SectionStatus::ready());

        // Re-baselined: the submitted value is the new original.
        let session = view.session().unwrap();
        assert!(!session.has_pending_edits());
        assert_eq!(session.section("A").unwrap().param("x").unwrap().original(), &json!("2"));
    }

    #[tokio::test]
    async fn submit_with_nothing_pending_makes_no_call() {
        let api = MockApi::serving(live_detail());
        let mut view = ExecutionView::new(api.clone(), "wf-1", "run-1");
        view.refresh().await.unwrap();

        let submitted = view.submit().await.expect("submit");
        assert!(!submitted);
        assert_eq!(api.calls(), vec!["detail"]);
    }

    #[tokio::test]
    async fn failed_submission_preserves_pending_edits() {
        let mut api = MockApi::serving(live_detail());
        api.fail_writes = true;
        let mut view = ExecutionView::new(api.clone(), "wf-1", "run-1");
        view.refresh().await.unwrap();
        view.session_mut().unwrap().set_parameter_value("A", "x", json!("2")).unwrap();

        let error = view.submit().await.expect_err("must fail");
        assert!(matches!(error, SessionError::SubmissionFailed { .. }));

        let session = view.session().unwrap();
        assert!(session.has_pending_edits());
        assert_eq!(session.section("A").unwrap().param("x").unwrap().current(), &json!("2"));
    }

    #[tokio::test]
    async fn failed_refresh_leaves_the_previous_session_intact() {
        let api = MockApi::serving(live_detail());
        let mut view = ExecutionView::new(api.clone(), "wf-1", "run-1");
        view.refresh().await.unwrap();
        view.session_mut().unwrap().set_parameter_value("A", "x", json!("2")).unwrap();

        api.swap_detail(json!({"status": "IN_PROGRESS"}));
        let error = view.refresh().await.expect_err("must fail");
        assert!(matches!(error, SessionError::MalformedResponse { .. }));

        let session = view.session().unwrap();
        assert!(session.has_pending_edits());
        assert_eq!(session.section("A").unwrap().param("x").unwrap().current(), &json!("2"));
    }

    #[tokio::test]
    async fn cancel_is_optimistic_without_a_reload() {
        let api = MockApi::serving(live_detail());
        let mut view = ExecutionView::new(api.clone(), "wf-1", "run-1");
        view.refresh().await.unwrap();

        view.request_cancel().await.expect("cancel");
        assert_eq!(api.calls(), vec!["detail", "cancel"]);
        assert_eq!(view.session().unwrap().execution().status(), WorkflowStatus::CancelRequested);
    }

    #[tokio::test]
    async fn terminate_forwards_the_audit_reason() {
        let api = MockApi::serving(live_detail());
        let mut view = ExecutionView::new(api.clone(), "wf-1", "run-1");
        view.refresh().await.unwrap();

        view.terminate(Some("stuck decider"), Some("paged on-call")).await.expect("terminate");
        assert_eq!(api.calls(), vec!["detail", "terminate:stuck decider"]);
        assert_eq!(view.session().unwrap().execution().status(), WorkflowStatus::Terminated);
    }
}
