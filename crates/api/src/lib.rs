//! Orchestrator API client utilities.
//!
//! This module provides a lightweight client for the workflow orchestrator's
//! REST surface. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Discovering credentials from `STEWARD_API_TOKEN` or `~/.netrc`
//! - Validating `STEWARD_API_BASE` for safety
//! - The four workflow calls the console consumes: detail, update, cancel,
//!   and terminate
//!
//! The primary entry point is [`DashboardClient`]. Create an instance via
//! [`DashboardClient::new_from_env`], then call the endpoint methods.

use std::time::Duration;
use std::{env, fs};

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, RequestBuilder, header};
use serde_json::Value;
use url::Url;
use steward_types::UpdateSet;
use tracing::debug;

/// Environment variable carrying the orchestrator base URL.
pub const API_BASE_ENV: &str = "STEWARD_API_BASE";
/// Environment variable carrying the bearer token.
pub const API_TOKEN_ENV: &str = "STEWARD_API_TOKEN";
/// Fallback base URL for local development against a sidecar dashboard.
const DEFAULT_API_BASE: &str = "http://localhost:7311/";

/// Hostnames allowed to use plain HTTP for local development.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for orchestrator access.
///
/// The client pre-configures default headers and builds requests against a
/// validated base URL. Authentication is read from the environment or the
/// user's `~/.netrc` entry for the configured host.
pub struct DashboardClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl DashboardClient {
    /// Construct a [`DashboardClient`] from environment variables and `~/.netrc`.
    ///
    /// Resolution order for authentication:
    /// - `STEWARD_API_TOKEN` environment variable
    /// - `~/.netrc` entry whose machine matches the base URL host
    ///
    /// The base URL is taken from `STEWARD_API_BASE` (if set) or falls back
    /// to the local default. Non-localhost hosts must use HTTPS.
    pub fn new_from_env() -> Result<Self> {
        let base_url = env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.into());
        let host = validate_base_url(&base_url)?;

        let api_token = env::var(API_TOKEN_ENV).ok().or_else(|| get_netrc_token(&host));

        let mut default_headers = header::HeaderMap::new();
        if let Some(api_token) = api_token {
            let authorization_header_value = format!("Bearer {}", api_token);
            default_headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&authorization_header_value).context("bearer token contains invalid header bytes")?,
            );
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("steward-console/0.1; {}", env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    ///
    /// The resulting request includes the configured User-Agent and base
    /// headers, and is resolved relative to `self.base_url`.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Fetch the raw detail payload for one workflow execution.
    ///
    /// The payload is returned unstructured; the edit session is responsible
    /// for shaping it and reporting malformed responses.
    pub async fn workflow_detail(&self, workflow_id: &str, run_id: &str) -> Result<Value> {
        let response = self
            .request(reqwest::Method::GET, "/workflow/detail")
            .query(&[("workflowId", workflow_id), ("runId", run_id)])
            .send()
            .await
            .context("request workflow detail")?;
        let response = check_status(response, "workflow detail").await?;
        response.json().await.context("decode workflow detail body")
    }

    /// Submit a section update set for one workflow execution.
    ///
    /// The orchestrator expects the update set as a JSON string under the
    /// `input` key, alongside the execution identifiers.
    pub async fn update_workflow(&self, workflow_id: &str, run_id: &str, updates: &UpdateSet) -> Result<()> {
        let input = serde_json::to_string(updates).context("encode update set")?;
        let body = serde_json::json!({
            "workflowId": workflow_id,
            "runId": run_id,
            "input": input,
        });
        let response = self
            .request(reqwest::Method::POST, "/workflow/update")
            .json(&body)
            .send()
            .await
            .context("request workflow update")?;
        check_status(response, "workflow update").await?;
        Ok(())
    }

    /// Request cancellation of a workflow execution.
    pub async fn cancel_workflow(&self, workflow_id: &str, run_id: &str) -> Result<()> {
        let body = serde_json::json!({
            "workflowId": workflow_id,
            "runId": run_id,
        });
        let response = self
            .request(reqwest::Method::POST, "/workflow/cancel")
            .json(&body)
            .send()
            .await
            .context("request workflow cancel")?;
        check_status(response, "workflow cancel").await?;
        Ok(())
    }

    /// Forcibly terminate a workflow execution with an audit reason.
    pub async fn terminate_workflow(&self, workflow_id: &str, run_id: &str, reason: Option<&str>, details: Option<&str>) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert("workflowId".into(), Value::String(workflow_id.into()));
        body.insert("runId".into(), Value::String(run_id.into()));
        if let Some(reason) = reason {
            body.insert("reason".into(), Value::String(reason.into()));
        }
        if let Some(details) = details {
            body.insert("details".into(), Value::String(details.into()));
        }
        let response = self
            .request(reqwest::Method::POST, "/workflow/terminate")
            .json(&Value::Object(body))
            .send()
            .await
            .context("request workflow terminate")?;
        check_status(response, "workflow terminate").await?;
        Ok(())
    }
}

/// Turn a non-success HTTP status into an error carrying the response text.
async fn check_status(response: reqwest::Response, operation: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response.text().await.unwrap_or_default();
    bail!("{operation} failed: {status}: {detail}")
}

/// Validate that a base URL is acceptable, returning its host.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<String> {
    let parsed_base_url = Url::parse(base).map_err(|e| anyhow!("Invalid {} URL '{}': {}", API_BASE_ENV, base, e))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| anyhow!("{} must include a host", API_BASE_ENV))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(host_name.to_string());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(anyhow!(
            "{} must use https for non-localhost hosts; got '{}://'",
            API_BASE_ENV,
            parsed_base_url.scheme()
        ));
    }

    Ok(host_name.to_string())
}

/// Attempt to read an API token for `host` from the user's `~/.netrc` file.
fn get_netrc_token(host: &str) -> Option<String> {
    let home = dirs_next::home_dir()?;
    let netrc_path = home.join(".netrc");
    let content = fs::read_to_string(netrc_path).ok()?;
    parse_netrc_for_host(&content, host)
}

/// Very small/naive `.netrc` parser that extracts the password for a host.
///
/// The expected form is roughly:
///
/// ```text
/// machine orchestrator.example.com
///   login operator
///   password <TOKEN>
/// ```
///
/// This function is intentionally minimal and forgiving to support common
/// developer setups without introducing a full parser dependency.
fn parse_netrc_for_host(content: &str, host: &str) -> Option<String> {
    let mut expect_machine_name = false;
    let mut in_target_machine = false;
    let mut saw_password_keyword = false;

    for token in content.split_whitespace() {
        match token {
            // Reset state at a new machine stanza
            "machine" => {
                expect_machine_name = true;
                in_target_machine = false;
                saw_password_keyword = false;
            }
            name if expect_machine_name => {
                expect_machine_name = false;
                in_target_machine = name.eq_ignore_ascii_case(host);
            }
            "password" if in_target_machine => {
                saw_password_keyword = true;
            }
            value if in_target_machine && saw_password_keyword => {
                return Some(value.to_string());
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_base_allows_plain_http() {
        assert_eq!(validate_base_url("http://localhost:7311/").unwrap(), "localhost");
        assert_eq!(validate_base_url("http://127.0.0.1:8080/").unwrap(), "127.0.0.1");
    }

    #[test]
    fn remote_base_requires_https() {
        assert!(validate_base_url("http://orchestrator.example.com/").is_err());
        assert_eq!(
            validate_base_url("https://orchestrator.example.com/").unwrap(),
            "orchestrator.example.com"
        );
    }

    #[test]
    fn rejects_hostless_base() {
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn netrc_parser_matches_configured_host() {
        let netrc = "machine other.example.com\n  login operator\n  password wrong\nmachine orchestrator.example.com\n  login operator\n  password sekrit-token\n";
        assert_eq!(
            parse_netrc_for_host(netrc, "orchestrator.example.com").as_deref(),
            Some("sekrit-token")
        );
        assert_eq!(parse_netrc_for_host(netrc, "other.example.com").as_deref(), Some("wrong"));
        assert!(parse_netrc_for_host(netrc, "missing.example.com").is_none());
    }
}
