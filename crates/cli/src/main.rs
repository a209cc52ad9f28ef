//! `steward` — operator console CLI for workflow executions.
//!
//! Wraps the edit-session engine in four subcommands: `show` an execution's
//! sections and parameters, `update` parameter values and section statuses,
//! and `cancel` / `terminate` a running execution.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::Level;

use steward_api::DashboardClient;
use steward_engine::ExecutionView;
use steward_types::SectionStatus;

#[derive(Parser)]
#[command(name = "steward", about = "Operator console for workflow executions", version)]
struct Cli {
    /// Workflow identifier.
    #[arg(long)]
    workflow: String,
    /// Run identifier of the execution.
    #[arg(long)]
    run: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show an execution's status, sections, and parameters.
    Show,
    /// Edit parameter values and section statuses, then submit the diff.
    Update {
        /// Parameter edit as SECTION.PARAM=VALUE; VALUE is parsed as JSON,
        /// falling back to a plain string. Repeatable.
        #[arg(long = "set", value_name = "SECTION.PARAM=VALUE")]
        sets: Vec<String>,
        /// Section status assignment as SECTION=STATUS. Repeatable.
        #[arg(long = "status", value_name = "SECTION=STATUS")]
        statuses: Vec<String>,
        /// Print the computed update set without submitting it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Request cooperative cancellation of the execution.
    Cancel,
    /// Forcibly terminate the execution.
    Terminate {
        /// Audit reason recorded with the termination.
        #[arg(long)]
        reason: Option<String>,
        /// Free-form detail recorded with the termination.
        #[arg(long)]
        details: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let client = DashboardClient::new_from_env()?;
    let mut view = ExecutionView::new(client, cli.workflow, cli.run);

    match cli.command {
        Command::Show => show(&mut view).await,
        Command::Update { sets, statuses, dry_run } => update(&mut view, &sets, &statuses, dry_run).await,
        Command::Cancel => {
            view.request_cancel().await?;
            println!("cancel requested for {}/{}", view.workflow_id(), view.run_id());
            Ok(())
        }
        Command::Terminate { reason, details } => {
            view.terminate(reason.as_deref(), details.as_deref()).await?;
            println!("terminated {}/{}", view.workflow_id(), view.run_id());
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .try_init();
}

async fn show(view: &mut ExecutionView<DashboardClient>) -> Result<()> {
    view.refresh().await?;
    let session = view.session().context("no session loaded")?;
    let execution = session.execution();

    println!("{}/{}  {}", view.workflow_id(), view.run_id(), execution.status());
    for tag in execution.tags() {
        println!("  tag {tag}");
    }
    for (name, section) in execution.sections() {
        let fixable = if section.is_fixable() { " (fixable)" } else { "" };
        println!("{name}: {}{fixable}", section.status());
        for (param_name, param) in section.params() {
            println!("  {param_name} = {}", serde_json::to_string(param.current())?);
        }
        for note in section.notes() {
            println!("  note: {note}");
        }
        for event in section.timeline() {
            println!("  [{:?}] {}", event.event_type, event.message);
        }
    }
    Ok(())
}

async fn update(view: &mut ExecutionView<DashboardClient>, sets: &[String], statuses: &[String], dry_run: bool) -> Result<()> {
    if sets.is_empty() && statuses.is_empty() {
        bail!("nothing to update; pass --set and/or --status");
    }

    view.refresh().await?;
    let session = view
        .session_mut()
        .context("no session loaded")?;

    for entry in sets {
        let (section, param, value) = parse_set_entry(entry)?;
        session.set_parameter_value(section, param, value)?;
    }
    for entry in statuses {
        let (section, status) = parse_status_entry(entry)?;
        session.set_section_status(section, status)?;
    }

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&session.compute_diff())?);
        return Ok(());
    }

    if view.submit().await? {
        println!("update accepted; execution reloaded");
    } else {
        println!("no changes to submit");
    }
    Ok(())
}

/// Parse `SECTION.PARAM=VALUE`, treating the value as JSON when it parses
/// and as a plain string otherwise.
fn parse_set_entry(entry: &str) -> Result<(&str, &str, Value)> {
    let (target, raw_value) = entry
        .split_once('=')
        .with_context(|| format!("expected SECTION.PARAM=VALUE, got '{entry}'"))?;
    let (section, param) = target
        .split_once('.')
        .with_context(|| format!("expected SECTION.PARAM on the left of '=', got '{target}'"))?;
    let value = serde_json::from_str(raw_value).unwrap_or_else(|_| Value::String(raw_value.to_string()));
    Ok((section, param, value))
}

/// Parse `SECTION=STATUS`.
fn parse_status_entry(entry: &str) -> Result<(&str, SectionStatus)> {
    let (section, status) = entry
        .split_once('=')
        .with_context(|| format!("expected SECTION=STATUS, got '{entry}'"))?;
    Ok((section, SectionStatus::from(status)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_entries_parse_json_values() {
        let (section, param, value) = parse_set_entry("adcopy.budget={\"daily\":120}").unwrap();
        assert_eq!((section, param), ("adcopy", "budget"));
        assert_eq!(value, json!({"daily": 120}));
    }

    #[test]
    fn set_entries_fall_back_to_strings() {
        let (_, _, value) = parse_set_entry("adcopy.headline=Spring Sale").unwrap();
        assert_eq!(value, json!("Spring Sale"));
    }

    #[test]
    fn malformed_set_entries_are_rejected_with_context() {
        assert!(parse_set_entry("no-equals-sign").is_err());
        assert!(parse_set_entry("nodot=1").is_err());
    }

    #[test]
    fn status_entries_split_on_the_first_equals() {
        let (section, status) = parse_status_entry("adcopy=DISMISSED").unwrap();
        assert_eq!(section, "adcopy");
        assert_eq!(status, SectionStatus::from("DISMISSED"));
    }
}
