// ABOUTME: Terminal rendering of workflow outcomes.
// ABOUTME: Successes print a short summary; failures dump the full error list as JSON.

use crate::github::Deployment;
use crate::types::DeploymentId;
use crate::workflow::{WorkflowError, WorkflowOutcome};

/// Print the list outcome and return the process exit code.
pub fn render_list(outcome: &WorkflowOutcome<Vec<Deployment>>) -> i32 {
    if !outcome.is_success {
        return render_errors(&outcome.errors);
    }

    println!("Deployments found: {}", outcome.payload.len());
    for deployment in &outcome.payload {
        let environment = deployment.environment.as_deref().unwrap_or("-");
        let git_ref = deployment
            .git_ref
            .as_ref()
            .map(|r| r.qualified())
            .unwrap_or_else(|| "-".into());
        let task = deployment.task.as_deref().unwrap_or("-");
        println!("  {}  {environment}  {git_ref}  {task}", deployment.id);
    }
    0
}

/// Print the create outcome and return the process exit code.
pub fn render_create(outcome: &WorkflowOutcome<Option<DeploymentId>>) -> i32 {
    if !outcome.is_success {
        return render_errors(&outcome.errors);
    }

    match &outcome.payload {
        Some(id) => println!("Deployment created: {id}"),
        None => println!("Deployment created"),
    }
    0
}

/// All errors are rendered, not just the first one.
fn render_errors(errors: &[WorkflowError]) -> i32 {
    if let Ok(json) = serde_json::to_string_pretty(errors) {
        eprintln!("{json}");
    } else {
        eprintln!("{errors:?}");
    }
    1
}
