// ABOUTME: Deployment workflows built on the DeploymentApi seam.
// ABOUTME: Both verbs produce a WorkflowOutcome; no failure is swallowed.

mod filter;
mod outcome;
mod worker;

pub use filter::DeploymentFilter;
pub use outcome::{WorkflowError, WorkflowOutcome};
pub use worker::Worker;
