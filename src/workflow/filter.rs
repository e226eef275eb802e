// ABOUTME: Predicate deciding which deployments match the list criteria.
// ABOUTME: All four fields must match exactly; only successful deployments pass.

use crate::config::DeploymentQuery;
use crate::github::{Deployment, DeploymentStatusState};

/// Matches deployments whose environment, qualified ref, task, and latest
/// status line up with the query. A missing field never matches.
pub struct DeploymentFilter<'a> {
    query: &'a DeploymentQuery,
}

impl<'a> DeploymentFilter<'a> {
    pub fn new(query: &'a DeploymentQuery) -> Self {
        Self { query }
    }

    pub fn matches(&self, deployment: &Deployment) -> bool {
        deployment.environment.as_deref() == Some(self.query.environment.as_str())
            && deployment
                .git_ref
                .as_ref()
                .is_some_and(|r| r.qualified() == self.query.git_ref)
            && deployment.task.as_deref() == Some(self.query.task.as_str())
            && deployment
                .latest_status
                .as_ref()
                .is_some_and(|s| s.state == DeploymentStatusState::Success)
    }
}
