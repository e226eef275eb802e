// ABOUTME: The list and create deployment workflows.
// ABOUTME: Create is a strict three-step chain; the first failure ends the run.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::filter::DeploymentFilter;
use super::outcome::WorkflowOutcome;
use crate::config::{DeploymentQuery, DeploymentRequest};
use crate::github::{
    CreateDeploymentInput, CreateDeploymentStatusInput, Deployment, DeploymentApi,
    DeploymentStatusState,
};
use crate::types::DeploymentId;

/// Executes the deployment workflows against a GitHub API client.
///
/// Retries live below this layer, inside the transport; a failed step here
/// is final for the invocation.
pub struct Worker<C> {
    client: C,
}

impl<C: DeploymentApi> Worker<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// List the deployments matching `query`.
    ///
    /// The server filters by environment; ref, task, and status are matched
    /// locally. Surviving deployments keep the server's order.
    pub async fn list_deployments(
        &self,
        query: &DeploymentQuery,
        cancel: &CancellationToken,
    ) -> WorkflowOutcome<Vec<Deployment>> {
        let environments = vec![query.environment.clone()];
        let page = match self
            .client
            .list_repository_deployments(&query.owner, &query.repository, &environments, cancel)
            .await
        {
            Ok(page) => page,
            Err(error) => return WorkflowOutcome::from_api_error(error),
        };

        let total = page.deployments.len();
        let filter = DeploymentFilter::new(query);
        let matching: Vec<Deployment> = page
            .deployments
            .into_iter()
            .filter(|deployment| filter.matches(deployment))
            .collect();
        debug!(total, matching = matching.len(), "filtered deployments");

        WorkflowOutcome::success(matching)
    }

    /// Create a deployment and mark it successful.
    ///
    /// Three dependent remote calls: resolve the commit, create the
    /// deployment, set its status. The first failure ends the chain, and
    /// remote objects already created by earlier steps are left as they are.
    pub async fn create_deployment(
        &self,
        request: &DeploymentRequest,
        cancel: &CancellationToken,
    ) -> WorkflowOutcome<Option<DeploymentId>> {
        let lookup = match self
            .client
            .repository_commit(&request.owner, &request.repository, &request.git_ref, cancel)
            .await
        {
            Ok(lookup) => lookup,
            Err(error) => return WorkflowOutcome::from_api_error(error),
        };
        let Some(repository_id) = lookup.repository_id else {
            return WorkflowOutcome::domain(format!(
                "repository {}/{} resolved to no id",
                request.owner, request.repository
            ));
        };
        let Some(ref_id) = lookup.ref_id else {
            return WorkflowOutcome::domain(format!(
                "ref {} resolved to no id",
                request.git_ref
            ));
        };
        debug!(%repository_id, %ref_id, "resolved commit");

        let input = CreateDeploymentInput {
            repository_id,
            ref_id,
            environment: request.environment.clone(),
            description: request.description.clone(),
            payload: request.payload.clone(),
            task: request.task.clone(),
            auto_merge: false,
            required_contexts: Vec::new(),
        };
        let created = match self.client.create_deployment(&input, cancel).await {
            Ok(created) => created,
            Err(error) => return WorkflowOutcome::from_api_error(error),
        };
        let Some(deployment_id) = created.deployment_id else {
            return WorkflowOutcome::domain("createDeployment returned no deployment id");
        };
        debug!(%deployment_id, "created deployment");

        let status_input = CreateDeploymentStatusInput {
            deployment_id: deployment_id.clone(),
            environment: request.environment.clone(),
            description: request.description.clone(),
            state: DeploymentStatusState::Success,
        };
        if let Err(error) = self
            .client
            .create_deployment_status(&status_input, cancel)
            .await
        {
            return WorkflowOutcome::from_api_error(error);
        }
        debug!(%deployment_id, "marked deployment successful");

        WorkflowOutcome::success(Some(deployment_id))
    }
}
