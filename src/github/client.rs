// ABOUTME: Typed GitHub GraphQL operations behind the DeploymentApi trait.
// ABOUTME: GithubClient executes them through the resilient transport.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::error::ApiError;
use super::operations;
use super::types::{
    CommitLookup, CreateDeploymentInput, CreateDeploymentStatusInput, CreatedDeployment,
    CreatedStatus, Deployment, DeploymentStatusState, GraphQlResponse, RepositoryDeployments,
};
use crate::resilience::ResilientTransport;
use crate::types::{DeploymentId, RefId, RepositoryId, StatusId};

/// The deployment operations the workflows depend on.
///
/// One implementation talks to GitHub; tests substitute stubs to observe
/// call sequences without a network.
#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// Deployments of a repository, server-filtered by environment, newest
    /// first.
    async fn list_repository_deployments(
        &self,
        owner: &str,
        name: &str,
        environments: &[String],
        cancel: &CancellationToken,
    ) -> Result<RepositoryDeployments, ApiError>;

    /// Repository and ref node ids for a qualified ref.
    async fn repository_commit(
        &self,
        owner: &str,
        name: &str,
        qualified_ref: &str,
        cancel: &CancellationToken,
    ) -> Result<CommitLookup, ApiError>;

    async fn create_deployment(
        &self,
        input: &CreateDeploymentInput,
        cancel: &CancellationToken,
    ) -> Result<CreatedDeployment, ApiError>;

    async fn create_deployment_status(
        &self,
        input: &CreateDeploymentStatusInput,
        cancel: &CancellationToken,
    ) -> Result<CreatedStatus, ApiError>;
}

/// GitHub GraphQL client over the resilient transport.
pub struct GithubClient {
    transport: ResilientTransport,
}

impl GithubClient {
    pub fn new(transport: ResilientTransport) -> Self {
        Self { transport }
    }

    /// Execute one document and unwrap the response envelope.
    ///
    /// Non-empty `errors` wins over `data`: GitHub returns partial data next
    /// to errors, and a partial answer is an error result for our purposes.
    async fn run<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: serde_json::Value,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let body = json!({ "query": document, "variables": variables });
        let text = self.transport.execute(&body, cancel).await?;
        let envelope: GraphQlResponse<T> =
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?;
        if !envelope.errors.is_empty() {
            return Err(ApiError::Graph(envelope.errors));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::Decode("response carried neither data nor errors".into()))
    }
}

#[async_trait]
impl DeploymentApi for GithubClient {
    async fn list_repository_deployments(
        &self,
        owner: &str,
        name: &str,
        environments: &[String],
        cancel: &CancellationToken,
    ) -> Result<RepositoryDeployments, ApiError> {
        let variables = json!({ "owner": owner, "name": name, "environments": environments });
        let data: ListData = self
            .run(operations::LIST_REPOSITORY_DEPLOYMENTS, variables, cancel)
            .await?;

        Ok(match data.repository {
            Some(repository) => RepositoryDeployments {
                repository_id: Some(repository.id),
                deployments: repository.deployments.flatten(),
            },
            None => RepositoryDeployments::default(),
        })
    }

    async fn repository_commit(
        &self,
        owner: &str,
        name: &str,
        qualified_ref: &str,
        cancel: &CancellationToken,
    ) -> Result<CommitLookup, ApiError> {
        let variables = json!({ "owner": owner, "name": name, "ref": qualified_ref });
        let data: CommitData = self
            .run(operations::REPOSITORY_COMMIT, variables, cancel)
            .await?;

        let repository = data.repository;
        Ok(CommitLookup {
            repository_id: repository.as_ref().map(|r| r.id.clone()),
            ref_id: repository.and_then(|r| r.git_ref).map(|r| r.id),
        })
    }

    async fn create_deployment(
        &self,
        input: &CreateDeploymentInput,
        cancel: &CancellationToken,
    ) -> Result<CreatedDeployment, ApiError> {
        let variables = json!({ "input": input });
        let data: CreateDeploymentData = self
            .run(operations::CREATE_DEPLOYMENT, variables, cancel)
            .await?;

        let deployment = data.create_deployment.and_then(|p| p.deployment);
        Ok(match deployment {
            Some(deployment) => CreatedDeployment {
                deployment_id: Some(deployment.id),
                environment: deployment.environment,
                description: deployment.description,
                task: deployment.task,
            },
            None => CreatedDeployment::default(),
        })
    }

    async fn create_deployment_status(
        &self,
        input: &CreateDeploymentStatusInput,
        cancel: &CancellationToken,
    ) -> Result<CreatedStatus, ApiError> {
        let variables = json!({ "input": input });
        let data: CreateStatusData = self
            .run(operations::CREATE_DEPLOYMENT_STATUS, variables, cancel)
            .await?;

        let status = data.create_deployment_status.and_then(|p| p.deployment_status);
        Ok(match status {
            Some(status) => CreatedStatus {
                status_id: Some(status.id),
                state: status.state,
            },
            None => CreatedStatus::default(),
        })
    }
}

// Response shapes, private to the client. Connections and payloads are
// nullable at every level in the schema.

#[derive(Deserialize)]
struct ListData {
    repository: Option<ListRepository>,
}

#[derive(Deserialize)]
struct ListRepository {
    id: RepositoryId,
    deployments: DeploymentConnection,
}

#[derive(Deserialize)]
struct DeploymentConnection {
    #[serde(default)]
    edges: Option<Vec<Option<DeploymentEdge>>>,
}

impl DeploymentConnection {
    fn flatten(self) -> Vec<Deployment> {
        self.edges
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|edge| edge.node)
            .collect()
    }
}

#[derive(Deserialize)]
struct DeploymentEdge {
    node: Option<Deployment>,
}

#[derive(Deserialize)]
struct CommitData {
    repository: Option<CommitRepository>,
}

#[derive(Deserialize)]
struct CommitRepository {
    id: RepositoryId,
    #[serde(rename = "ref")]
    git_ref: Option<RefNode>,
}

#[derive(Deserialize)]
struct RefNode {
    id: RefId,
}

#[derive(Deserialize)]
struct CreateDeploymentData {
    #[serde(rename = "createDeployment")]
    create_deployment: Option<CreateDeploymentPayload>,
}

#[derive(Deserialize)]
struct CreateDeploymentPayload {
    deployment: Option<DeploymentStub>,
}

#[derive(Deserialize)]
struct DeploymentStub {
    id: DeploymentId,
    environment: Option<String>,
    description: Option<String>,
    task: Option<String>,
}

#[derive(Deserialize)]
struct CreateStatusData {
    #[serde(rename = "createDeploymentStatus")]
    create_deployment_status: Option<CreateStatusPayload>,
}

#[derive(Deserialize)]
struct CreateStatusPayload {
    #[serde(rename = "deploymentStatus")]
    deployment_status: Option<StatusStub>,
}

#[derive(Deserialize)]
struct StatusStub {
    id: StatusId,
    state: Option<DeploymentStatusState>,
}
