// ABOUTME: Typed views of the GraphQL data the tool consumes and produces.
// ABOUTME: Field nullability mirrors the GitHub schema; the workflows decide what absence means.

use serde::{Deserialize, Serialize};

use crate::types::{DeploymentId, RefId, RepositoryId, StatusId};

/// One GraphQL error, passed through to outcomes verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
}

impl GraphQlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
        }
    }
}

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// States a deployment status can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatusState {
    Pending,
    Success,
    Failure,
    Error,
    InProgress,
    Queued,
    Inactive,
    Waiting,
    Destroyed,
}

/// Branch or tag pointer, split the way the API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitRef {
    pub prefix: String,
    pub name: String,
}

impl GitRef {
    /// Fully qualified ref, e.g. "refs/heads/" + "main".
    pub fn qualified(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }
}

/// Latest status attached to a deployment node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    pub state: DeploymentStatusState,
}

/// A deployment as returned by the repository's deployments connection.
/// Read-only within this tool; creation happens through the mutations below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: DeploymentId,
    pub environment: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<GitRef>,
    pub task: Option<String>,
    pub latest_status: Option<DeploymentStatus>,
}

/// Deployments of one repository, in the order the server returned them.
#[derive(Debug, Clone, Default)]
pub struct RepositoryDeployments {
    pub repository_id: Option<RepositoryId>,
    pub deployments: Vec<Deployment>,
}

/// Repository and ref node ids resolved ahead of deployment creation.
///
/// Either id may be absent when the repository or ref does not exist; the
/// create workflow treats that as a fatal domain error, not a transient one.
#[derive(Debug, Clone, Default)]
pub struct CommitLookup {
    pub repository_id: Option<RepositoryId>,
    pub ref_id: Option<RefId>,
}

/// Variables for the createDeployment mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentInput {
    pub repository_id: RepositoryId,
    pub ref_id: RefId,
    pub environment: String,
    pub description: String,
    pub payload: String,
    pub task: String,
    /// The schema defaults this to true; merging the base branch into the
    /// ref as a side effect of recording a deployment is never wanted here.
    pub auto_merge: bool,
    pub required_contexts: Vec<String>,
}

/// Result of the createDeployment mutation.
#[derive(Debug, Clone, Default)]
pub struct CreatedDeployment {
    pub deployment_id: Option<DeploymentId>,
    pub environment: Option<String>,
    pub description: Option<String>,
    pub task: Option<String>,
}

/// Variables for the createDeploymentStatus mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentStatusInput {
    pub deployment_id: DeploymentId,
    pub environment: String,
    pub description: String,
    pub state: DeploymentStatusState,
}

/// Result of the createDeploymentStatus mutation.
#[derive(Debug, Clone, Default)]
pub struct CreatedStatus {
    pub status_id: Option<StatusId>,
    pub state: Option<DeploymentStatusState>,
}
