// ABOUTME: Stub DeploymentApi implementation for workflow tests.
// ABOUTME: Records call counts and hands out scripted responses.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use ghdtool::config::{DeploymentQuery, DeploymentRequest};
use ghdtool::github::{
    ApiError, CommitLookup, CreateDeploymentInput, CreateDeploymentStatusInput, CreatedDeployment,
    CreatedStatus, DeploymentApi, GraphQlError, RepositoryDeployments,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub commit: usize,
    pub create: usize,
    pub status: usize,
}

/// Scripted API double. Each response is consumed by at most one call;
/// an unscripted call panics, which doubles as a short-circuit assertion.
#[derive(Default)]
pub struct StubApi {
    counts: Mutex<CallCounts>,
    list_response: Mutex<Option<Result<RepositoryDeployments, ApiError>>>,
    commit_response: Mutex<Option<Result<CommitLookup, ApiError>>>,
    create_response: Mutex<Option<Result<CreatedDeployment, ApiError>>>,
    status_response: Mutex<Option<Result<CreatedStatus, ApiError>>>,
    last_environments: Mutex<Option<Vec<String>>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_list(self, response: Result<RepositoryDeployments, ApiError>) -> Self {
        *self.list_response.lock().unwrap() = Some(response);
        self
    }

    pub fn on_commit(self, response: Result<CommitLookup, ApiError>) -> Self {
        *self.commit_response.lock().unwrap() = Some(response);
        self
    }

    pub fn on_create(self, response: Result<CreatedDeployment, ApiError>) -> Self {
        *self.create_response.lock().unwrap() = Some(response);
        self
    }

    pub fn on_status(self, response: Result<CreatedStatus, ApiError>) -> Self {
        *self.status_response.lock().unwrap() = Some(response);
        self
    }

    pub fn counts(&self) -> CallCounts {
        *self.counts.lock().unwrap()
    }

    pub fn requested_environments(&self) -> Option<Vec<String>> {
        self.last_environments.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeploymentApi for StubApi {
    async fn list_repository_deployments(
        &self,
        _owner: &str,
        _name: &str,
        environments: &[String],
        _cancel: &CancellationToken,
    ) -> Result<RepositoryDeployments, ApiError> {
        self.counts.lock().unwrap().list += 1;
        *self.last_environments.lock().unwrap() = Some(environments.to_vec());
        self.list_response
            .lock()
            .unwrap()
            .take()
            .expect("unexpected list call")
    }

    async fn repository_commit(
        &self,
        _owner: &str,
        _name: &str,
        _qualified_ref: &str,
        _cancel: &CancellationToken,
    ) -> Result<CommitLookup, ApiError> {
        self.counts.lock().unwrap().commit += 1;
        self.commit_response
            .lock()
            .unwrap()
            .take()
            .expect("unexpected commit lookup call")
    }

    async fn create_deployment(
        &self,
        _input: &CreateDeploymentInput,
        _cancel: &CancellationToken,
    ) -> Result<CreatedDeployment, ApiError> {
        self.counts.lock().unwrap().create += 1;
        self.create_response
            .lock()
            .unwrap()
            .take()
            .expect("unexpected create deployment call")
    }

    async fn create_deployment_status(
        &self,
        _input: &CreateDeploymentStatusInput,
        _cancel: &CancellationToken,
    ) -> Result<CreatedStatus, ApiError> {
        self.counts.lock().unwrap().status += 1;
        self.status_response
            .lock()
            .unwrap()
            .take()
            .expect("unexpected create status call")
    }
}

pub fn graph_errors(messages: &[&str]) -> ApiError {
    ApiError::Graph(messages.iter().map(|m| GraphQlError::new(*m)).collect())
}

pub fn query() -> DeploymentQuery {
    DeploymentQuery {
        owner: "acme".into(),
        repository: "widgets".into(),
        token: "tok".into(),
        environment: "prod".into(),
        git_ref: "refs/heads/main".into(),
        task: "deploy".into(),
    }
}

pub fn request() -> DeploymentRequest {
    DeploymentRequest {
        owner: "acme".into(),
        repository: "widgets".into(),
        token: "tok".into(),
        environment: "prod".into(),
        git_ref: "refs/heads/main".into(),
        task: "deploy".into(),
        payload: "{}".into(),
        description: "release".into(),
        production_environment: true,
    }
}
