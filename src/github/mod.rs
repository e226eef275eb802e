// ABOUTME: Typed access to the GitHub GraphQL deployments API.
// ABOUTME: DeploymentApi is the seam; GithubClient is the reqwest-backed implementation.

mod client;
mod error;
mod operations;
mod types;

pub use client::{DeploymentApi, GithubClient};
pub use error::ApiError;
pub use types::{
    CommitLookup, CreateDeploymentInput, CreateDeploymentStatusInput, CreatedDeployment,
    CreatedStatus, Deployment, DeploymentStatus, DeploymentStatusState, GitRef, GraphQlError,
    GraphQlResponse, RepositoryDeployments,
};
