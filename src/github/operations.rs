// ABOUTME: Static GraphQL documents for the four deployment operations.
// ABOUTME: Variables are serialized by the client; see types.rs for the shapes.

pub const LIST_REPOSITORY_DEPLOYMENTS: &str = r"
query ListRepositoryDeployments($owner: String!, $name: String!, $environments: [String!]) {
  repository(owner: $owner, name: $name) {
    id
    deployments(first: 100, environments: $environments, orderBy: {field: CREATED_AT, direction: DESC}) {
      edges {
        node {
          id
          environment
          task
          ref {
            prefix
            name
          }
          latestStatus {
            state
          }
        }
      }
    }
  }
}";

pub const REPOSITORY_COMMIT: &str = r"
query RepositoryCommit($owner: String!, $name: String!, $ref: String!) {
  repository(owner: $owner, name: $name) {
    id
    ref(qualifiedName: $ref) {
      id
    }
  }
}";

pub const CREATE_DEPLOYMENT: &str = r"
mutation CreateDeployment($input: CreateDeploymentInput!) {
  createDeployment(input: $input) {
    deployment {
      id
      environment
      description
      task
    }
  }
}";

pub const CREATE_DEPLOYMENT_STATUS: &str = r"
mutation CreateDeploymentStatus($input: CreateDeploymentStatusInput!) {
  createDeploymentStatus(input: $input) {
    deploymentStatus {
      id
      state
    }
  }
}";
