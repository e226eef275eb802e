// ABOUTME: Verb-scoped request types resolved from the command line.
// ABOUTME: Exactly one verb is active per invocation; the token accessor reflects that.

/// Criteria for the `list` verb.
///
/// Only the environment is sent to the server as a filter argument; ref,
/// task, and status are matched locally against the returned deployments.
#[derive(Debug, Clone)]
pub struct DeploymentQuery {
    pub owner: String,
    pub repository: String,
    pub token: String,
    pub environment: String,
    pub git_ref: String,
    pub task: String,
}

/// Parameters for the `create` verb.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub owner: String,
    pub repository: String,
    pub token: String,
    pub environment: String,
    pub git_ref: String,
    pub task: String,
    pub payload: String,
    pub description: String,
    pub production_environment: bool,
}

/// The active invocation. One verb, one request, one exit code.
#[derive(Debug, Clone)]
pub enum Request {
    List(DeploymentQuery),
    Create(DeploymentRequest),
}

impl Request {
    /// Token used for the bearer authorization header of every call this
    /// invocation makes.
    pub fn token(&self) -> &str {
        match self {
            Request::List(query) => &query.token,
            Request::Create(request) => &request.token,
        }
    }
}
