// ABOUTME: Uniform success/failure wrapper returned by the list and create workflows.
// ABOUTME: Failed outcomes carry the full error list; payloads are never partial.

use serde::Serialize;
use std::fmt;

use crate::github::ApiError;
use crate::resilience::TransportError;

/// One workflow-level error, tagged by class.
///
/// Domain errors (an id missing from an otherwise successful response) are
/// kept apart from API errors: they indicate a broken assumption, not a
/// remote failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum WorkflowError {
    /// GraphQL-level error returned by the API, verbatim.
    Api(String),
    /// HTTP or transport failure after retries were exhausted.
    Transport(String),
    /// An expected identifier was missing from a successful response.
    Domain(String),
    /// The invocation was cancelled.
    Cancelled,
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Api(message) => write!(f, "api error: {message}"),
            WorkflowError::Transport(message) => write!(f, "transport error: {message}"),
            WorkflowError::Domain(message) => write!(f, "domain error: {message}"),
            WorkflowError::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl WorkflowError {
    /// Fan an API failure out into workflow errors, preserving the order of
    /// GraphQL error lists.
    pub fn from_api(error: ApiError) -> Vec<WorkflowError> {
        match error {
            ApiError::Graph(errors) => errors
                .into_iter()
                .map(|e| WorkflowError::Api(e.message))
                .collect(),
            ApiError::Transport(TransportError::Cancelled) => vec![WorkflowError::Cancelled],
            other => vec![WorkflowError::Transport(other.to_string())],
        }
    }
}

/// Result of one workflow invocation.
///
/// Either `is_success` with an empty error list, or a defaulted payload
/// with at least one error. Owned by the invocation; it does not outlive
/// a single list or create call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowOutcome<T> {
    pub is_success: bool,
    pub payload: T,
    pub errors: Vec<WorkflowError>,
}

impl<T: Default> WorkflowOutcome<T> {
    pub fn success(payload: T) -> Self {
        Self {
            is_success: true,
            payload,
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<WorkflowError>) -> Self {
        debug_assert!(!errors.is_empty(), "failure outcome without errors");
        Self {
            is_success: false,
            payload: T::default(),
            errors,
        }
    }

    pub fn from_api_error(error: ApiError) -> Self {
        Self::failure(WorkflowError::from_api(error))
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::failure(vec![WorkflowError::Domain(message.into())])
    }
}
