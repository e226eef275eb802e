// ABOUTME: Error type for GitHub API operations.
// ABOUTME: Separates transport failures from GraphQL-level error results.

use thiserror::Error;

use super::types::GraphQlError;
use crate::resilience::TransportError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP layer gave up: retries exhausted, non-2xx status, or
    /// cancellation.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A well-formed response carrying GraphQL errors. Never retried; the
    /// caller decides what they mean.
    #[error("GraphQL error: {}", summarize(.0))]
    Graph(Vec<GraphQlError>),

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

fn summarize(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
