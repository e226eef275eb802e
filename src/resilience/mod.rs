// ABOUTME: Retry policies and the HTTP pipeline that applies them.
// ABOUTME: Rate limiting and transient failures carry separate budgets.

mod policy;
mod transport;

pub use policy::{AttemptOutcome, RetryAfter, RetryDecision, RetryPolicy};
pub use transport::{
    GITHUB_GRAPHQL_ENDPOINT, ResilientTransport, TransportError, TransportErrorKind,
};
