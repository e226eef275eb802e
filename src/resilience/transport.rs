// ABOUTME: HTTP pipeline for GitHub GraphQL calls: fixed headers, logging, retries.
// ABOUTME: Stages run in a fixed order around reqwest; retry decisions come from RetryPolicy.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use snafu::{ResultExt, Snafu};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::policy::{AttemptOutcome, RetryAfter, RetryPolicy};

/// All calls target this single endpoint.
pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// Deployments are still behind the flash preview schema.
/// https://docs.github.com/en/graphql/overview/schema-previews#deployments-preview
const ACCEPT_PREVIEW: &str = "application/vnd.github.flash-preview+json";

/// GitHub rejects requests without a User-Agent.
const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors surfaced once retries are exhausted or were never applicable.
#[derive(Debug, Snafu)]
pub enum TransportError {
    #[snafu(display("request failed after {attempts} attempt(s): {source}"))]
    Send {
        attempts: u32,
        source: reqwest::Error,
    },

    #[snafu(display("server responded {status} after {attempts} attempt(s)"))]
    Status { status: StatusCode, attempts: u32 },

    #[snafu(display("response body could not be read: {source}"))]
    Body { source: reqwest::Error },

    #[snafu(display("operation cancelled"))]
    Cancelled,
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Network failure, timeout, or server error; the retry budget ran out.
    Transient,
    /// Rate limited past the Retry-After budget.
    RateLimited,
    /// A response the policy never retries, e.g. 401 or 404.
    Permanent,
    /// The invocation's cancellation token fired.
    Cancelled,
}

impl TransportError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportError::Send { .. } | TransportError::Body { .. } => {
                TransportErrorKind::Transient
            }
            TransportError::Status { status, .. } => {
                if *status == StatusCode::TOO_MANY_REQUESTS {
                    TransportErrorKind::RateLimited
                } else if status.is_server_error() || *status == StatusCode::REQUEST_TIMEOUT {
                    TransportErrorKind::Transient
                } else {
                    TransportErrorKind::Permanent
                }
            }
            TransportError::Cancelled => TransportErrorKind::Cancelled,
        }
    }
}

/// Outbound request pipeline shared by every API call of one invocation.
///
/// Each call runs the same ordered stages: force the preview accept header,
/// attach the bearer token, log the bodies, then send with retries decided
/// by a fresh [`RetryPolicy`]. The underlying connection pool is shared
/// process-wide via the reqwest client.
pub struct ResilientTransport {
    http: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
}

impl ResilientTransport {
    pub fn new(token: &str) -> crate::error::Result<Self> {
        Self::with_endpoint(token, GITHUB_GRAPHQL_ENDPOINT)
    }

    pub fn with_endpoint(token: &str, endpoint: impl Into<String>) -> crate::error::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()?;

        let mut headers = HeaderMap::new();
        force_accept_header(&mut headers);
        attach_bearer_token(&mut headers, token)?;
        headers.insert(USER_AGENT, HeaderValue::from_static(APP_USER_AGENT));

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            headers,
        })
    }

    /// POST one GraphQL request body and return the raw response body.
    ///
    /// Retries per policy; the delay and the in-flight request both race
    /// against `cancel`. A 2xx response is returned as-is for GraphQL-level
    /// interpretation by the caller.
    pub async fn execute(
        &self,
        body: &serde_json::Value,
        cancel: &CancellationToken,
    ) -> Result<String, TransportError> {
        let mut policy = RetryPolicy::new();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            debug!(attempts, request = %body, "sending GraphQL request");

            let result = tokio::select! {
                _ = cancel.cancelled() => return CancelledSnafu.fail(),
                result = self
                    .http
                    .post(&self.endpoint)
                    .headers(self.headers.clone())
                    .json(body)
                    .send() => result,
            };

            let outcome = classify(&result);
            let decision = policy.evaluate(&outcome);
            if decision.should_retry {
                debug!(
                    attempts,
                    delay_ms = decision.delay.as_millis() as u64,
                    "retrying after backoff"
                );
                tokio::select! {
                    _ = cancel.cancelled() => return CancelledSnafu.fail(),
                    _ = tokio::time::sleep(decision.delay) => {}
                }
                continue;
            }

            return match result {
                Ok(response) if response.status().is_success() => {
                    let text = response.text().await.context(BodySnafu)?;
                    debug!(response = %text, "received GraphQL response");
                    Ok(text)
                }
                Ok(response) => StatusSnafu {
                    status: response.status(),
                    attempts,
                }
                .fail(),
                Err(source) => Err(source).context(SendSnafu { attempts }),
            };
        }
    }
}

/// Stage: the preview accept header replaces whatever was set before.
fn force_accept_header(headers: &mut HeaderMap) {
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_PREVIEW));
}

/// Stage: bearer authorization from the active verb's token.
fn attach_bearer_token(headers: &mut HeaderMap, token: &str) -> crate::error::Result<()> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| crate::error::Error::InvalidToken)?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);
    Ok(())
}

/// Reduce a send result to the outcome the retry policy evaluates.
fn classify(result: &Result<reqwest::Response, reqwest::Error>) -> AttemptOutcome {
    match result {
        Ok(response) => AttemptOutcome::Response {
            status: response.status(),
            retry_after: parse_retry_after(response.headers()),
        },
        Err(_) => AttemptOutcome::TransportFailure,
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<RetryAfter> {
    let value = headers.get(RETRY_AFTER)?;
    let seconds = value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok());
    Some(match seconds {
        Some(seconds) => RetryAfter::Seconds(Duration::from_secs(seconds)),
        None => RetryAfter::Unusable,
    })
}
