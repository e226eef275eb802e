// ABOUTME: Pure retry decision logic for outbound GitHub calls.
// ABOUTME: A rate-limit policy and a transient-error policy, each with its own budget.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::StatusCode;
use std::time::Duration;

/// Retries honoring a server-provided Retry-After delay.
const MAX_RATE_LIMIT_RETRIES: u32 = 2;

/// Used when the server signals rate limiting without a usable delay.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Retries for transient transport and server errors.
const MAX_TRANSIENT_RETRIES: u32 = 3;

/// Median delay before the first transient retry.
const MEDIAN_FIRST_RETRY_DELAY: Duration = Duration::from_millis(300);

/// Server-signalled wait duration on a 429 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAfter {
    /// Retry-After header carried an integral number of seconds.
    Seconds(Duration),
    /// Retry-After header was present but could not be parsed.
    Unusable,
}

/// Observable result of one request attempt, reduced to what retry
/// decisions need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A response arrived.
    Response {
        status: StatusCode,
        retry_after: Option<RetryAfter>,
    },
    /// The transport failed before a response arrived (connect error,
    /// timeout, broken body).
    TransportFailure,
}

/// Whether to retry the call and how long to wait first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub should_retry: bool,
    pub delay: Duration,
}

impl RetryDecision {
    fn give_up() -> Self {
        Self {
            should_retry: false,
            delay: Duration::ZERO,
        }
    }

    fn after(delay: Duration) -> Self {
        Self {
            should_retry: true,
            delay,
        }
    }
}

/// Retry state for a single call's attempt sequence.
///
/// Construct one per call; the two budgets and the jitter state never
/// outlive it. A 429 with a server delay draws on the rate-limit budget,
/// transient failures draw on the transient budget, and the counters do
/// not interfere with each other. Everything else is never retried here;
/// GraphQL-level errors in a 200 response belong to the caller.
#[derive(Debug)]
pub struct RetryPolicy {
    rate_limit_attempts: u32,
    transient_attempts: u32,
    prev_delay: Duration,
    rng: StdRng,
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::seeded(rand::rng().random())
    }

    /// Deterministic variant for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rate_limit_attempts: 0,
            transient_attempts: 0,
            prev_delay: Duration::ZERO,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Decide whether the attempt that produced `outcome` should be retried.
    pub fn evaluate(&mut self, outcome: &AttemptOutcome) -> RetryDecision {
        match outcome {
            AttemptOutcome::Response {
                status,
                retry_after: Some(retry_after),
            } if *status == StatusCode::TOO_MANY_REQUESTS => self.rate_limited(*retry_after),
            outcome if is_transient(outcome) => self.transient(),
            _ => RetryDecision::give_up(),
        }
    }

    fn rate_limited(&mut self, retry_after: RetryAfter) -> RetryDecision {
        if self.rate_limit_attempts >= MAX_RATE_LIMIT_RETRIES {
            return RetryDecision::give_up();
        }
        self.rate_limit_attempts += 1;
        match retry_after {
            RetryAfter::Seconds(delay) => RetryDecision::after(delay),
            RetryAfter::Unusable => RetryDecision::after(DEFAULT_RETRY_AFTER),
        }
    }

    fn transient(&mut self) -> RetryDecision {
        if self.transient_attempts >= MAX_TRANSIENT_RETRIES {
            return RetryDecision::give_up();
        }
        self.transient_attempts += 1;
        RetryDecision::after(self.next_backoff())
    }

    /// Decorrelated jitter: each delay is drawn between the base delay and
    /// three times the previous one, so concurrent clients spread out
    /// instead of retrying in lockstep.
    fn next_backoff(&mut self) -> Duration {
        let base = MEDIAN_FIRST_RETRY_DELAY / 2;
        let ceiling = (self.prev_delay * 3).max(base * 3);
        let millis = self
            .rng
            .random_range(base.as_millis() as u64..=ceiling.as_millis() as u64);
        let delay = Duration::from_millis(millis);
        self.prev_delay = delay;
        delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard transient set: transport-level failures, server errors,
/// and request timeouts.
fn is_transient(outcome: &AttemptOutcome) -> bool {
    match outcome {
        AttemptOutcome::TransportFailure => true,
        AttemptOutcome::Response { status, .. } => {
            status.is_server_error() || *status == StatusCode::REQUEST_TIMEOUT
        }
    }
}
