//! Request execution with per-attempt timeout and bounded retries.
//!
//! # Design
//! One explicit loop over attempts `1..=attempts`. Each attempt races the
//! transport against `tokio::time::timeout`; an elapsed timer drops only
//! that attempt's future, never the loop. Responses are classified as:
//!
//! - 2xx with a JSON body: success, returned as-is.
//! - 401: `Authentication`, returned immediately.
//! - 429: backoff and retry; `RateLimit` once attempts are exhausted.
//! - other non-2xx: `Api`, returned immediately.
//!
//! Transport failures, timeouts and 2xx bodies that are not JSON are
//! transient: backoff and retry, then `Network` after the last attempt.
//! `TransportError::InvalidRequest` is the exception: it becomes `Config`
//! at once, since resending the same request cannot succeed.
//! Backoff after attempt `n` is `base_delay * n`.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SdkConfig;
use crate::error::{SwarmError, TransportError, DEFAULT_AUTH_MESSAGE, DEFAULT_RATE_LIMIT_MESSAGE};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Seconds reported for a 429 without a usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 900;

/// Timeout and retry settings for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before the attempt following attempt `attempt` (1-indexed).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl From<&SdkConfig> for RetryPolicy {
    fn from(config: &SdkConfig) -> Self {
        Self {
            timeout: config.timeout,
            attempts: config.retry_attempts,
            base_delay: config.retry_delay,
        }
    }
}

enum Outcome {
    Done(Result<Value, SwarmError>),
    RateLimited { message: String, retry_after: u64 },
    Transient(TransportError),
}

/// Send `request` through `transport` until it succeeds, fails terminally,
/// or runs out of attempts.
pub async fn execute(
    transport: &dyn Transport,
    policy: &RetryPolicy,
    request: &HttpRequest,
) -> Result<Value, SwarmError> {
    let attempts = policy.attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        debug!(attempt, method = %request.method, url = %request.url, "sending request");

        let sent = match tokio::time::timeout(policy.timeout, transport.send(request)).await {
            Ok(sent) => sent,
            Err(_) => Err(TransportError::Timeout(policy.timeout)),
        };

        let outcome = match sent {
            Ok(response) => {
                debug!(attempt, status = response.status, "received response");
                classify(response)
            }
            Err(TransportError::InvalidRequest(message)) => {
                warn!(attempt, error = %message, "request could not be built");
                Outcome::Done(Err(SwarmError::Config(format!("invalid request: {message}"))))
            }
            Err(err) => Outcome::Transient(err),
        };

        match outcome {
            Outcome::Done(result) => return result,
            Outcome::RateLimited {
                message,
                retry_after,
            } => {
                if attempt == attempts {
                    warn!(attempts, retry_after, "rate limited on final attempt");
                    return Err(SwarmError::RateLimit {
                        message,
                        retry_after,
                    });
                }
                debug!(attempt, retry_after, "rate limited");
            }
            Outcome::Transient(err) => {
                debug!(attempt, error = %err, "attempt failed");
                last_error = Some(err);
            }
        }

        if attempt < attempts {
            let delay = policy.backoff(attempt);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "backing off");
            tokio::time::sleep(delay).await;
        }
    }

    warn!(attempts, url = %request.url, "request failed on every attempt");
    Err(SwarmError::Network {
        message: format!("Request failed after {attempts} attempts"),
        source: last_error,
    })
}

fn classify(response: HttpResponse) -> Outcome {
    if response.is_success() {
        return match serde_json::from_str(&response.body) {
            Ok(value) => Outcome::Done(Ok(value)),
            Err(e) => Outcome::Transient(TransportError::InvalidJson(e)),
        };
    }

    let retry_after = retry_after_secs(&response);
    let HttpResponse { status, body, .. } = response;
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::String(body));
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    match status {
        401 => Outcome::Done(Err(SwarmError::Authentication {
            message: message.unwrap_or_else(|| DEFAULT_AUTH_MESSAGE.to_string()),
        })),
        429 => Outcome::RateLimited {
            message: message.unwrap_or_else(|| DEFAULT_RATE_LIMIT_MESSAGE.to_string()),
            retry_after,
        },
        status => Outcome::Done(Err(SwarmError::Api {
            message: message.unwrap_or_else(|| format!("HTTP {status}")),
            status,
            body,
        })),
    }
}

fn retry_after_secs(response: &HttpResponse) -> u64 {
    response
        .header("Retry-After")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
