// src/services/executor.rs

//! Resilient request executor.
//!
//! Wraps a single GET with two recovery paths that share one attempt budget:
//! a deferred retry when the API rejects the call because the quota window is
//! exhausted, and a fixed-backoff retry for transport and status failures.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::error::{AppError, Result};
use crate::models::{Config, RetryConfig};
use crate::utils::http::{HttpResponse, ReqwestTransport, Transport, request_headers};

/// Remaining-quota header sent with every API response.
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Epoch second at which the quota window resets.
pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Bounds for the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries, including the first
    pub max_attempts: u32,
    /// Delay after a transport or status failure
    pub backoff: Duration,
    /// Added to the wait computed from the reset header
    pub rate_limit_margin: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: Duration::from_millis(config.backoff_ms),
            rate_limit_margin: Duration::from_millis(config.rate_limit_margin_ms),
        }
    }
}

/// Time to wait until the quota window at `reset_epoch_secs` reopens.
///
/// Never negative: a reset timestamp in the past yields at most the margin,
/// and a far-past one yields zero.
pub fn rate_limit_wait(reset_epoch_secs: i64, now_ms: i64, margin: Duration) -> Duration {
    let margin_ms = i64::try_from(margin.as_millis()).unwrap_or(i64::MAX);
    let wait_ms = reset_epoch_secs
        .saturating_mul(1000)
        .saturating_sub(now_ms)
        .saturating_add(margin_ms);
    Duration::from_millis(wait_ms.max(0) as u64)
}

fn system_now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Executes API requests under a [`RetryPolicy`].
///
/// Only one request is outstanding at a time; every wait suspends the caller.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    headers: HeaderMap,
    policy: RetryPolicy,
    now_ms: fn() -> i64,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, headers: HeaderMap, policy: RetryPolicy) -> Self {
        Self {
            transport,
            headers,
            policy,
            now_ms: system_now_ms,
        }
    }

    /// Build an executor backed by `reqwest` from the application config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config.github)?;
        let headers = request_headers(&config.github)?;
        Ok(Self::new(
            Arc::new(transport),
            headers,
            RetryPolicy::from(&config.retry),
        ))
    }

    /// Replace the wall clock used for rate-limit waits.
    pub fn with_clock(mut self, now_ms: fn() -> i64) -> Self {
        self.now_ms = now_ms;
        self
    }

    /// Fetch `url`, retrying until a 2xx response or the attempt budget runs out.
    pub async fn execute(&self, url: &str) -> Result<HttpResponse> {
        match self.run(url, false).await? {
            Some(response) => Ok(response),
            None => Err(AppError::status(StatusCode::NOT_FOUND.as_u16(), url)),
        }
    }

    /// Like [`execute`](Self::execute), but a 404 is an immediate `None`.
    pub async fn execute_optional(&self, url: &str) -> Result<Option<HttpResponse>> {
        self.run(url, true).await
    }

    /// Single attempt with no retry or wait.
    pub async fn execute_once(&self, url: &str) -> Result<HttpResponse> {
        let response = self.transport.get(url, &self.headers).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(AppError::status(response.status.as_u16(), url))
        }
    }

    async fn run(&self, url: &str, allow_missing: bool) -> Result<Option<HttpResponse>> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let failure = match self.transport.get(url, &self.headers).await {
                Ok(response) if response.is_success() => return Ok(Some(response)),
                Ok(response) if allow_missing && response.status == StatusCode::NOT_FOUND => {
                    return Ok(None);
                }
                Ok(response) => self.classify_failure(url, &response),
                Err(error) => error,
            };

            if !failure.is_retryable() {
                return Err(failure);
            }

            if attempt >= max_attempts {
                log::error!(
                    "Giving up on {} after {} attempts: {}",
                    url,
                    attempt,
                    failure
                );
                return Err(AppError::ExhaustedRetries {
                    url: url.to_string(),
                    attempts: attempt,
                    source: Box::new(failure),
                });
            }

            let delay = match &failure {
                AppError::RateLimited { wait, .. } => *wait,
                _ => self.policy.backoff,
            };

            log::warn!(
                "Attempt {}/{} for {} failed: {}. Retrying in {:?}",
                attempt,
                max_attempts,
                url,
                failure,
                delay
            );

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Map a non-success response to a rate-limit or status error.
    fn classify_failure(&self, url: &str, response: &HttpResponse) -> AppError {
        let quota_exhausted = response.status == StatusCode::FORBIDDEN
            && response.header(RATE_LIMIT_REMAINING) == Some("0");

        if !quota_exhausted {
            return AppError::status(response.status.as_u16(), url);
        }

        // Without a usable reset header fall back to the fixed backoff.
        let wait = response
            .header(RATE_LIMIT_RESET)
            .and_then(|reset| reset.parse::<i64>().ok())
            .map(|reset| rate_limit_wait(reset, (self.now_ms)(), self.policy.rate_limit_margin))
            .unwrap_or(self.policy.backoff);

        AppError::RateLimited {
            url: url.to_string(),
            wait,
        }
    }
}
