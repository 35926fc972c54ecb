// src/services/inspector.rs

//! Rate window inspector.
//!
//! Reads the current quota from `/rate_limit` for diagnostics. Never fails the
//! caller: any error is logged and swallowed.

use url::Url;

use crate::error::{AppError, Result};
use crate::models::{RateLimitResponse, RateLimitStatus};
use crate::services::RequestExecutor;
use crate::utils::api_url;

pub struct RateWindowInspector {
    executor: RequestExecutor,
    api_base: Url,
}

impl RateWindowInspector {
    pub fn new(executor: RequestExecutor, api_base: Url) -> Self {
        Self { executor, api_base }
    }

    /// Current quota window, or `None` if it could not be read.
    pub async fn check_status(&self) -> Option<RateLimitStatus> {
        match self.fetch_status().await {
            Ok(status) => {
                log::info!(
                    "Rate limit: {}/{} remaining, resets at {}",
                    status.remaining,
                    status.limit,
                    status.reset_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                Some(status)
            }
            Err(e) => {
                log::warn!("Rate limit status unavailable: {}", e);
                None
            }
        }
    }

    async fn fetch_status(&self) -> Result<RateLimitStatus> {
        let url = api_url(&self.api_base, &["rate_limit"])?;
        let body: RateLimitResponse = self.executor.execute_once(url.as_str()).await?.json()?;
        body.into_status()
            .ok_or_else(|| AppError::validation("rate limit reset timestamp out of range"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::header::HeaderMap;

    use super::*;
    use crate::services::RetryPolicy;
    use crate::utils::http::Transport;
    use crate::utils::http::testing::{ScriptedTransport, Step};

    fn inspector(transport: &Arc<ScriptedTransport>) -> RateWindowInspector {
        let transport: Arc<dyn Transport> = transport.clone();
        let executor = RequestExecutor::new(transport, HeaderMap::new(), RetryPolicy::default());
        RateWindowInspector::new(executor, Url::parse("https://api.github.com").unwrap())
    }

    #[tokio::test]
    async fn test_reads_status() {
        let transport = Arc::new(ScriptedTransport::new([Step::json(
            r#"{"rate": {"limit": 5000, "remaining": 4990, "reset": 1700003600}}"#,
        )]));

        let status = inspector(&transport).check_status().await.unwrap();

        assert_eq!(status.limit, 5000);
        assert_eq!(status.remaining, 4990);
        assert_eq!(transport.urls(), vec!["https://api.github.com/rate_limit"]);
    }

    #[tokio::test]
    async fn test_failure_is_swallowed_without_retry() {
        let transport = Arc::new(ScriptedTransport::always(Step::status(500)));

        assert!(inspector(&transport).check_status().await.is_none());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_body_is_swallowed() {
        let transport = Arc::new(ScriptedTransport::new([Step::json("[]")]));
        assert!(inspector(&transport).check_status().await.is_none());
    }
}
