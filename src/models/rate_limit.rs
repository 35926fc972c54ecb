//! Quota window reported by the status endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Current API quota. Used for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

/// Body of `GET /rate_limit`.
#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitResponse {
    pub rate: RateWindow,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateWindow {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}

impl RateLimitResponse {
    /// Convert into a status, or `None` if the reset timestamp is out of range.
    pub fn into_status(self) -> Option<RateLimitStatus> {
        let reset_at = DateTime::from_timestamp(self.rate.reset, 0)?;
        Some(RateLimitStatus {
            limit: self.rate.limit,
            remaining: self.rate.remaining,
            reset_at,
        })
    }
}
