// src/error.rs

//! Unified error handling for the portfolio harvester.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or used
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connection, timeout or body read failure
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// Non-success status that is not a rate-limit rejection
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// 403 with an exhausted quota
    #[error("Rate limit exceeded for {url}, window resets in {wait:?}")]
    RateLimited { url: String, wait: Duration },

    /// Every attempt allowed by the retry policy failed
    #[error("Request to {url} failed after {attempts} attempts: {source}")]
    ExhaustedRetries {
        url: String,
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a transport error for the given URL.
    pub fn transport(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an HTTP status error.
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    /// Whether the retry policy may try the request again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::HttpStatus { .. } | Self::RateLimited { .. }
        )
    }
}
