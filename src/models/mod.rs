// src/models/mod.rs

//! Domain models for the portfolio harvester.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod project;
mod rate_limit;
mod repo;

// Re-export all public types
pub use config::{
    Config, DEFAULT_CONFIG_PATH, GithubConfig, HarvestConfig, LoggingConfig, ProjectsConfig,
    RetryConfig,
};
pub use project::ProjectRecord;
pub(crate) use rate_limit::RateLimitResponse;
pub use rate_limit::RateLimitStatus;
pub use repo::RawRepoRecord;
