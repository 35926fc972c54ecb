//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "portfolio.toml";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API endpoint and credential settings
    #[serde(default)]
    pub github: GithubConfig,

    /// Retry and backoff behavior
    #[serde(default)]
    pub retry: RetryConfig,

    /// Pagination settings
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Project normalization settings
    #[serde(default)]
    pub projects: ProjectsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the configuration for a run.
    ///
    /// An explicit path must exist and parse. Without one, the file at
    /// [`DEFAULT_CONFIG_PATH`] is used when present and built-in defaults
    /// otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Path::new(DEFAULT_CONFIG_PATH),
            None => return Ok(Self::default()),
        };

        Self::load(path)
            .map_err(|e| AppError::config(format!("cannot load {}: {}", path.display(), e)))
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.github.username.trim().is_empty() {
            return Err(AppError::validation("github.username is empty"));
        }
        if self.github.user_agent.trim().is_empty() {
            return Err(AppError::validation("github.user_agent is empty"));
        }
        if self.github.timeout_secs == 0 {
            return Err(AppError::validation("github.timeout_secs must be > 0"));
        }
        self.github.api_url()?;
        if self.retry.max_attempts == 0 {
            return Err(AppError::validation("retry.max_attempts must be > 0"));
        }
        if self.harvest.per_page == 0 || self.harvest.per_page > 100 {
            return Err(AppError::validation(
                "harvest.per_page must be between 1 and 100",
            ));
        }
        if self.harvest.max_pages == Some(0) {
            return Err(AppError::validation("harvest.max_pages must be > 0"));
        }
        Ok(())
    }
}

/// API endpoint and credential settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the REST API
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Account whose repositories are harvested
    #[serde(default = "defaults::username")]
    pub username: String,

    /// Static bearer token, empty for anonymous access
    #[serde(default)]
    pub token: Option<String>,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl GithubConfig {
    /// Parse the configured API base URL.
    pub fn api_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_base)?;
        if url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "github.api_base cannot be used as a base URL: {}",
                self.api_base
            )));
        }
        Ok(url)
    }

    /// Token to attach, if one is configured and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Public listing shown when retrieval fails.
    pub fn fallback_url(&self) -> String {
        format!("https://github.com/{}?tab=repositories", self.username)
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            username: defaults::username(),
            token: None,
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Retry and backoff behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total tries per request, including the first
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay after a transport or status failure
    #[serde(default = "defaults::backoff")]
    pub backoff_ms: u64,

    /// Added to the computed rate-limit wait
    #[serde(default = "defaults::rate_limit_margin")]
    pub rate_limit_margin_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            backoff_ms: defaults::backoff(),
            rate_limit_margin_ms: defaults::rate_limit_margin(),
        }
    }
}

/// Pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Records requested per page
    #[serde(default = "defaults::per_page")]
    pub per_page: usize,

    /// Delay between page requests in milliseconds
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,

    /// Sort order passed to the list endpoint
    #[serde(default = "defaults::sort")]
    pub sort: String,

    /// Stop after this many pages even if more exist
    #[serde(default)]
    pub max_pages: Option<u32>,
}

impl HarvestConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            per_page: defaults::per_page(),
            page_delay_ms: defaults::page_delay(),
            sort: defaults::sort(),
            max_pages: None,
        }
    }
}

/// Project normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Placeholder used when a repository has no description
    #[serde(default = "defaults::fallback_description")]
    pub fallback_description: String,

    /// Replace descriptions with the first README paragraph
    #[serde(default)]
    pub readme_descriptions: bool,

    /// Minimum length of a README paragraph to be used as description
    #[serde(default = "defaults::min_readme_paragraph")]
    pub min_readme_paragraph: usize,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            fallback_description: defaults::fallback_description(),
            readme_descriptions: false,
            min_readme_paragraph: defaults::min_readme_paragraph(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // GitHub defaults
    pub fn api_base() -> String {
        "https://api.github.com".into()
    }
    pub fn username() -> String {
        "brodyandre".into()
    }
    pub fn user_agent() -> String {
        concat!("portfolio/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        60
    }

    // Retry defaults
    pub fn max_attempts() -> u32 {
        3
    }
    pub fn backoff() -> u64 {
        1000
    }
    pub fn rate_limit_margin() -> u64 {
        1000
    }

    // Harvest defaults
    pub fn per_page() -> usize {
        100
    }
    pub fn page_delay() -> u64 {
        1000
    }
    pub fn sort() -> String {
        "updated".into()
    }

    // Project defaults
    pub fn fallback_description() -> String {
        "Sem descrição".into()
    }
    pub fn min_readme_paragraph() -> usize {
        20
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_username() {
        let mut config = Config::default();
        config.github.username = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_page() {
        let mut config = Config::default();
        config.harvest.per_page = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_api_base() {
        let mut config = Config::default();
        config.github.api_base = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn credential_ignores_blank_token() {
        let mut github = GithubConfig::default();
        assert_eq!(github.credential(), None);
        github.token = Some("   ".into());
        assert_eq!(github.credential(), None);
        github.token = Some("ghp_abc".into());
        assert_eq!(github.credential(), Some("ghp_abc"));
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[github]\nusername = \"octocat\"\n\n[harvest]\nmax_pages = 2\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.github.username, "octocat");
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.harvest.per_page, 100);
        assert_eq!(config.harvest.max_pages, Some(2));
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn resolve_reports_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[github]\nusername = octocat-no-quotes\n").unwrap();

        let err = Config::resolve(Some(file.path())).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn resolve_reports_missing_explicit_file() {
        let err = Config::resolve(Some(Path::new("/nonexistent/portfolio.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/portfolio.toml"));
    }

    #[test]
    fn resolve_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[github]\nusername = \"octocat\"\n").unwrap();

        let config = Config::resolve(Some(file.path())).unwrap();
        assert_eq!(config.github.username, "octocat");
        assert_eq!(config.harvest.sort, "updated");
    }
}
