// src/utils/http.rs

//! HTTP client utilities.
//!
//! The executor talks to the network through [`Transport`] so that retry and
//! pagination logic can be driven by scripted responses in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::GithubConfig;

/// Media type requested from the REST API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Response with the body already read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Header value as a trimmed string, if present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// A single GET round trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport with a client configured from `config`.
    pub fn from_config(config: &GithubConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .map_err(|e| AppError::transport(url, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::transport(url, e))?;

        Ok(HttpResponse::new(status, headers, body))
    }
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &GithubConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Headers attached to every API request.
pub fn request_headers(config: &GithubConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

    if let Some(token) = config.credential() {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| AppError::config("github.token contains invalid header characters"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport shared by the unit tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use tokio::time::Instant;

    use super::*;

    /// One scripted outcome.
    #[derive(Debug, Clone)]
    pub enum Step {
        Respond(HttpResponse),
        Fail(String),
    }

    impl Step {
        pub fn json(body: impl Into<String>) -> Self {
            Self::Respond(HttpResponse::new(StatusCode::OK, HeaderMap::new(), body))
        }

        pub fn status(code: u16) -> Self {
            let status = StatusCode::from_u16(code).unwrap();
            Self::Respond(HttpResponse::new(status, HeaderMap::new(), "{}"))
        }

        pub fn rate_limited(reset_epoch: i64) -> Self {
            let mut headers = HeaderMap::new();
            headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
            headers.insert(
                "x-ratelimit-reset",
                HeaderValue::from_str(&reset_epoch.to_string()).unwrap(),
            );
            Self::Respond(HttpResponse::new(
                StatusCode::FORBIDDEN,
                headers,
                r#"{"message":"API rate limit exceeded"}"#,
            ))
        }
    }

    /// Replays steps in order, then repeats `fallback` if one is set.
    #[derive(Default)]
    pub struct ScriptedTransport {
        steps: Mutex<VecDeque<Step>>,
        fallback: Option<Step>,
        calls: Mutex<Vec<(String, HeaderMap, Instant)>>,
    }

    impl ScriptedTransport {
        pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into_iter().collect()),
                ..Self::default()
            }
        }

        pub fn always(step: Step) -> Self {
            Self {
                fallback: Some(step),
                ..Self::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn urls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _, _)| url.clone())
                .collect()
        }

        pub fn instants(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(_, _, at)| *at).collect()
        }

        pub fn headers(&self, index: usize) -> HeaderMap {
            self.calls.lock().unwrap()[index].1.clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), headers.clone(), Instant::now()));

            let step = self
                .steps
                .lock()
                .unwrap()
                .pop_front()
                .or_else(|| self.fallback.clone());

            match step {
                Some(Step::Respond(response)) => Ok(response),
                Some(Step::Fail(message)) => Err(AppError::transport(url, message)),
                None => Err(AppError::transport(url, "script exhausted")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_anonymous() {
        let headers = request_headers(&GithubConfig::default()).unwrap();
        assert_eq!(headers.get(ACCEPT).unwrap(), GITHUB_ACCEPT);
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_headers_with_token() {
        let config = GithubConfig {
            token: Some("ghp_secret".into()),
            ..GithubConfig::default()
        };
        let headers = request_headers(&config).unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth, "Bearer ghp_secret");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn test_headers_reject_newline_token() {
        let config = GithubConfig {
            token: Some("abc\ndef".into()),
            ..GithubConfig::default()
        };
        assert!(request_headers(&config).is_err());
    }

    #[test]
    fn test_response_header_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static(" 0 "));
        let response = HttpResponse::new(StatusCode::FORBIDDEN, headers, "");
        assert_eq!(response.header("X-RateLimit-Remaining"), Some("0"));
        assert!(!response.is_success());
    }
}
