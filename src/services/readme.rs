// src/services/readme.rs

//! README-derived project descriptions.
//!
//! Fetches a repository README through the contents API and extracts the
//! first paragraph that reads like prose.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::services::RequestExecutor;
use crate::utils::api_url;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\r?\n").expect("valid regex"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").expect("valid regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));
static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[>#*_`~\-]+").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Body of `GET /repos/{owner}/{repo}/readme`.
#[derive(Debug, Deserialize)]
struct ReadmeContent {
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Service for fetching README text.
pub struct ReadmeFetcher {
    executor: RequestExecutor,
    api_base: Url,
}

impl ReadmeFetcher {
    pub fn new(executor: RequestExecutor, api_base: Url) -> Self {
        Self { executor, api_base }
    }

    /// Decoded README of `owner/repo`, or `None` if the repository has none.
    pub async fn fetch(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        let url = api_url(&self.api_base, &["repos", owner, repo, "readme"])?;
        let Some(response) = self.executor.execute_optional(url.as_str()).await? else {
            return Ok(None);
        };

        let readme: ReadmeContent = response.json()?;
        match (readme.encoding.as_deref(), readme.content) {
            (Some("base64"), Some(content)) => decode_base64(&content).map(Some),
            _ => Ok(None),
        }
    }
}

/// Decode the line-wrapped base64 payload of the contents API.
fn decode_base64(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| AppError::validation(format!("README is not valid base64: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// First paragraph longer than `min_chars` characters after markdown cleanup.
pub fn extract_description(readme: &str, min_chars: usize) -> Option<String> {
    PARAGRAPH_BREAK
        .split(readme)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(clean_paragraph)
        .find(|text| text.chars().count() > min_chars)
}

fn clean_paragraph(paragraph: &str) -> String {
    let text = IMAGE.replace_all(paragraph, "");
    let text = LINK.replace_all(&text, "$1");
    let text = MARKUP.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}
