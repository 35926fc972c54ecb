//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::{AppError, Result};

/// Append path segments to an API base URL.
///
/// Segments are percent-encoded, and a path prefix on the base
/// (e.g. `https://ghe.example.com/api/v3`) is kept.
pub fn api_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|_| AppError::config(format!("Not a base URL: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
