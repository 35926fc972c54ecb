//! Repository records as returned by the list endpoint.

use serde::{Deserialize, Serialize};

/// A repository object from `GET /users/{user}/repos`.
///
/// Only the fields consumed by rendering are kept; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawRepoRecord {
    /// Repository name, unique within one account
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Primary language label
    #[serde(default)]
    pub language: Option<String>,

    /// Canonical web link
    pub html_url: String,
}
