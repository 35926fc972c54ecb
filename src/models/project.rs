//! Canonical project record.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A display-ready project derived from a repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRecord {
    /// Repository name, unique in the canonical list
    pub title: String,

    /// Repository description or the configured placeholder
    pub description: String,

    /// Lowercase classification labels
    pub tags: BTreeSet<String>,

    /// Web link to the repository
    pub link: String,
}

impl ProjectRecord {
    /// Whether the project carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
