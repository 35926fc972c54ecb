// src/pipeline/normalize.rs

//! Normalization and dedup stage.
//!
//! Pure functions: raw repository records in, canonical projects out.

use std::collections::{BTreeSet, HashSet};

use crate::models::{ProjectRecord, RawRepoRecord};

/// Tag added for AWS-related repositories.
pub const AWS_TAG: &str = "aws";

/// Tag added for Spark-related repositories.
pub const SPARK_TAG: &str = "spark";

/// Derive classification tags for one repository.
///
/// Rules fire independently:
/// - the lowercased primary language, if any
/// - `aws` when the name or description mentions "aws"
/// - `spark` when the language is Scala or the name or description mentions "spark"
pub fn classify(repo: &RawRepoRecord) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    let language = repo
        .language
        .as_deref()
        .map(str::trim)
        .filter(|language| !language.is_empty())
        .map(str::to_lowercase);

    let name = repo.name.to_lowercase();
    let description = repo.description.as_deref().unwrap_or("").to_lowercase();
    let mentions = |needle: &str| name.contains(needle) || description.contains(needle);

    if mentions(AWS_TAG) {
        tags.insert(AWS_TAG.to_string());
    }
    if language.as_deref() == Some("scala") || mentions(SPARK_TAG) {
        tags.insert(SPARK_TAG.to_string());
    }
    if let Some(language) = language {
        tags.insert(language);
    }

    tags
}

/// Map one repository to a project.
pub fn to_project(repo: &RawRepoRecord, fallback_description: &str) -> ProjectRecord {
    let description = repo
        .description
        .as_deref()
        .filter(|description| !description.trim().is_empty())
        .unwrap_or(fallback_description)
        .to_string();

    ProjectRecord {
        title: repo.name.clone(),
        description,
        tags: classify(repo),
        link: repo.html_url.clone(),
    }
}

/// Keep the first project per title, in encounter order.
pub fn dedup_by_title(projects: Vec<ProjectRecord>) -> Vec<ProjectRecord> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(projects.len());

    for project in projects {
        if seen.insert(project.title.clone()) {
            deduped.push(project);
        } else {
            log::debug!("Dropping duplicate project '{}'", project.title);
        }
    }
    deduped
}

/// Normalize a full harvest into the canonical list.
pub fn normalize(repos: &[RawRepoRecord], fallback_description: &str) -> Vec<ProjectRecord> {
    let projects = repos
        .iter()
        .map(|repo| to_project(repo, fallback_description))
        .collect();
    dedup_by_title(projects)
}
