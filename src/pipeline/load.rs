// src/pipeline/load.rs

//! Top-level load routine: inspect quota, harvest, normalize, enrich.

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, ProjectRecord};
use crate::services::{
    PaginationHarvester, RateWindowInspector, ReadmeFetcher, RequestExecutor,
    extract_description,
};
use crate::session::{Action, AppState};

use super::normalize::normalize;

/// Build the canonical project list for the configured account.
pub async fn run_load(config: &Config, executor: &RequestExecutor) -> Result<Vec<ProjectRecord>> {
    let start_time = Utc::now();
    let username = config.github.username.as_str();
    let api_base = config.github.api_url()?;

    log::info!("Loading repositories for {}", username);

    RateWindowInspector::new(executor.clone(), api_base.clone())
        .check_status()
        .await;

    let harvester = PaginationHarvester::new(executor.clone(), api_base.clone(), &config.harvest);
    let repos = harvester.fetch_all(username).await?;

    let mut projects = normalize(&repos, &config.projects.fallback_description);
    log::info!(
        "Harvested {} repositories, {} unique projects",
        repos.len(),
        projects.len()
    );

    if config.projects.readme_descriptions {
        let fetcher = ReadmeFetcher::new(executor.clone(), api_base);
        enrich_descriptions(
            &mut projects,
            &fetcher,
            username,
            config.projects.min_readme_paragraph,
        )
        .await;
    }

    let elapsed = Utc::now() - start_time;
    log::info!(
        "Loaded {} projects in {}ms",
        projects.len(),
        elapsed.num_milliseconds()
    );

    Ok(projects)
}

/// Replace descriptions with the first README paragraph where one exists.
///
/// Best effort: a failed lookup keeps the existing description.
pub async fn enrich_descriptions(
    projects: &mut [ProjectRecord],
    fetcher: &ReadmeFetcher,
    owner: &str,
    min_chars: usize,
) {
    for project in projects.iter_mut() {
        match fetcher.fetch(owner, &project.title).await {
            Ok(Some(readme)) => {
                if let Some(description) = extract_description(&readme, min_chars) {
                    project.description = description;
                }
            }
            Ok(None) => log::debug!("No README for {}", project.title),
            Err(e) => log::warn!("README lookup failed for {}: {}", project.title, e),
        }
    }
}

/// Run a load and fold its outcome into the session state.
pub async fn load_session(
    state: AppState,
    config: &Config,
    executor: &RequestExecutor,
) -> AppState {
    let state = state.apply(Action::LoadStarted);

    match run_load(config, executor).await {
        Ok(projects) => state.apply(Action::LoadSucceeded(projects)),
        Err(e) => {
            log::error!("Failed to load projects: {}", e);
            state.apply(Action::LoadFailed {
                message: e.to_string(),
                fallback_url: config.github.fallback_url(),
            })
        }
    }
}
