// src/services/harvester.rs

//! Pagination harvester.
//!
//! Walks `/users/{user}/repos` page by page until a short page marks the end
//! of the listing. Pages are strictly sequential with a throttle between them.

use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::{HarvestConfig, RawRepoRecord};
use crate::services::RequestExecutor;
use crate::utils::api_url;

/// Service for collecting every repository of an account.
#[derive(Clone)]
pub struct PaginationHarvester {
    executor: RequestExecutor,
    api_base: Url,
    per_page: usize,
    page_delay: Duration,
    sort: String,
    max_pages: Option<u32>,
}

impl PaginationHarvester {
    /// Create a harvester with the given pagination settings.
    pub fn new(executor: RequestExecutor, api_base: Url, config: &HarvestConfig) -> Self {
        Self {
            executor,
            api_base,
            per_page: config.per_page.max(1),
            page_delay: config.page_delay(),
            sort: config.sort.clone(),
            max_pages: config.max_pages,
        }
    }

    /// URL of one page of the listing.
    pub fn page_url(&self, username: &str, page: u32) -> Result<Url> {
        let mut url = api_url(&self.api_base, &["users", username, "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("sort", &self.sort);
        Ok(url)
    }

    /// Fetch all pages for `username`.
    ///
    /// All or nothing: the first page that cannot be fetched or decoded
    /// fails the whole harvest.
    pub async fn fetch_all(&self, username: &str) -> Result<Vec<RawRepoRecord>> {
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let url = self.page_url(username, page)?;
            log::debug!("Fetching page {}: {}", page, url);

            let response = self.executor.execute(url.as_str()).await?;
            let batch: Vec<RawRepoRecord> = response.json()?;
            let count = batch.len();
            repos.extend(batch);

            log::info!(
                "Page {}: {} repositories ({} so far)",
                page,
                count,
                repos.len()
            );

            if count < self.per_page {
                break;
            }

            if self.max_pages.is_some_and(|max| page >= max) {
                log::info!("Reached page cap of {}, stopping harvest", page);
                break;
            }

            page += 1;
            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        Ok(repos)
    }
}
