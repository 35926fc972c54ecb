//! Service layer for the portfolio harvester.
//!
//! This module contains the network-facing logic:
//! - Resilient request execution (`RequestExecutor`)
//! - Page-by-page repository listing (`PaginationHarvester`)
//! - Quota diagnostics (`RateWindowInspector`)
//! - README description lookup (`ReadmeFetcher`)

mod executor;
mod harvester;
mod inspector;
mod readme;

pub use executor::{
    RATE_LIMIT_REMAINING, RATE_LIMIT_RESET, RequestExecutor, RetryPolicy, rate_limit_wait,
};
pub use harvester::PaginationHarvester;
pub use inspector::RateWindowInspector;
pub use readme::{ReadmeFetcher, extract_description};
