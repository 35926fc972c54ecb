//! Pipeline entry points for project retrieval.
//!
//! - `run_load`: Harvest and normalize the canonical project list
//! - `load_session`: Fold a load into the session state
//! - `present`: Filter the canonical list for the presentation layer

pub mod filter;
pub mod load;
pub mod normalize;

pub use filter::{FilterKey, Presenter, present, select};
pub use load::{enrich_descriptions, load_session, run_load};
pub use normalize::{classify, dedup_by_title, normalize, to_project};
