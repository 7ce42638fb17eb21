//! Client code for serptrack.
//!
//! This crate provides the results-page fetch pipeline, link extraction and
//! position matching, and the acquisition service that orchestrates them.

pub mod extract;
pub mod fetch;
pub mod service;

pub use extract::{Link, extract_links, match_positions};
pub use fetch::{FetchClient, FetchConfig, SearchPageFetcher};
pub use service::RankService;
