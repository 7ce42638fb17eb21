//! Core types and shared functionality for serptrack.
//!
//! This crate provides:
//! - Domain model (search query, search result)
//! - In-memory cache-aside store with time-based expiry
//! - SQLite-backed history storage
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod model;

pub use cache::MemoryCache;
pub use config::AppConfig;
pub use error::Error;
pub use history::HistoryDb;
pub use model::{SearchQuery, SearchResult};
