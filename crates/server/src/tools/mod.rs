//! MCP tool implementations.
//!
//! This module contains all tools exposed by the serptrack server.
#![allow(unused_imports)]

pub mod search_history;
pub mod search_rank;

pub use search_history::{SearchHistoryOutput, SearchHistoryParams};
pub use search_rank::{SearchRankOutput, SearchRankParams};
