//! SQLite-backed storage of completed rank lookups.
//!
//! This module provides the durable history store using SQLite with async
//! access via tokio-rusqlite. It supports:
//!
//! - Append-only persistence of search results
//! - Newest-first history queries per (keyword, URL) pair
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod migrations;
pub mod results;

pub use crate::Error;

pub use connection::HistoryDb;
