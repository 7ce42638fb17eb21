//! Unified error types for serptrack.
//!
//! The acquisition boundary exposes exactly one error kind
//! (`AcquisitionFailed`) for internal pipeline failures; the remaining
//! variants are the underlying causes it carries for diagnostics, plus the
//! caller-programming errors (`InvalidInput`, `InvalidKey`).

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for serptrack.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty markup or target URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Empty cache key.
    #[error("INVALID_KEY: cache key cannot be empty")]
    InvalidKey,

    /// Any failure during fetch, extraction, matching, persistence, or
    /// cache-producer execution. The display message is stable; the cause
    /// is retained as `source()`.
    #[error("ACQUISITION_FAILED: there was a problem fetching the search results, please try again later")]
    AcquisitionFailed(#[source] Box<Error>),

    /// Network-level failure while fetching the results page.
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// Results-page fetch timed out.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Results-page body exceeded the configured size cap.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Non-success HTTP status from the search endpoint.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// History database operation failed.
    #[error("HISTORY_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("HISTORY_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// Normalize a pipeline failure to `AcquisitionFailed` without double
    /// wrapping an already-normalized error.
    pub fn acquisition(cause: Error) -> Self {
        match cause {
            wrapped @ Error::AcquisitionFailed(_) => wrapped,
            other => Error::AcquisitionFailed(Box::new(other)),
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::AcquisitionFailed(_) => (-32000, err.to_string()),
            Error::InvalidKey => (-32001, err.to_string()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::FetchFailed(msg) => (-32003, msg.clone()),
            Error::FetchTimeout(msg) => (-32004, msg.clone()),
            Error::FetchTooLarge(msg) => (-32005, msg.clone()),
            Error::HttpError(msg) => (-32006, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
