//! Search result persistence operations.
//!
//! Rows encode `positions` as a comma-joined string; history queries return
//! the newest lookup first.

use super::connection::HistoryDb;
use crate::Error;
use crate::model::SearchResult;
use chrono::{DateTime, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Encode a position list for storage.
fn encode_positions(positions: &[u32]) -> String {
    positions.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
}

/// Decode a stored position list.
fn decode_positions(encoded: &str) -> Result<Vec<u32>, std::num::ParseIntError> {
    encoded
        .split(',')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

fn row_to_result(row: &rusqlite::Row<'_>) -> Result<SearchResult, rusqlite::Error> {
    let positions: String = row.get(2)?;
    let searched_at: String = row.get(3)?;

    let positions = decode_positions(&positions)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e)))?;
    let searched_at = DateTime::parse_from_rfc3339(&searched_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(SearchResult { keyword: row.get(0)?, target_url: row.get(1)?, positions, searched_at })
}

impl HistoryDb {
    /// Persist one completed lookup and return it.
    ///
    /// A failure here fails the whole acquisition that triggered it.
    pub async fn add(&self, result: &SearchResult) -> Result<SearchResult, Error> {
        let stored = result.clone();
        let keyword = result.keyword.clone();
        let target_url = result.target_url.clone();
        let positions = encode_positions(&result.positions);
        let searched_at = result.searched_at.to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO search_results (keyword, target_url, positions, searched_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![keyword, target_url, positions, searched_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(stored)
    }

    /// Past lookups for the exact (keyword, URL) pair, newest first.
    ///
    /// Rows sharing a timestamp order by insertion, newest first.
    pub async fn query_history(&self, keyword: &str, target_url: &str) -> Result<Vec<SearchResult>, Error> {
        let keyword = keyword.to_string();
        let target_url = target_url.to_string();

        self.conn
            .call(move |conn| -> Result<Vec<SearchResult>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT keyword, target_url, positions, searched_at
                     FROM search_results
                     WHERE keyword = ?1 AND target_url = ?2
                     ORDER BY searched_at DESC, id DESC",
                )?;

                let rows = stmt.query_map(params![keyword, target_url], |row| row_to_result(row))?;

                let mut results = Vec::new();
                for row in rows {
                    results.push(row.map_err(Error::from)?);
                }
                Ok(results)
            })
            .await
            .map_err(Error::from)
    }
}
