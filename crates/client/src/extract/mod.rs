//! Link extraction and position matching for results-page markup.
//!
//! A two-stage pure pipeline: [`links::extract_links`] scans the raw markup
//! once and numbers every wrapped outbound link in document order, then
//! [`positions::match_positions`] filters that ordered sequence down to the
//! ranks of a target URL. Both stages are deterministic and side-effect
//! free.

pub mod links;
pub mod positions;

pub use links::{Link, extract_links};
pub use positions::match_positions;
