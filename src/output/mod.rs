//! Output module for rendering and exporting probe results
//!
//! This module handles:
//! - The stdout table and per-crawler detail sections
//! - CSV export
//! - JSON export

mod csv;
mod json;
mod table;

pub use csv::{format_csv, write_csv};
pub use json::{format_json, write_json};
pub use table::{format_report, print_report};

use crate::probe::ResultRow;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// The flat view of a result row shared by the CSV and JSON exports
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub crawler: String,
    pub status_chain: String,
    pub final_url: String,
    pub verdict: String,
    pub reason: String,
    pub elapsed_ms: u64,
}

impl ExportRow {
    pub fn from_row(row: &ResultRow) -> Self {
        Self {
            crawler: row.fetch.crawler.name.clone(),
            status_chain: format_status_chain(&row.fetch.status_chain),
            final_url: row.fetch.final_url.clone(),
            verdict: row.verdict.label.to_string(),
            reason: row.verdict.reason.clone(),
            elapsed_ms: row.fetch.elapsed.as_millis() as u64,
        }
    }
}

/// Renders a status chain as arrow-joined hops, or "-" when empty
pub fn format_status_chain(chain: &[u16]) -> String {
    if chain.is_empty() {
        "-".to_string()
    } else {
        chain
            .iter()
            .map(|status| status.to_string())
            .collect::<Vec<_>>()
            .join("->")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status_chain_empty() {
        assert_eq!(format_status_chain(&[]), "-");
    }

    #[test]
    fn test_format_status_chain_single() {
        assert_eq!(format_status_chain(&[200]), "200");
    }

    #[test]
    fn test_format_status_chain_redirects() {
        assert_eq!(format_status_chain(&[301, 302, 200]), "301->302->200");
    }
}
