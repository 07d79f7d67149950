pub mod core;
pub mod query_cmd;
pub mod storage;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("index {index} out of range for collection of {len} records")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("cannot export an empty collection as CSV: no header row can be derived")]
    EmptyExport,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type SearchResult<T> = Result<T, SearchError>;

pub use crate::core::{Fields, Record, RecordStore};
pub use crate::query_cmd::{Operation, QueryConfig, QueryOutcome};
pub use crate::storage::{ExportFormat, Exporter};
