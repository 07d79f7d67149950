//! Core types for json-searcher.
//!
//! This module contains the schemaless `Record` type and the in-memory `RecordStore`
//! that every command operates on.

pub mod record;
pub mod store;

// Re-export key types for convenience
pub use record::{Fields, Record, parse_fields, parse_token};
pub use store::RecordStore;
