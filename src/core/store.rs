//! In-memory record store.
//!
//! The store owns the collection loaded from the input file for the lifetime of one
//! command and applies at most one search or mutation to it.

use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::core::record::{Fields, Record};
use crate::{SearchError, SearchResult};

/// Ordered collection of records with search and positional mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Create a store over an existing collection.
    pub fn new(records: Vec<Record>) -> Self {
        RecordStore { records }
    }

    /// Load a store from a JSON file containing an array of objects.
    ///
    /// # Errors
    /// Returns `FileNotFound` when `path` does not exist, `Io` when it cannot be read and
    /// `MalformedInput` when the contents are not a JSON array of objects.
    pub fn load(path: &Path) -> SearchResult<Self> {
        info!(path = %path.display(), "loading records");
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SearchError::FileNotFound(path.to_path_buf()),
            _ => SearchError::Io(e),
        })?;
        let store = Self::from_reader(std::io::BufReader::new(file))?;
        info!(count = store.len(), "records loaded");
        Ok(store)
    }

    /// Parse a store from any reader producing a JSON array of objects.
    pub fn from_reader<R: Read>(reader: R) -> SearchResult<Self> {
        let root: Value = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                SearchError::Io(e.into())
            } else {
                SearchError::MalformedInput(format!("invalid JSON: {e}"))
            }
        })?;
        let Value::Array(items) = root else {
            return Err(SearchError::MalformedInput(
                "expected a JSON array of objects at the top level".into(),
            ));
        };

        let mut records = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => records.push(map),
                other => {
                    return Err(SearchError::MalformedInput(format!(
                        "element {i} is not an object: {other}"
                    )));
                }
            }
        }
        Ok(RecordStore { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose values equal every criterion, in collection order.
    ///
    /// Empty criteria select the whole collection.
    pub fn search(&self, criteria: &Fields) -> Vec<Record> {
        let results: Vec<Record> = self
            .records
            .iter()
            .filter(|r| criteria.matches(r))
            .cloned()
            .collect();
        debug!(criteria = criteria.len(), matched = results.len(), "search");
        results
    }

    /// Append a record built from `fields` and return it.
    pub fn insert(&mut self, fields: &Fields) -> &Record {
        self.records.push(fields.to_record());
        debug!(index = self.records.len() - 1, "inserted record");
        &self.records[self.records.len() - 1]
    }

    /// Merge `fields` into the record at `index`.
    ///
    /// Existing keys are overwritten in place, new keys are appended and keys absent
    /// from `fields` are left alone.
    pub fn edit(&mut self, index: i64, fields: &Fields) -> SearchResult<&Record> {
        let pos = self.position(index)?;
        let record = &mut self.records[pos];
        for (key, value) in fields.iter() {
            record.insert(key.to_string(), Value::String(value.to_string()));
        }
        debug!(index = pos, fields = fields.len(), "edited record");
        Ok(&self.records[pos])
    }

    /// Remove and return the record at `index`.
    pub fn delete(&mut self, index: i64) -> SearchResult<Record> {
        let pos = self.position(index)?;
        debug!(index = pos, "deleting record");
        Ok(self.records.remove(pos))
    }

    fn position(&self, index: i64) -> SearchResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.records.len())
            .ok_or(SearchError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
    }
}
