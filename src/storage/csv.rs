//! CSV export for records.

use std::io::Write;

use tracing::warn;

use crate::core::record::{Record, cell_text};
use crate::{SearchError, SearchResult};

/// CSV exporter for schemaless records.
///
/// The header row is taken from the first record's keys. Later records are mapped
/// onto that header: missing keys become empty cells and keys outside the header are
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Create a new CsvExporter.
    pub fn new() -> Self {
        CsvExporter
    }

    /// Header row derived from the first record.
    ///
    /// # Errors
    /// Returns `EmptyExport` when there are no records.
    pub fn headers(&self, records: &[Record]) -> SearchResult<Vec<String>> {
        let first = records.first().ok_or(SearchError::EmptyExport)?;
        Ok(first.keys().cloned().collect())
    }

    /// Export records to any writer implementing Write.
    ///
    /// # Errors
    /// Returns `EmptyExport` for an empty slice, or an error if CSV writing fails.
    pub fn export_to_writer<W: Write>(&self, records: &[Record], writer: W) -> SearchResult<()> {
        let headers = self.headers(records)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(&headers)?;

        for (i, record) in records.iter().enumerate() {
            let dropped: Vec<&str> = record
                .keys()
                .filter(|k| !headers.contains(k))
                .map(String::as_str)
                .collect();
            if !dropped.is_empty() {
                warn!(row = i, fields = ?dropped, "fields missing from CSV header were dropped");
            }
            csv_writer.write_record(self.record_to_row(&headers, record))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Convert a record to a row of CSV values in header order.
    fn record_to_row(&self, headers: &[String], record: &Record) -> Vec<String> {
        headers
            .iter()
            .map(|h| record.get(h).map(cell_text).unwrap_or_default())
            .collect()
    }
}
