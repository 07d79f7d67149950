//! Export layer for records.
//!
//! This module serializes a record collection to CSV or JSON and writes it to the output
//! path atomically: the payload goes to a temporary file next to the target, which is
//! then renamed over it.

pub mod csv;
pub mod json;

use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::SearchResult;
use crate::core::record::Record;
use crate::core::store::RecordStore;

// Re-export key types
pub use self::csv::CsvExporter;
pub use self::json::JsonExporter;

/// Output serialization selected with `--export_format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => f.write_str("csv"),
            ExportFormat::Json => f.write_str("json"),
        }
    }
}

/// Writes a store, or a result set drawn from it, to a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter {
    format: ExportFormat,
}

impl Exporter {
    pub fn new(format: ExportFormat) -> Self {
        Exporter { format }
    }

    /// Export to `path`.
    ///
    /// Unless `results_only` is set, the store's whole collection is written and
    /// `results` is ignored. With `results_only`, `results` is written; a missing or
    /// empty result set falls back to the whole collection.
    ///
    /// # Errors
    /// Returns `EmptyExport` when a CSV export has no records, or an I/O or
    /// serialization error. The target is left untouched on failure.
    pub fn export(
        &self,
        store: &RecordStore,
        path: &Path,
        results: Option<&[Record]>,
        results_only: bool,
    ) -> SearchResult<()> {
        let records = match results {
            Some(results) if results_only && !results.is_empty() => results,
            _ => store.records(),
        };
        info!(
            path = %path.display(),
            format = %self.format,
            count = records.len(),
            results_only,
            "exporting records"
        );
        self.write_records(records, path)
    }

    /// Serialize `records` into `path`, replacing it only once the write has succeeded.
    pub fn write_records(&self, records: &[Record], path: &Path) -> SearchResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }

        // New files get 0o666 minus the umask, like a plain create.
        #[cfg_attr(not(unix), allow(unused_mut))]
        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir)?;
        // An existing target keeps its mode across the rename.
        if let Ok(meta) = std::fs::metadata(path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.write_to(records, &mut writer)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Serialize `records` to any writer in this exporter's format.
    pub fn write_to<W: Write>(&self, records: &[Record], writer: W) -> SearchResult<()> {
        match self.format {
            ExportFormat::Csv => CsvExporter::new().export_to_writer(records, writer),
            ExportFormat::Json => JsonExporter::new().export_to_writer(records, writer),
        }
    }
}
