//! Pretty JSON export for records.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::SearchResult;
use crate::core::record::Record;

const INDENT: &[u8] = b"    ";

/// Writes records as a JSON array indented with four spaces.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        JsonExporter
    }

    pub fn export_to_writer<W: Write>(&self, records: &[Record], mut writer: W) -> SearchResult<()> {
        let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
        records.serialize(&mut ser)?;
        writer.flush()?;
        Ok(())
    }
}
