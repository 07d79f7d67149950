use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::core::record::{Fields, Record, parse_fields};
use crate::core::store::RecordStore;
use crate::storage::{ExportFormat, Exporter};
use crate::{SearchError, SearchResult};

/// The single operation a command applies to the loaded collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Search(Fields),
    Insert(Fields),
    Edit { index: i64, fields: Fields },
    Delete { index: i64 },
    ListAll,
}

impl Operation {
    /// Pick the operation from the raw command-line values.
    ///
    /// The first one supplied wins, in the order search, insert, edit, delete; with none
    /// of them the command lists the whole collection. Empty `search` or `insert` token
    /// lists do not count as supplied. `edit` holds the index followed by its own
    /// `key=value` tokens.
    pub fn select(
        search: Option<Vec<String>>,
        insert: Option<Vec<String>>,
        edit: Option<Vec<String>>,
        delete: Option<i64>,
    ) -> SearchResult<Self> {
        if let Some(tokens) = search.filter(|t| !t.is_empty()) {
            return Ok(Operation::Search(parse_fields(&tokens)?));
        }
        if let Some(tokens) = insert.filter(|t| !t.is_empty()) {
            return Ok(Operation::Insert(parse_fields(&tokens)?));
        }
        if let Some(tokens) = edit {
            let (index, rest) = tokens.split_first().ok_or_else(|| {
                SearchError::MalformedInput("--edit requires an index".into())
            })?;
            let index = index.parse::<i64>().map_err(|_| {
                SearchError::MalformedInput(format!("edit index must be an integer, got '{index}'"))
            })?;
            return Ok(Operation::Edit { index, fields: parse_fields(rest)? });
        }
        if let Some(index) = delete {
            return Ok(Operation::Delete { index });
        }
        Ok(Operation::ListAll)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Search(_) => "search",
            Operation::Insert(_) => "insert",
            Operation::Edit { .. } => "edit",
            Operation::Delete { .. } => "delete",
            Operation::ListAll => "list",
        }
    }

    /// Apply the operation and return its result set.
    ///
    /// Search yields its matches, insert the new record, edit the merged record, delete
    /// nothing and list-all the whole collection.
    pub fn apply(&self, store: &mut RecordStore) -> SearchResult<Vec<Record>> {
        let results = match self {
            Operation::Search(criteria) => store.search(criteria),
            Operation::Insert(fields) => vec![store.insert(fields).clone()],
            Operation::Edit { index, fields } => vec![store.edit(*index, fields)?.clone()],
            Operation::Delete { index } => {
                store.delete(*index)?;
                Vec::new()
            }
            Operation::ListAll => store.records().to_vec(),
        };
        Ok(results)
    }
}

/// Everything one invocation needs, parsed once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub operation: Operation,
    pub export_format: ExportFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub results: Vec<Record>,
    pub collection_len: usize,
}

/// Run a command, reporting to stdout.
pub fn run(config: QueryConfig) -> SearchResult<QueryOutcome> {
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    run_with_writer(config, handle)
}

/// Run a command, reporting to `out`.
///
/// The whole collection is always exported first. When the result set is non-empty it
/// is printed and then exported again over the same path, so the output file ends up
/// holding just the results.
pub fn run_with_writer<W: Write>(config: QueryConfig, mut out: W) -> SearchResult<QueryOutcome> {
    let QueryConfig { input_file, output_file, operation, export_format } = config;

    let mut store = RecordStore::load(&input_file)?;
    info!(operation = operation.name(), "applying operation");
    let results = operation.apply(&mut store)?;

    let exporter = Exporter::new(export_format);
    exporter.export(&store, &output_file, Some(results.as_slice()), false)?;

    if results.is_empty() {
        writeln!(out, "No results found.")?;
    } else {
        writeln!(out, "{} results found:", results.len())?;
        for record in &results {
            writeln!(out, "{}", serde_json::to_string(record)?)?;
        }
        exporter.export(&store, &output_file, Some(results.as_slice()), true)?;
    }
    out.flush()?;

    Ok(QueryOutcome { results, collection_len: store.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_select_first_match_wins() {
        let op = Operation::select(tokens(&["a=1"]), tokens(&["b=2"]), tokens(&["0"]), Some(1)).unwrap();
        assert_eq!(op.name(), "search");

        let op = Operation::select(None, tokens(&["b=2"]), tokens(&["0"]), Some(1)).unwrap();
        assert_eq!(op, Operation::Insert(parse_fields(&["b=2"]).unwrap()));

        let op = Operation::select(None, None, tokens(&["0"]), Some(1)).unwrap();
        assert_eq!(op.name(), "edit");

        let op = Operation::select(None, None, None, Some(1)).unwrap();
        assert_eq!(op, Operation::Delete { index: 1 });

        let op = Operation::select(None, None, None, None).unwrap();
        assert_eq!(op, Operation::ListAll);
    }

    #[test]
    fn test_select_skips_empty_token_lists() {
        let op = Operation::select(tokens(&[]), tokens(&[]), None, Some(0)).unwrap();
        assert_eq!(op, Operation::Delete { index: 0 });
    }

    #[test]
    fn test_select_edit_reads_its_own_fields() {
        let op = Operation::select(None, None, tokens(&["2", "age=31", "city=Lima"]), None).unwrap();
        assert_eq!(
            op,
            Operation::Edit { index: 2, fields: parse_fields(&["age=31", "city=Lima"]).unwrap() }
        );
    }

    #[test]
    fn test_select_rejects_malformed_tokens() {
        assert!(matches!(
            Operation::select(tokens(&["name"]), None, None, None),
            Err(SearchError::MalformedInput(_))
        ));
        assert!(matches!(
            Operation::select(None, None, tokens(&["first", "a=1"]), None),
            Err(SearchError::MalformedInput(_))
        ));
        assert!(matches!(
            Operation::select(None, None, tokens(&[]), None),
            Err(SearchError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_apply_delete_yields_no_results() {
        let mut store = RecordStore::new(vec![parse_fields(&["a=1"]).unwrap().to_record()]);
        let results = Operation::Delete { index: 0 }.apply(&mut store).unwrap();
        assert!(results.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_apply_list_all_returns_collection() {
        let records = vec![
            parse_fields(&["a=1"]).unwrap().to_record(),
            parse_fields(&["a=2"]).unwrap().to_record(),
        ];
        let mut store = RecordStore::new(records.clone());
        assert_eq!(Operation::ListAll.apply(&mut store).unwrap(), records);
    }
}
