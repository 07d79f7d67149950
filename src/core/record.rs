//! Schemaless records and the `key=value` field mappings used to query and mutate them.

use serde_json::{Map, Value};

use crate::{SearchError, SearchResult};

/// One JSON object from the input array.
///
/// Keys keep their insertion order (serde_json is built with `preserve_order`),
/// which is what the CSV header and the JSON export rely on.
pub type Record = Map<String, Value>;

/// Ordered `key -> value` mapping built from command-line tokens.
///
/// Assigning a key twice keeps the first position and the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    pub fn new() -> Self {
        Fields::default()
    }

    /// Set `key` to `value`, replacing any earlier assignment in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a record holding exactly these fields as JSON strings.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        for (key, value) in self.iter() {
            record.insert(key.to_string(), Value::String(value.to_string()));
        }
        record
    }

    /// True when every field is present in `record` with an equal string value.
    ///
    /// A record holding `30` (a number) does not match the field `age=30`.
    pub fn matches(&self, record: &Record) -> bool {
        self.iter().all(|(key, value)| match record.get(key) {
            Some(Value::String(s)) => s == value,
            _ => false,
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.set(k, v);
        }
        fields
    }
}

/// Split a `key=value` token on its first `=`.
pub fn parse_token(token: &str) -> SearchResult<(String, String)> {
    let (key, value) = token.split_once('=').ok_or_else(|| {
        SearchError::MalformedInput(format!("expected key=value, got '{token}'"))
    })?;
    if key.is_empty() {
        return Err(SearchError::MalformedInput(format!(
            "empty field name in '{token}'"
        )));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse a list of `key=value` tokens into an ordered field mapping.
pub fn parse_fields<S: AsRef<str>>(tokens: &[S]) -> SearchResult<Fields> {
    let mut fields = Fields::new();
    for token in tokens {
        let (key, value) = parse_token(token.as_ref())?;
        fields.set(key, value);
    }
    Ok(fields)
}

/// Render a JSON value as a single CSV cell.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Nested values are flattened to compact JSON
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
