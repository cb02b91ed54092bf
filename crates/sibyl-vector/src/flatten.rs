//! JSON corpus parsing and record flattening.
//!
//! A corpus is a JSON array of records; each record is an object whose
//! key order is significant. Flattening renders one record as a single
//! `"key: value | key: value"` line, which is the text the chunker and
//! embedder operate on.

use serde_json::{Map, Value};

use sibyl_core::error::{Result, SibylError};

/// A record's flattened text paired with its position in the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    /// Zero-based position of the record in the source array.
    pub record_index: usize,
    /// The record rendered as `"key: value | key: value"`.
    pub text: String,
}

/// Parse a JSON corpus into a list of records.
///
/// The top-level value must be an array and every element must be an
/// object. Key order within each record is preserved.
pub fn parse_records(content: &str) -> Result<Vec<Map<String, Value>>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|_| SibylError::Validation("Invalid JSON file format.".to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(SibylError::Validation(
                "JSON data must be a list of records.".to_string(),
            ))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(map) => records.push(map),
            _ => {
                return Err(SibylError::Validation(
                    "JSON data must be a list of records.".to_string(),
                ))
            }
        }
    }

    Ok(records)
}

/// Render one record as a single `"key: value | key: value"` line.
///
/// Keys appear in the record's own order. String values render bare;
/// every other value renders as compact JSON.
pub fn flatten_record(record: &Map<String, Value>) -> String {
    record
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{}: {}", key, s),
            other => format!("{}: {}", key, other),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Parse a corpus and flatten every record, keeping source positions.
pub fn flatten_corpus(content: &str) -> Result<Vec<FlatRecord>> {
    let records = parse_records(content)?;
    Ok(records
        .iter()
        .enumerate()
        .map(|(record_index, record)| FlatRecord {
            record_index,
            text: flatten_record(record),
        })
        .collect())
}
