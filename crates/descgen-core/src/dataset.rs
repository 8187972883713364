//! Newline-delimited JSON company dataset.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to open dataset {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read dataset line {line}: {source}")]
    Read {
        line: usize,
        source: std::io::Error,
    },

    #[error("invalid record on line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
}

/// One company row. Unknown fields in the source are ignored; the four fields
/// below are required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    #[serde(deserialize_with = "deserialize_code")]
    pub sic: String,
    pub top_5_most_frequent_words: Vec<String>,
    pub cleaned_html: String,
}

/// Industry codes show up as strings, bare numbers, or lists of either.
fn deserialize_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    code_text(&value)
        .ok_or_else(|| serde::de::Error::custom("sic must be a string, number, or list"))
}

fn code_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Array(items) => {
            let parts = items
                .iter()
                .map(|item| code_text(item).map(|s| format!("'{s}'")))
                .collect::<Option<Vec<_>>>()?;
            Some(format!("[{}]", parts.join(", ")))
        }
        _ => None,
    }
}

/// Load every record from an NDJSON file, preserving file order.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be opened or read, or if any
/// non-blank line is not a valid record. No partial result is returned.
pub fn load(path: &Path) -> Result<Vec<CompanyRecord>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse(file)?;
    tracing::info!(path = %path.display(), records = records.len(), "dataset loaded");
    Ok(records)
}

/// Parse NDJSON records from any reader. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`DatasetError::Read`] or [`DatasetError::Parse`] with the 1-based
/// line number of the first offending line.
pub fn parse(reader: impl Read) -> Result<Vec<CompanyRecord>, DatasetError> {
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| DatasetError::Read {
            line: line_no,
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str::<CompanyRecord>(&line).map_err(|source| {
            DatasetError::Parse {
                line: line_no,
                source,
            }
        })?;
        records.push(record);
    }
    Ok(records)
}
