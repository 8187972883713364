//! Append-only CSV output.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Description recorded when generation fails.
pub const SENTINEL: &str = "error";

pub const HEADER: [&str; 2] = ["Name", "Description"];

#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("failed to open output {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("output I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub name: String,
    pub description: String,
}

impl OutputRow {
    /// Row for a successful generation; line breaks collapse to single spaces.
    #[must_use]
    pub fn generated(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            description: single_line(text),
        }
    }

    #[must_use]
    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: SENTINEL.to_owned(),
        }
    }
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// CSV sink that writes the header once when created and flushes every row.
///
/// Nothing is deduplicated: appending to an existing file adds another header.
#[derive(Debug)]
pub struct DescriptionWriter<W: Write = File> {
    inner: csv::Writer<W>,
}

impl DescriptionWriter<File> {
    /// Open `path` in append mode, creating it if needed, and write the header.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError`] if the file cannot be opened or the header cannot be written.
    pub fn append(path: &Path) -> Result<Self, WriterError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| WriterError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "output opened for append");
        Self::from_writer(file)
    }
}

impl<W: Write> DescriptionWriter<W> {
    /// # Errors
    ///
    /// Returns [`WriterError`] if the header cannot be written.
    pub fn from_writer(writer: W) -> Result<Self, WriterError> {
        let mut inner = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        inner.write_record(HEADER)?;
        inner.flush()?;
        Ok(Self { inner })
    }

    /// # Errors
    ///
    /// Returns [`WriterError`] if the row cannot be written or flushed.
    pub fn write_row(&mut self, row: &OutputRow) -> Result<(), WriterError> {
        self.inner
            .write_record([row.name.as_str(), row.description.as_str()])?;
        self.inner.flush()?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`WriterError::Io`] if buffered data cannot be flushed.
    pub fn into_inner(self) -> Result<W, WriterError> {
        self.inner
            .into_inner()
            .map_err(|e| WriterError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(rows: &[OutputRow]) -> String {
        let mut writer = DescriptionWriter::from_writer(Vec::new()).unwrap();
        for row in rows {
            writer.write_row(row).unwrap();
        }
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn header_is_written_on_open() {
        assert_eq!(written(&[]), "Name,Description\r\n");
    }

    #[test]
    fn generated_row_collapses_newlines() {
        let row = OutputRow::generated("Acme", "line one\nline two\r\nline three");
        assert_eq!(row.description, "line one line two line three");
    }

    #[test]
    fn each_newline_becomes_one_space() {
        let row = OutputRow::generated("Acme", "a\n\nb");
        assert_eq!(row.description, "a  b");
    }

    #[test]
    fn failed_row_uses_sentinel() {
        let row = OutputRow::failed("Acme");
        assert_eq!(row.description, "error");
    }

    #[test]
    fn rows_follow_header_in_order() {
        let out = written(&[
            OutputRow::generated("Acme Corp", "Acme Corp is a cloud security company..."),
            OutputRow::failed("Beta"),
        ]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "Name,Description",
                "Acme Corp,Acme Corp is a cloud security company...",
                "Beta,error",
            ]
        );
    }

    #[test]
    fn fields_with_commas_and_quotes_are_quoted() {
        let out = written(&[OutputRow::generated("Acme, Inc.", "They say \"hi\"")]);
        assert!(out.ends_with("\"Acme, Inc.\",\"They say \"\"hi\"\"\"\r\n"));
    }

    #[test]
    fn append_twice_duplicates_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        for _ in 0..2 {
            let mut writer = DescriptionWriter::append(&path).unwrap();
            writer.write_row(&OutputRow::failed("Acme")).unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            ["Name,Description", "Acme,error", "Name,Description", "Acme,error"]
        );
    }

    #[test]
    fn append_to_missing_directory_errors() {
        let err = DescriptionWriter::append(Path::new("/nonexistent/dir/out.csv")).unwrap_err();
        assert!(matches!(err, WriterError::Open { .. }));
    }
}
