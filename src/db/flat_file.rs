//! Flat-file data source: one delimited file per table in a directory.

use std::io::Read;
use std::path::PathBuf;

use super::source::{validate_identifier, DataSource, RawTable};
use super::SourceError;
use crate::models::Value;

/// Parse a delimited stream with a header row. Empty fields become null,
/// everything else is kept as text for the loader to coerce. Bytes that are
/// not valid UTF-8 are decoded lossily so one bad cell never drops the file.
pub fn parse_delimited<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let columns = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Value::Null
                } else {
                    Value::Text(String::from_utf8_lossy(field).into_owned())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

/// Reads `<dir>/<table>.csv` on every fetch.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }
}

impl DataSource for CsvDirSource {
    fn fetch(&self, table: &str) -> Result<RawTable, SourceError> {
        validate_identifier(table)?;
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(SourceError::MissingTable(path.display().to_string()));
        }
        let file = std::fs::File::open(&path)?;
        let raw = parse_delimited(std::io::BufReader::new(file), b',')?;
        tracing::debug!(table, rows = raw.len(), "Read rows from flat file");
        Ok(raw)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.dir.display())
    }
}
