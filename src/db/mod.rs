#[cfg(test)]
pub(crate) mod fixtures;
pub mod flat_file;
pub mod source;
pub mod sqlite;

pub use flat_file::*;
pub use source::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table not found: {0}")]
    MissingTable(String),

    #[error("Invalid table identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
}
