//! The boundary with the persistence layer.
//!
//! A `DataSource` hands back one raw result set per table name. Values
//! come back as the store typed them (or as text for flat files); the
//! loader is responsible for coercing them onto the declared schema.

use crate::models::Value;

use super::SourceError;

/// Raw result set: source column names plus rows in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Anything that can return all rows of a named table.
///
/// Implementations must not hold connections or handles between calls:
/// each fetch acquires what it needs and releases it before returning.
pub trait DataSource: Send + Sync {
    fn fetch(&self, table: &str) -> Result<RawTable, SourceError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Table names are interpolated into SQL and file paths, so only plain
/// identifiers are accepted.
pub fn validate_identifier(name: &str) -> Result<(), SourceError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(SourceError::InvalidIdentifier(name.to_string()))
    }
}
