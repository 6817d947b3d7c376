//! In-memory tables: a fixed column list plus rows of scalar cells.
//!
//! Every row is aligned with the column list, so a table with zero rows
//! still describes its full schema.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ═══════════════════════════════════════════════════════════
// Values
// ═══════════════════════════════════════════════════════════

/// A single cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }
}

/// Canonical text rendering, shared by equality filters, distributions
/// and export. Null renders as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
        }
    }
}

/// Dates and times serialize through `Display`, so JSON rows and exports
/// carry the same text.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Date(_) | Self::Time(_) => serializer.collect_str(self),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ═══════════════════════════════════════════════════════════
// Columns
// ═══════════════════════════════════════════════════════════

/// Semantic type of a column. Cells are coerced to it at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Int,
    Float,
    Text,
    Bool,
    Date,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, ColumnKind::Int)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::new(name, ColumnKind::Float)
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, ColumnKind::Text)
    }

    pub const fn bool(name: &'static str) -> Self {
        Self::new(name, ColumnKind::Bool)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::new(name, ColumnKind::Date)
    }

    pub const fn time(name: &'static str) -> Self {
        Self::new(name, ColumnKind::Time)
    }
}

// ═══════════════════════════════════════════════════════════
// Table
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [Column],
    cells: &'a [Value],
}

impl<'a> RowRef<'a> {
    /// Cell for `name`, `None` when the table has no such column.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .map(|i| &self.cells[i])
    }

    pub fn cells(&self) -> &'a [Value] {
        self.cells
    }
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from pre-aligned rows. Short rows are padded with
    /// nulls and long rows truncated so every row matches the schema.
    pub fn with_rows(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |cells| RowRef {
            columns: &self.columns,
            cells,
        })
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|cells| RowRef {
            columns: &self.columns,
            cells,
        })
    }

    /// Cells of one column in row order, `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        self.column_index(name)
            .map(move |i| self.rows.iter().map(move |row| &row[i]))
    }

    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub(crate) fn set(&mut self, row: usize, column: usize, value: Value) {
        self.rows[row][column] = value;
    }

    /// New table holding clones of the rows for which `keep` returns true.
    /// The source table is left untouched.
    pub fn select<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(RowRef<'_>) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|cells| {
                keep(RowRef {
                    columns: &self.columns,
                    cells,
                })
            })
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Restrict to the named columns, in the given order. Names the table
    /// does not carry are skipped.
    pub fn project(&self, names: &[&str]) -> Table {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        let columns = indices.iter().map(|&i| self.columns[i]).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Self { columns, rows }
    }

    /// Row mappings for the presentation layer, keys in column order.
    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| {
                        let json = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
                        (column.name.to_string(), json)
                    })
                    .collect()
            })
            .collect()
    }
}
