//! Summary statistics over a table, filtered or not.
//!
//! Nothing here knows about filtering. A column the table lacks yields an
//! empty distribution or a zero count.

use std::collections::HashMap;
use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::derive::round1;
use crate::models::{RowRef, Table};

/// Distinct value → occurrence count, in a defined order. Serializes as a
/// JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    entries: Vec<(String, u64)>,
}

impl Distribution {
    pub fn from_entries(entries: Vec<(String, u64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Keep the first `k` entries.
    pub fn top(mut self, k: usize) -> Self {
        self.entries.truncate(k);
        self
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Count of non-null distinct values in `column`; 0 if the column is absent.
pub fn distinct_count(table: &Table, column: &str) -> usize {
    let Some(values) = table.column(column) else {
        return 0;
    };
    values
        .filter(|v| !v.is_null())
        .map(ToString::to_string)
        .collect::<HashSet<_>>()
        .len()
}

/// Occurrences per distinct non-null value, highest count first; ties keep
/// the order in which values were first encountered.
pub fn value_counts(table: &Table, column: &str) -> Distribution {
    let mut entries = first_seen_counts(table, column);
    // Stable sort preserves first-encounter order among equal counts.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    Distribution { entries }
}

/// Occurrences per distinct non-null value, ordered by the value itself.
/// Numbers and dates order naturally because the sort uses typed cells.
pub fn value_counts_by_key(table: &Table, column: &str) -> Distribution {
    let Some(values) = table.column(column) else {
        return Distribution::default();
    };
    let mut keyed: Vec<(SortKey, String)> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for value in values.filter(|v| !v.is_null()) {
        let rendered = value.to_string();
        let count = counts.entry(rendered.clone()).or_insert(0);
        if *count == 0 {
            keyed.push((SortKey::of(value), rendered));
        }
        *count += 1;
    }
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let entries = keyed
        .into_iter()
        .map(|(_, key)| {
            let count = counts.get(&key).copied().unwrap_or(0);
            (key, count)
        })
        .collect();
    Distribution { entries }
}

#[derive(Debug, PartialEq, PartialOrd)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(value: &crate::models::Value) -> Self {
        match value.as_f64() {
            Some(n) => Self::Number(n),
            None => Self::Text(value.to_string()),
        }
    }
}

fn first_seen_counts(table: &Table, column: &str) -> Vec<(String, u64)> {
    let Some(values) = table.column(column) else {
        return Vec::new();
    };
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in values.filter(|v| !v.is_null()) {
        let key = value.to_string();
        match index.get(&key) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, 1));
            }
        }
    }
    order
}

/// One cell of a two-column group-by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub first: String,
    pub second: String,
    pub count: u64,
}

/// Rows per distinct (`first`, `second`) pair, in first-encounter order.
/// Rows with a null in either column are not counted.
pub fn group_count(table: &Table, first: &str, second: &str) -> Vec<GroupCount> {
    if !table.has_column(first) || !table.has_column(second) {
        return Vec::new();
    }
    let mut groups: Vec<GroupCount> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    for row in table.rows() {
        let (Some(a), Some(b)) = (row.get(first), row.get(second)) else {
            continue;
        };
        if a.is_null() || b.is_null() {
            continue;
        }
        let key = (a.to_string(), b.to_string());
        match index.get(&key) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(GroupCount {
                    first: key.0,
                    second: key.1,
                    count: 1,
                });
            }
        }
    }
    groups
}

/// Dense count matrix: `counts[r][c]` is the count for
/// (`rows[r]`, `columns[c]`), 0 where the pair never occurs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountMatrix {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl CountMatrix {
    /// Axes are the sorted distinct keys of each dimension.
    pub fn dense(groups: &[GroupCount]) -> Self {
        let mut rows: Vec<String> = groups.iter().map(|g| g.first.clone()).collect();
        let mut columns: Vec<String> = groups.iter().map(|g| g.second.clone()).collect();
        rows.sort();
        rows.dedup();
        columns.sort();
        columns.dedup();
        Self::with_axes(groups, rows, columns)
    }

    /// Matrix over caller-chosen axes; pairs outside the axes are dropped.
    pub fn with_axes(groups: &[GroupCount], rows: Vec<String>, columns: Vec<String>) -> Self {
        let mut counts = vec![vec![0; columns.len()]; rows.len()];
        for group in groups {
            let r = rows.iter().position(|k| *k == group.first);
            let c = columns.iter().position(|k| *k == group.second);
            if let (Some(r), Some(c)) = (r, c) {
                counts[r][c] += group.count;
            }
        }
        Self {
            rows,
            columns,
            counts,
        }
    }

    pub fn get(&self, row: &str, column: &str) -> u64 {
        let r = self.rows.iter().position(|k| k == row);
        let c = self.columns.iter().position(|k| k == column);
        match (r, c) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }
}

/// `numerator / denominator * 100` to one decimal; 0 for a zero denominator.
pub fn rate(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round1(numerator as f64 / denominator as f64 * 100.0)
}

/// Number of rows satisfying `predicate`.
pub fn count_where<F>(table: &Table, mut predicate: F) -> usize
where
    F: FnMut(RowRef<'_>) -> bool,
{
    table.rows().filter(|row| predicate(*row)).count()
}

/// Sorted distinct non-null values, for dropdown options.
pub fn distinct_sorted(table: &Table, column: &str) -> Vec<String> {
    let Some(values) = table.column(column) else {
        return Vec::new();
    };
    let mut keys: Vec<String> = values
        .filter(|v| !v.is_null())
        .map(ToString::to_string)
        .collect();
    keys.sort();
    keys.dedup();
    keys
}
