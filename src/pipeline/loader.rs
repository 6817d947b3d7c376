//! Record loader: fetch raw rows for an entity and conform them to its
//! declared schema.
//!
//! Loading never fails. Any source error is logged and replaced by an
//! empty table that still carries every declared column, so downstream
//! stages always see the full schema.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::derive;
use crate::db::{DataSource, RawTable};
use crate::models::table::{DATETIME_FORMAT, DATE_FORMAT, TIME_FORMAT};
use crate::models::{Column, ColumnKind, Entity, LookupJoin, Table, Value};

/// A conformed entity table.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub entity: Entity,
    pub table: Table,
    /// True when the source failed and `table` is the empty fallback.
    pub fallback: bool,
}

impl LoadedTable {
    fn fallback(entity: Entity) -> Self {
        Self {
            entity,
            table: entity.empty_table(),
            fallback: true,
        }
    }
}

/// Load `entity` from `source`, conform it, run load-time joins and fill the
/// derived columns relative to `today`.
pub fn load(source: &dyn DataSource, entity: Entity, today: NaiveDate) -> LoadedTable {
    let raw = match source.fetch(entity.source_table()) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(
                entity = %entity,
                source = %source.describe(),
                error = %e,
                "Source unavailable, using empty table"
            );
            return LoadedTable::fallback(entity);
        }
    };

    let (mut table, missing) = conform(&raw, &entity.columns());

    let join = entity.lookup_join();
    let expected_missing = |name: &str| {
        entity.derived_columns().iter().any(|c| c.name == name)
            || join.is_some_and(|j| j.target == name)
            || entity.synthesized_identity() == Some(name)
    };
    let unexpected: Vec<&str> = missing
        .iter()
        .copied()
        .filter(|n| !expected_missing(n))
        .collect();
    if !unexpected.is_empty() {
        tracing::warn!(entity = %entity, missing = ?unexpected, "Source lacks columns, filled with nulls");
    }

    if let Some(identity) = entity.synthesized_identity() {
        if missing.contains(&identity) {
            synthesize_identity(&mut table, identity);
        }
    }

    if let Some(join) = join {
        apply_join(source, &mut table, join);
    }

    derive::apply(entity, &mut table, today);

    tracing::debug!(entity = %entity, rows = table.len(), "Loaded table");
    LoadedTable {
        entity,
        table,
        fallback: false,
    }
}

/// Align `raw` to `columns`: pick columns by name, coerce every cell to its
/// declared kind and fill absent columns with nulls. Extra source columns
/// are dropped. Returns the table and the names of absent columns.
pub fn conform(raw: &RawTable, columns: &[Column]) -> (Table, Vec<&'static str>) {
    let indices: Vec<Option<usize>> = columns
        .iter()
        .map(|c| raw.column_index(c.name))
        .collect();
    let missing = columns
        .iter()
        .zip(&indices)
        .filter(|(_, i)| i.is_none())
        .map(|(c, _)| c.name)
        .collect();

    let mut table = Table::new(columns.to_vec());
    for raw_row in &raw.rows {
        let row = columns
            .iter()
            .zip(&indices)
            .map(|(column, index)| match index.and_then(|i| raw_row.get(i)) {
                Some(value) => coerce(value, column.kind),
                None => Value::Null,
            })
            .collect();
        table.push_row(row);
    }
    (table, missing)
}

/// Coerce a raw cell to `kind`. Anything that does not parse becomes null.
pub fn coerce(value: &Value, kind: ColumnKind) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    match kind {
        ColumnKind::Text => match value {
            Value::Text(s) if s.trim().is_empty() => Value::Null,
            Value::Text(_) => value.clone(),
            other => Value::Text(other.to_string()),
        },
        ColumnKind::Int => match value {
            Value::Int(_) => value.clone(),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Value::Int(*f as i64),
            Value::Bool(b) => Value::Int(i64::from(*b)),
            Value::Text(s) => parse_int(s.trim()).map_or(Value::Null, Value::Int),
            _ => Value::Null,
        },
        ColumnKind::Float => match value {
            Value::Float(_) => value.clone(),
            Value::Int(i) => Value::Float(*i as f64),
            Value::Text(s) => s.trim().parse::<f64>().map_or(Value::Null, Value::Float),
            _ => Value::Null,
        },
        ColumnKind::Bool => match value {
            Value::Bool(_) => value.clone(),
            Value::Int(i) => Value::Bool(*i != 0),
            Value::Text(s) => parse_bool(s.trim()).map_or(Value::Null, Value::Bool),
            _ => Value::Null,
        },
        ColumnKind::Date => match value {
            Value::Date(_) => value.clone(),
            Value::Text(s) => parse_date(s.trim()).map_or(Value::Null, Value::Date),
            _ => Value::Null,
        },
        ColumnKind::Time => match value {
            Value::Time(_) => value.clone(),
            Value::Text(s) => parse_time(s.trim()).map_or(Value::Null, Value::Time),
            _ => Value::Null,
        },
    }
}

fn parse_int(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().or_else(|| {
        let f = s.parse::<f64>().ok()?;
        (f.fract() == 0.0 && f.is_finite()).then_some(f as i64)
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "t" => Some(true),
        "false" | "0" | "no" | "n" | "f" => Some(false),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date()))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    ["%H:%M:%S%.f", TIME_FORMAT, "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_datetime(s).map(|dt| dt.time()))
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    [DATETIME_FORMAT, "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn synthesize_identity(table: &mut Table, column: &str) {
    let Some(index) = table.column_index(column) else {
        return;
    };
    for row in 0..table.len() {
        table.set(row, index, Value::Int(row as i64 + 1));
    }
}

/// Left join `join.value` from the looked-up entity into `join.target`.
/// A failed lookup leaves the target column null.
fn apply_join(source: &dyn DataSource, table: &mut Table, join: LookupJoin) {
    let lookup = match source.fetch(join.from.source_table()) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(from = %join.from, error = %e, "Lookup join skipped");
            return;
        }
    };
    let (Some(key_idx), Some(value_idx)) = (
        lookup.column_index(join.foreign_key),
        lookup.column_index(join.value),
    ) else {
        tracing::warn!(from = %join.from, "Lookup source lacks join columns");
        return;
    };

    let key_kind = join
        .from
        .column_kind(join.foreign_key)
        .unwrap_or(ColumnKind::Text);
    let value_kind = join.from.column_kind(join.value).unwrap_or(ColumnKind::Text);
    let mut index = std::collections::HashMap::new();
    for row in &lookup.rows {
        let (Some(key), Some(value)) = (row.get(key_idx), row.get(value_idx)) else {
            continue;
        };
        let key = coerce(key, key_kind);
        if key.is_null() {
            continue;
        }
        // First match wins on duplicate keys.
        index
            .entry(key.to_string())
            .or_insert_with(|| coerce(value, value_kind));
    }

    let (Some(local), Some(target)) = (
        table.column_index(join.local_key),
        table.column_index(join.target),
    ) else {
        return;
    };
    for row in 0..table.len() {
        let value = table
            .row(row)
            .map(|r| r.cells()[local].clone())
            .filter(|key| !key.is_null())
            .and_then(|key| index.get(&key.to_string()).cloned());
        if let Some(value) = value {
            table.set(row, target, value);
        }
    }
}
