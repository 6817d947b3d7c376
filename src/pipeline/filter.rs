//! Row filters composed with logical AND.
//!
//! Each predicate narrows by row inclusion only, so predicates commute and
//! applying two filter sets in sequence equals applying their union.

use chrono::NaiveDate;

use crate::models::table::DATE_FORMAT;
use crate::models::{RowRef, Table, Value};

/// Filter value meaning "predicate disabled".
pub const ALL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Rendered cell equals `value` exactly (case-sensitive).
    Equals { column: String, value: String },
    /// Case-insensitive substring match on the rendered cell.
    Contains { column: String, needle: String },
    /// Inclusive date range; either bound may be open.
    Range {
        column: String,
        from: Option<String>,
        to: Option<String>,
    },
    /// Boolean column equals `value`.
    Flag { column: String, value: bool },
}

impl Predicate {
    /// `None` when `value` is the "All" sentinel or empty.
    pub fn equals(column: &str, value: &str) -> Option<Self> {
        if value.is_empty() || value == ALL {
            return None;
        }
        Some(Self::Equals {
            column: column.to_string(),
            value: value.to_string(),
        })
    }

    /// `None` when the search string is empty.
    pub fn contains(column: &str, needle: &str) -> Option<Self> {
        if needle.is_empty() {
            return None;
        }
        Some(Self::Contains {
            column: column.to_string(),
            needle: needle.to_lowercase(),
        })
    }

    /// `None` when both bounds are empty.
    pub fn range(column: &str, from: &str, to: &str) -> Option<Self> {
        let bound = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let (from, to) = (bound(from), bound(to));
        if from.is_none() && to.is_none() {
            return None;
        }
        Some(Self::Range {
            column: column.to_string(),
            from,
            to,
        })
    }

    pub fn flag(column: &str, value: bool) -> Self {
        Self::Flag {
            column: column.to_string(),
            value,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Equals { column, .. }
            | Self::Contains { column, .. }
            | Self::Range { column, .. }
            | Self::Flag { column, .. } => column,
        }
    }

    /// Whether `row` passes. A predicate on a column the table does not
    /// carry passes every row.
    pub fn matches(&self, row: &RowRef<'_>) -> bool {
        let Some(cell) = row.get(self.column()) else {
            return true;
        };
        if cell.is_null() {
            return false;
        }
        match self {
            Self::Equals { value, .. } => cell.to_string() == *value,
            Self::Contains { needle, .. } => cell.to_string().to_lowercase().contains(needle),
            Self::Range { from, to, .. } => {
                from.as_deref().map_or(true, |b| compare_bound(cell, b).is_ge())
                    && to.as_deref().map_or(true, |b| compare_bound(cell, b).is_le())
            }
            Self::Flag { value, .. } => cell.as_bool() == Some(*value),
        }
    }
}

/// Dates compare as dates when the bound parses; anything else falls back
/// to comparing the rendered cell lexically.
fn compare_bound(cell: &Value, bound: &str) -> std::cmp::Ordering {
    match (cell.as_date(), NaiveDate::parse_from_str(bound.trim(), DATE_FORMAT)) {
        (Some(date), Ok(bound)) => date.cmp(&bound),
        _ => cell.to_string().as_str().cmp(bound),
    }
}

/// An AND-composition of predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate; `None` (a disabled filter) is ignored.
    pub fn with(mut self, predicate: impl Into<Option<Predicate>>) -> Self {
        if let Some(p) = predicate.into() {
            self.predicates.push(p);
        }
        self
    }

    /// Union of two sets.
    pub fn and(mut self, other: FilterSet) -> Self {
        self.predicates.extend(other.predicates);
        self
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, row: &RowRef<'_>) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    /// Rows of `table` satisfying every predicate, in source order.
    pub fn apply(&self, table: &Table) -> Table {
        if self.is_empty() {
            return table.clone();
        }
        table.select(|row| self.matches(&row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    fn doctors() -> Table {
        Table::with_rows(
            vec![
                Column::int("doctor_id"),
                Column::text("name"),
                Column::text("specialization"),
                Column::text("schedule_day"),
            ],
            vec![
                vec![1.into(), "Dr. Andi".into(), "Cardiology".into(), "Monday".into()],
                vec![2.into(), "Dr. Budi".into(), "Neurology".into(), "Monday".into()],
                vec![3.into(), "dr. sinta".into(), "Cardiology".into(), "Tuesday".into()],
                vec![4.into(), Value::Null, "Neurology".into(), Value::Null],
            ],
        )
    }

    fn ids(table: &Table) -> Vec<i64> {
        table
            .column("doctor_id")
            .unwrap()
            .filter_map(Value::as_i64)
            .collect()
    }

    #[test]
    fn sentinel_and_empty_disable_equality() {
        assert!(Predicate::equals("specialization", "All").is_none());
        assert!(Predicate::equals("specialization", "").is_none());
        assert!(Predicate::contains("name", "").is_none());
        assert!(Predicate::range("scheduled_date", "", "").is_none());
    }

    #[test]
    fn equality_is_case_sensitive() {
        let set = FilterSet::new().with(Predicate::equals("specialization", "cardiology"));
        assert!(set.apply(&doctors()).is_empty());

        let set = FilterSet::new().with(Predicate::equals("specialization", "Cardiology"));
        assert_eq!(ids(&set.apply(&doctors())), vec![1, 3]);
    }

    #[test]
    fn equality_on_missing_column_is_skipped() {
        let set = FilterSet::new().with(Predicate::equals("department", "ICU"));
        assert_eq!(set.apply(&doctors()).len(), 4);
    }

    #[test]
    fn equality_matches_rendered_numbers() {
        let set = FilterSet::new().with(Predicate::equals("doctor_id", "2"));
        assert_eq!(ids(&set.apply(&doctors())), vec![2]);
    }

    #[test]
    fn contains_ignores_case_and_nulls() {
        let set = FilterSet::new().with(Predicate::contains("name", "DR."));
        assert_eq!(ids(&set.apply(&doctors())), vec![1, 2, 3]);
    }

    #[test]
    fn filters_commute_and_compose() {
        let table = doctors();
        let p1 = FilterSet::new().with(Predicate::equals("schedule_day", "Monday"));
        let p2 = FilterSet::new().with(Predicate::contains("name", "andi"));

        let sequential = p2.apply(&p1.apply(&table));
        let reversed = p1.apply(&p2.apply(&table));
        let union = p1.clone().and(p2.clone()).apply(&table);

        assert_eq!(sequential, union);
        assert_eq!(reversed, union);
        assert_eq!(ids(&union), vec![1]);
    }

    #[test]
    fn filtered_rows_are_a_subset() {
        let table = doctors();
        let set = FilterSet::new().with(Predicate::equals("schedule_day", "Monday"));
        let filtered = set.apply(&table);
        assert!(filtered.len() <= table.len());
        for row in filtered.rows() {
            assert!(table.rows().any(|r| r.cells() == row.cells()));
        }
    }

    #[test]
    fn range_is_inclusive_on_dates() {
        let d = |s: &str| Value::Date(NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap());
        let table = Table::with_rows(
            vec![Column::int("test_id"), Column::date("scheduled_date")],
            vec![
                vec![1.into(), d("2024-01-01")],
                vec![2.into(), d("2024-01-15")],
                vec![3.into(), d("2024-02-01")],
                vec![4.into(), Value::Null],
            ],
        );

        let set = FilterSet::new().with(Predicate::range("scheduled_date", "2024-01-01", "2024-01-15"));
        let kept: Vec<_> = set
            .apply(&table)
            .column("test_id")
            .unwrap()
            .filter_map(Value::as_i64)
            .collect();
        assert_eq!(kept, vec![1, 2]);

        let open_ended = FilterSet::new().with(Predicate::range("scheduled_date", "2024-01-15", ""));
        assert_eq!(open_ended.apply(&table).len(), 2);
    }

    #[test]
    fn flag_matches_booleans_only() {
        let table = Table::with_rows(
            vec![Column::int("staff_id"), Column::bool("active")],
            vec![
                vec![1.into(), true.into()],
                vec![2.into(), false.into()],
                vec![3.into(), Value::Null],
            ],
        );
        let active = FilterSet::new().with(Predicate::flag("active", true));
        let inactive = FilterSet::new().with(Predicate::flag("active", false));
        assert_eq!(active.apply(&table).len(), 1);
        assert_eq!(inactive.apply(&table).len(), 1);
    }
}
