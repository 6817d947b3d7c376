//! Staff tab.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{options_with_all, Record};
use crate::db::DataSource;
use crate::models::{Entity, StaffFilter, StaffStatus, Table, Value};
use crate::pipeline::aggregate::{count_where, distinct_count, value_counts, Distribution};
use crate::pipeline::loader;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffStats {
    pub total_staff: usize,
    pub active_staff: usize,
    pub inactive_staff: usize,
    pub staff_departments_count: usize,
}

impl StaffStats {
    /// Staff with a null `active` flag count as inactive.
    pub fn of(staff: &Table) -> Self {
        let active_staff = count_active(staff, true);
        Self {
            total_staff: staff.len(),
            active_staff,
            inactive_staff: staff.len() - active_staff,
            staff_departments_count: distinct_count(staff, "department"),
        }
    }
}

pub(crate) fn count_active(staff: &Table, flag: bool) -> usize {
    count_where(staff, |row| {
        row.get("active").and_then(Value::as_bool) == Some(flag)
    })
}

/// Hires per year, oldest year first.
pub fn hire_year_counts(staff: &Table) -> Distribution {
    let Some(dates) = staff.column("hire_date") else {
        return Distribution::default();
    };
    let mut years: BTreeMap<i32, u64> = BTreeMap::new();
    for year in dates.filter_map(Value::as_date).map(|d| d.year()) {
        *years.entry(year).or_insert(0) += 1;
    }
    Distribution::from_entries(years.into_iter().map(|(y, n)| (y.to_string(), n)).collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffCharts {
    pub role_count: Distribution,
    pub dept_count: Distribution,
    pub hire_year_count: Distribution,
    pub active_count: usize,
    pub inactive_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffOptions {
    pub roles: Vec<String>,
    pub departments: Vec<String>,
    pub statuses: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffTab {
    pub stats: StaffStats,
    pub charts: StaffCharts,
    pub table: Vec<Record>,
    pub table_count: usize,
    pub options: StaffOptions,
    pub filters: StaffFilter,
}

pub fn build(source: &dyn DataSource, filter: &StaffFilter, today: NaiveDate) -> StaffTab {
    let loaded = loader::load(source, Entity::Staff, today);
    summarize(&loaded.table, filter)
}

pub fn summarize(staff: &Table, filter: &StaffFilter) -> StaffTab {
    let filtered = filter.predicates().apply(staff);
    let table = filtered.to_records();

    StaffTab {
        stats: StaffStats::of(staff),
        charts: StaffCharts {
            role_count: value_counts(&filtered, "role"),
            dept_count: value_counts(&filtered, "department"),
            hire_year_count: hire_year_counts(&filtered),
            active_count: count_active(&filtered, true),
            inactive_count: count_active(&filtered, false),
        },
        table_count: table.len(),
        table,
        options: StaffOptions {
            roles: options_with_all(staff, "role"),
            departments: options_with_all(staff, "department"),
            statuses: StaffStatus::options(),
        },
        filters: filter.clone(),
    }
}
