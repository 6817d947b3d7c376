//! Lab test tab.
//!
//! Headline stats describe the whole workload; charts and the table follow
//! the active filters.

use chrono::NaiveDate;
use serde::Serialize;

use super::{options_with_all, Record};
use crate::db::DataSource;
use crate::models::{Entity, LabTestFilter, Table, Value};
use crate::pipeline::aggregate::{
    count_where, distinct_count, value_counts, value_counts_by_key, Distribution,
};
use crate::pipeline::loader;

pub const PENDING: &str = "Pending";
pub const COMPLETED: &str = "Completed";
const LAB_STAFF_TOP: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabStats {
    pub total_lab_tests: usize,
    pub pending_tests: usize,
    pub completed_tests: usize,
    pub lab_test_types_count: usize,
}

impl LabStats {
    pub fn of(tests: &Table) -> Self {
        Self {
            total_lab_tests: tests.len(),
            pending_tests: count_status(tests, PENDING),
            completed_tests: count_status(tests, COMPLETED),
            lab_test_types_count: distinct_count(tests, "test_type"),
        }
    }
}

pub(crate) fn count_status(tests: &Table, status: &str) -> usize {
    count_where(tests, |row| {
        row.get("result_status").and_then(Value::as_str) == Some(status)
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabCharts {
    pub test_type_count: Distribution,
    pub result_status_count: Distribution,
    /// Tests per scheduled date, oldest first.
    pub daily_tests: Distribution,
    pub lab_staff_count: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabOptions {
    pub test_types: Vec<String>,
    pub result_statuses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabTab {
    pub stats: LabStats,
    pub charts: LabCharts,
    pub table: Vec<Record>,
    pub table_count: usize,
    pub options: LabOptions,
    pub filters: LabTestFilter,
}

pub fn build(source: &dyn DataSource, filter: &LabTestFilter, today: NaiveDate) -> LabTab {
    let loaded = loader::load(source, Entity::LabTest, today);
    summarize(&loaded.table, filter)
}

pub fn summarize(tests: &Table, filter: &LabTestFilter) -> LabTab {
    let filtered = filter.predicates().apply(tests);
    let table = filtered.to_records();

    LabTab {
        stats: LabStats::of(tests),
        charts: LabCharts {
            test_type_count: value_counts(&filtered, "test_type"),
            result_status_count: value_counts(&filtered, "result_status"),
            daily_tests: value_counts_by_key(&filtered, "scheduled_date"),
            lab_staff_count: value_counts(&filtered, "lab_staff_id").top(LAB_STAFF_TOP),
        },
        table_count: table.len(),
        table,
        options: LabOptions {
            test_types: options_with_all(tests, "test_type"),
            result_statuses: options_with_all(tests, "result_status"),
        },
        filters: filter.clone(),
    }
}
