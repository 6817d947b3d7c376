//! Doctor schedule tab.

use chrono::NaiveDate;
use serde::Serialize;

use super::{options_with_all, Record};
use crate::db::DataSource;
use crate::models::{DoctorFilter, Entity, Table};
use crate::pipeline::aggregate::{
    distinct_count, group_count, value_counts, CountMatrix, Distribution, GroupCount,
};
use crate::pipeline::loader;

const TABLE_COLUMNS: &[&str] = &[
    "name",
    "specialization",
    "schedule_day",
    "start_time",
    "end_time",
    "room_id",
];
const ROOM_USAGE_TOP: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorStats {
    pub total_doctors: usize,
    pub total_schedules: usize,
    pub total_specializations: usize,
    pub total_doctor_rooms: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorCharts {
    pub spec_count: Distribution,
    pub day_count: Distribution,
    /// Sparse (day, specialization, count) triples.
    pub heatmap: Vec<GroupCount>,
    /// The same counts as a dense day × specialization grid.
    pub heatmap_matrix: CountMatrix,
    pub room_usage: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorOptions {
    pub specializations: Vec<String>,
    pub days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorTab {
    pub stats: DoctorStats,
    pub charts: DoctorCharts,
    pub table: Vec<Record>,
    pub table_count: usize,
    pub options: DoctorOptions,
    pub filters: DoctorFilter,
}

pub fn build(source: &dyn DataSource, filter: &DoctorFilter, today: NaiveDate) -> DoctorTab {
    let loaded = loader::load(source, Entity::DoctorSchedule, today);
    summarize(&loaded.table, filter)
}

/// Bundle for an already loaded schedule table.
pub fn summarize(schedules: &Table, filter: &DoctorFilter) -> DoctorTab {
    let filtered = filter.predicates().apply(schedules);

    let heatmap = group_count(&filtered, "schedule_day", "specialization");
    let table = filtered.project(TABLE_COLUMNS).to_records();

    DoctorTab {
        stats: DoctorStats {
            total_doctors: distinct_count(&filtered, "doctor_id"),
            total_schedules: filtered.len(),
            total_specializations: distinct_count(&filtered, "specialization"),
            total_doctor_rooms: distinct_count(&filtered, "room_id"),
        },
        charts: DoctorCharts {
            spec_count: value_counts(&filtered, "specialization"),
            day_count: value_counts(&filtered, "schedule_day"),
            heatmap_matrix: CountMatrix::dense(&heatmap),
            heatmap,
            room_usage: value_counts(&filtered, "room_id").top(ROOM_USAGE_TOP),
        },
        table_count: table.len(),
        table,
        options: DoctorOptions {
            specializations: options_with_all(schedules, "specialization"),
            days: options_with_all(schedules, "schedule_day"),
        },
        filters: filter.clone(),
    }
}
