//! Patient demographics tab.

use chrono::NaiveDate;
use serde::Serialize;

use super::Record;
use crate::db::DataSource;
use crate::models::{Entity, Table};
use crate::pipeline::aggregate::{value_counts, Distribution};
use crate::pipeline::loader;

const TABLE_COLUMNS: &[&str] = &[
    "patient_id",
    "name",
    "gender",
    "age",
    "city",
    "payment_type",
    "insurance_provider",
];
const TOP_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientStats {
    pub total_patients: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientCharts {
    pub gender_dist: Distribution,
    pub payment_dist: Distribution,
    pub insurance_dist: Distribution,
    pub city_dist: Distribution,
    pub age_group_count: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientTab {
    pub stats: PatientStats,
    pub charts: PatientCharts,
    pub table: Vec<Record>,
    pub table_count: usize,
}

pub fn build(source: &dyn DataSource, today: NaiveDate) -> PatientTab {
    let loaded = loader::load(source, Entity::Patient, today);
    summarize(&loaded.table)
}

pub fn summarize(patients: &Table) -> PatientTab {
    let table = patients.project(TABLE_COLUMNS).to_records();
    PatientTab {
        stats: PatientStats {
            total_patients: patients.len(),
        },
        charts: PatientCharts {
            gender_dist: value_counts(patients, "gender"),
            payment_dist: value_counts(patients, "payment_type"),
            insurance_dist: value_counts(patients, "insurance_provider").top(TOP_K),
            city_dist: value_counts(patients, "city").top(TOP_K),
            age_group_count: value_counts(patients, "age_group"),
        },
        table_count: table.len(),
        table,
    }
}
