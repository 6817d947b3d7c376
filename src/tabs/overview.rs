//! Today's overview: one fetch for the landing dashboard.
//!
//! Each entity is loaded once and the figures are computed from those
//! tables, so a source failure only zeroes the figures that depend on it.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::lab::{count_status, PENDING};
use super::pharmacy::stock_status_counts;
use super::room::{stats_by_type, OccupancyStats};
use super::staff::count_active;
use crate::db::DataSource;
use crate::models::{Entity, StockStatus, Table, Value};
use crate::pipeline::aggregate::{count_where, value_counts, Distribution};
use crate::pipeline::filter::{FilterSet, Predicate};
use crate::pipeline::loader;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub today_doctors: usize,
    pub today_patients: usize,
    pub today_tests: usize,
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub available_rooms: usize,
    pub occupancy_rate: f64,
    pub total_medicines: usize,
    pub low_stock_medicines: usize,
    pub out_of_stock_medicines: usize,
    pub active_staff: usize,
    pub pending_tests: usize,
    pub total_patients: usize,
    pub total_lab_tests: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewCharts {
    pub today_doctors_spec: Distribution,
    pub today_tests_status: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub today: NaiveDate,
    pub stats: OverviewStats,
    pub charts: OverviewCharts,
    pub room_stats: BTreeMap<String, OccupancyStats>,
}

/// English weekday name as stored in `schedule_day`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn on_date(table: &Table, column: &str, day: NaiveDate) -> usize {
    count_where(table, |row| row.get(column).and_then(Value::as_date) == Some(day))
}

pub fn build(source: &dyn DataSource, today: NaiveDate) -> Overview {
    let doctors = loader::load(source, Entity::DoctorSchedule, today).table;
    let rooms = loader::load(source, Entity::Room, today).table;
    let patients = loader::load(source, Entity::Patient, today).table;
    let stock = loader::load(source, Entity::PharmacyStock, today).table;
    let tests = loader::load(source, Entity::LabTest, today).table;
    let staff = loader::load(source, Entity::Staff, today).table;

    let today_doctors = FilterSet::new()
        .with(Predicate::equals("schedule_day", weekday_name(today.weekday())))
        .apply(&doctors);
    let today_tests = tests.select(|row| {
        row.get("scheduled_date").and_then(Value::as_date) == Some(today)
    });

    let occupancy = OccupancyStats::of(&rooms);
    let stock_status = stock_status_counts(&stock);
    let stock_count = |status: StockStatus| stock_status.get(status.as_str()).unwrap_or(0) as usize;

    Overview {
        today,
        stats: OverviewStats {
            today_doctors: today_doctors.len(),
            today_patients: on_date(&patients, "registration_date", today),
            today_tests: today_tests.len(),
            total_rooms: occupancy.total,
            occupied_rooms: occupancy.occupied,
            available_rooms: occupancy.available,
            occupancy_rate: occupancy.occupancy_rate,
            total_medicines: stock.len(),
            low_stock_medicines: stock_count(StockStatus::LowStock),
            out_of_stock_medicines: stock_count(StockStatus::OutOfStock),
            active_staff: count_active(&staff, true),
            pending_tests: count_status(&tests, PENDING),
            total_patients: patients.len(),
            total_lab_tests: tests.len(),
        },
        charts: OverviewCharts {
            today_doctors_spec: value_counts(&today_doctors, "specialization"),
            today_tests_status: value_counts(&today_tests, "result_status"),
        },
        room_stats: stats_by_type(&rooms),
    }
}
