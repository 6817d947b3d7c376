//! Pharmacy stock tab.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::Record;
use crate::db::DataSource;
use crate::models::{Entity, StockStatus, Table, Value};
use crate::pipeline::aggregate::{distinct_count, value_counts, Distribution};
use crate::pipeline::loader;

const SUPPLIER_TOP: usize = 10;
const EXPIRY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PharmacyStats {
    pub total_medicines: usize,
    pub in_stock_medicines: usize,
    pub low_stock_medicines: usize,
    pub out_of_stock_medicines: usize,
    pub pharmacy_categories: usize,
}

/// A drug expiring within the window (or already expired).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiringDrug {
    pub drug_name: Option<String>,
    pub current_stock: i64,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PharmacyCharts {
    pub category_count: Distribution,
    pub supplier_count: Distribution,
    pub expiry_data: Vec<ExpiringDrug>,
    pub stock_status: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PharmacyTab {
    pub stats: PharmacyStats,
    pub charts: PharmacyCharts,
    pub table: Vec<Record>,
    pub table_count: usize,
}

fn stock_of(row: &crate::models::RowRef<'_>) -> i64 {
    row.get("current_stock").and_then(Value::as_i64).unwrap_or(0)
}

/// Rows per stock status, every status present even when zero. The three
/// counts always sum to the row count.
pub fn stock_status_counts(stock: &Table) -> Distribution {
    let mut counts = [0u64; 3];
    for row in stock.rows() {
        let slot = match StockStatus::classify(stock_of(&row)) {
            StockStatus::InStock => 0,
            StockStatus::LowStock => 1,
            StockStatus::OutOfStock => 2,
        };
        counts[slot] += 1;
    }
    Distribution::from_entries(vec![
        (StockStatus::InStock.to_string(), counts[0]),
        (StockStatus::LowStock.to_string(), counts[1]),
        (StockStatus::OutOfStock.to_string(), counts[2]),
    ])
}

/// Drugs whose expiry date is on or before `today + 30 days`.
pub fn expiring(stock: &Table, today: NaiveDate) -> Vec<ExpiringDrug> {
    let cutoff = today + Duration::days(EXPIRY_WINDOW_DAYS);
    stock
        .rows()
        .filter_map(|row| {
            let expiry_date = row.get("expiry_date").and_then(Value::as_date)?;
            (expiry_date <= cutoff).then(|| ExpiringDrug {
                drug_name: row.get("drug_name").and_then(Value::as_str).map(String::from),
                current_stock: stock_of(&row),
                expiry_date,
            })
        })
        .collect()
}

pub fn build(source: &dyn DataSource, today: NaiveDate) -> PharmacyTab {
    let loaded = loader::load(source, Entity::PharmacyStock, today);
    summarize(&loaded.table, today)
}

pub fn summarize(stock: &Table, today: NaiveDate) -> PharmacyTab {
    let stock_status = stock_status_counts(stock);
    let count = |status: StockStatus| stock_status.get(status.as_str()).unwrap_or(0) as usize;
    let table = stock.to_records();

    PharmacyTab {
        stats: PharmacyStats {
            total_medicines: stock.len(),
            in_stock_medicines: count(StockStatus::InStock),
            low_stock_medicines: count(StockStatus::LowStock),
            out_of_stock_medicines: count(StockStatus::OutOfStock),
            pharmacy_categories: distinct_count(stock, "category"),
        },
        charts: PharmacyCharts {
            category_count: value_counts(stock, "category"),
            supplier_count: value_counts(stock, "supplier").top(SUPPLIER_TOP),
            expiry_data: expiring(stock, today),
            stock_status,
        },
        table_count: table.len(),
        table,
    }
}
