//! Derived columns, computed once per load.
//!
//! The free functions are pure; `apply` writes their results into the
//! derived columns of a freshly loaded table.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::models::{AgeGroup, Entity, Table, Value};

/// Whole years between `birth` and `today`, counting a year only once the
/// anniversary has been reached. A null birth date yields 0.
pub fn age_on(birth: Option<NaiveDate>, today: NaiveDate) -> i64 {
    let Some(birth) = birth else {
        return 0;
    };
    let years = i64::from(today.year() - birth.year());
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years - 1
    } else {
        years
    }
}

/// Time-of-day delta in hours. An end before the start gives a negative
/// value; there is no wrap past midnight.
pub fn duration_hours(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<f64> {
    let (start, end) = (start?, end?);
    let delta = end.signed_duration_since(start);
    Some(delta.num_seconds() as f64 / 3600.0)
}

/// `stock_in - stock_out`, treating a missing operand as 0. Saturates at
/// the `i64` bounds.
pub fn current_stock(stock_in: Option<i64>, stock_out: Option<i64>) -> i64 {
    stock_in.unwrap_or(0).saturating_sub(stock_out.unwrap_or(0))
}

/// Days since hire over 365.25, rounded to one decimal. Null hire date
/// yields 0.0.
pub fn years_of_service(hire: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(hire) = hire else {
        return 0.0;
    };
    let days = (today - hire).num_days() as f64;
    round1(days / 365.25)
}

pub fn is_occupied(current_occupancy: Option<i64>) -> bool {
    current_occupancy.is_some_and(|n| n > 0)
}

/// `occupied / total * 100` to one decimal, 0 when there is nothing to occupy.
pub fn occupancy_rate(occupied: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(occupied as f64 / total as f64 * 100.0)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Fill the derived columns of `table` for `entity`.
pub fn apply(entity: Entity, table: &mut Table, today: NaiveDate) {
    match entity {
        Entity::DoctorSchedule => fill(table, "duration_hours", |row| {
            let start = row.get("start_time").and_then(Value::as_time);
            let end = row.get("end_time").and_then(Value::as_time);
            duration_hours(start, end).into()
        }),
        Entity::Room => fill(table, "occupied", |row| {
            is_occupied(row.get("current_occupancy").and_then(Value::as_i64)).into()
        }),
        Entity::Patient => {
            fill(table, "age", |row| {
                age_on(row.get("birth_date").and_then(Value::as_date), today).into()
            });
            fill(table, "age_group", |row| {
                let age = row.get("age").and_then(Value::as_i64).unwrap_or(0);
                AgeGroup::for_age(age).as_str().into()
            });
        }
        Entity::PharmacyStock => fill(table, "current_stock", |row| {
            current_stock(
                row.get("stock_in").and_then(Value::as_i64),
                row.get("stock_out").and_then(Value::as_i64),
            )
            .into()
        }),
        Entity::Staff => fill(table, "years_of_service", |row| {
            years_of_service(row.get("hire_date").and_then(Value::as_date), today).into()
        }),
        Entity::LabTest => {}
    }
}

fn fill<F>(table: &mut Table, column: &str, compute: F)
where
    F: Fn(crate::models::RowRef<'_>) -> Value,
{
    let Some(index) = table.column_index(column) else {
        return;
    };
    let values: Vec<Value> = table.rows().map(&compute).collect();
    for (row, value) in values.into_iter().enumerate() {
        table.set(row, index, value);
    }
}
