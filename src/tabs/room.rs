//! Room occupancy tab.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::Record;
use crate::db::DataSource;
use crate::models::{Entity, Table, Value};
use crate::pipeline::aggregate::count_where;
use crate::pipeline::derive::occupancy_rate;
use crate::pipeline::loader;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OccupancyStats {
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
    pub occupancy_rate: f64,
}

impl OccupancyStats {
    /// Counts over `rooms`, using the derived `occupied` flag.
    pub fn of(rooms: &Table) -> Self {
        let total = rooms.len();
        let occupied = count_where(rooms, |row| {
            row.get("occupied").and_then(Value::as_bool) == Some(true)
        });
        Self {
            total,
            occupied,
            available: total - occupied,
            occupancy_rate: occupancy_rate(occupied, total),
        }
    }
}

/// Occupancy per room type. Rooms without a type are left out.
pub fn stats_by_type(rooms: &Table) -> BTreeMap<String, OccupancyStats> {
    let mut types: Vec<String> = match rooms.column("room_type") {
        Some(values) => values
            .filter(|v| !v.is_null())
            .map(ToString::to_string)
            .collect(),
        None => return BTreeMap::new(),
    };
    types.sort();
    types.dedup();

    types
        .into_iter()
        .map(|room_type| {
            let of_type = rooms.select(|row| {
                row.get("room_type").map(ToString::to_string).as_deref() == Some(room_type.as_str())
            });
            let stats = OccupancyStats::of(&of_type);
            (room_type, stats)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomCharts {
    /// Room count per type.
    pub room_type_data: BTreeMap<String, usize>,
    /// Occupancy rate per type.
    pub occupancy_data: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomTab {
    pub stats: OccupancyStats,
    pub room_stats: BTreeMap<String, OccupancyStats>,
    pub charts: RoomCharts,
    pub table: Vec<Record>,
    pub table_count: usize,
}

pub fn build(source: &dyn DataSource, today: NaiveDate) -> RoomTab {
    let loaded = loader::load(source, Entity::Room, today);
    summarize(&loaded.table)
}

pub fn summarize(rooms: &Table) -> RoomTab {
    let room_stats = stats_by_type(rooms);
    let charts = RoomCharts {
        room_type_data: room_stats.iter().map(|(k, s)| (k.clone(), s.total)).collect(),
        occupancy_data: room_stats
            .iter()
            .map(|(k, s)| (k.clone(), s.occupancy_rate))
            .collect(),
    };
    let table = rooms.to_records();

    RoomTab {
        stats: OccupancyStats::of(rooms),
        room_stats,
        charts,
        table_count: table.len(),
        table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{missing_source, seed_today, seeded_source};

    fn rooms(occupancy: &[i64]) -> Table {
        Table::with_rows(
            Entity::Room.columns(),
            occupancy
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    vec![
                        format!("R{i}").into(),
                        "Ward".into(),
                        Value::Int(2),
                        Value::Int(*n),
                        Value::Bool(*n > 0),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn quarter_occupied() {
        let stats = OccupancyStats::of(&rooms(&[1, 0, 0, 0]));
        assert_eq!(stats.total, 4);
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.available, 3);
        assert_eq!(stats.occupancy_rate, 25.0);
    }

    #[test]
    fn no_rooms_is_zero_rate() {
        let stats = OccupancyStats::of(&Entity::Room.empty_table());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.occupancy_rate, 0.0);
    }

    #[test]
    fn seeded_database_bundle() {
        let (_dir, source) = seeded_source();
        let tab = build(&source, seed_today());

        assert_eq!(tab.stats.total, 4);
        assert_eq!(tab.stats.occupied, 2);
        assert_eq!(tab.stats.occupancy_rate, 50.0);

        let icu = tab.room_stats["ICU"];
        assert_eq!((icu.total, icu.occupied, icu.available), (2, 1, 1));
        assert_eq!(tab.charts.occupancy_data["Ward"], 50.0);
        assert_eq!(tab.table_count, 4);
        assert_eq!(tab.table[0]["occupied"], true);
    }

    #[test]
    fn unavailable_source_gives_zeroed_bundle() {
        let (_dir, source) = missing_source();
        let tab = build(&source, seed_today());
        assert_eq!(tab.stats.total, 0);
        assert!(tab.room_stats.is_empty());
    }
}
