//! Per-tab presentation bundles.
//!
//! Each tab runs the same pipeline (load, filter, aggregate) and returns a
//! serializable bundle: headline stats, chart series, the table as row
//! mappings, dropdown options and the echoed filter values. A tab never
//! fails: source problems surface as an empty, zeroed bundle.

pub mod doctor;
pub mod lab;
pub mod overview;
pub mod patient;
pub mod pharmacy;
pub mod room;
pub mod staff;

use crate::models::Table;
use crate::pipeline::aggregate::distinct_sorted;
use crate::pipeline::filter::ALL;

/// One table row keyed by column name, in column order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Dropdown options: the "All" sentinel followed by the sorted distinct
/// values of `column` in the unfiltered table.
pub(crate) fn options_with_all(table: &Table, column: &str) -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(distinct_sorted(table, column))
        .collect()
}
