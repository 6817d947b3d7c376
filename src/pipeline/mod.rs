pub mod aggregate;
pub mod derive;
pub mod export;
pub mod filter;
pub mod loader; // Source rows -> conformed, derived tables

use chrono::NaiveDate;

use crate::db::DataSource;
use crate::models::Entity;
use crate::models::Table;

pub use filter::{FilterSet, Predicate};
pub use loader::LoadedTable;

/// Load `entity` and keep the rows matching `filters`.
pub fn filtered_table(
    source: &dyn DataSource,
    entity: Entity,
    filters: &FilterSet,
    today: NaiveDate,
) -> Table {
    let loaded = loader::load(source, entity, today);
    filters.apply(&loaded.table)
}
