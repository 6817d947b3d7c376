//! Entity descriptors: the declared schema, derived columns, load-time
//! joins and export naming for each dashboard tab.

use super::enums::Entity;
use super::table::{Column, ColumnKind, Table};

const DOCTOR_SCHEDULE_COLUMNS: &[Column] = &[
    Column::int("schedule_id"),
    Column::int("doctor_id"),
    Column::text("name"),
    Column::text("specialization"),
    Column::text("schedule_day"),
    Column::time("start_time"),
    Column::time("end_time"),
    Column::text("room_id"),
];
const DOCTOR_SCHEDULE_DERIVED: &[Column] = &[Column::float("duration_hours")];

const ROOM_COLUMNS: &[Column] = &[
    Column::text("room_id"),
    Column::text("room_type"),
    Column::int("capacity"),
    Column::int("current_occupancy"),
];
const ROOM_DERIVED: &[Column] = &[Column::bool("occupied")];

const PATIENT_COLUMNS: &[Column] = &[
    Column::int("patient_id"),
    Column::text("name"),
    Column::text("gender"),
    Column::date("birth_date"),
    Column::text("city"),
    Column::text("payment_type"),
    Column::text("insurance_provider"),
    Column::date("registration_date"),
];
const PATIENT_DERIVED: &[Column] = &[Column::int("age"), Column::text("age_group")];

const PHARMACY_STOCK_COLUMNS: &[Column] = &[
    Column::int("drug_id"),
    Column::text("drug_name"),
    Column::text("category"),
    Column::int("stock_in"),
    Column::int("stock_out"),
    Column::date("stock_date"),
    Column::date("expiry_date"),
    Column::text("supplier"),
];
const PHARMACY_STOCK_DERIVED: &[Column] = &[Column::int("current_stock")];

const STAFF_COLUMNS: &[Column] = &[
    Column::int("staff_id"),
    Column::text("name"),
    Column::text("role"),
    Column::text("department"),
    Column::date("hire_date"),
    Column::bool("active"),
];
const STAFF_DERIVED: &[Column] = &[Column::float("years_of_service")];

const LAB_TEST_COLUMNS: &[Column] = &[
    Column::int("test_id"),
    Column::int("patient_id"),
    Column::text("patient_name"),
    Column::text("test_type"),
    Column::date("scheduled_date"),
    Column::date("result_date"),
    Column::text("result_status"),
    Column::int("lab_staff_id"),
];

/// Left join performed once at load time: for every row, look up
/// `local_key` in `from`'s `foreign_key` column and copy `value` into
/// `target`. No match leaves `target` null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupJoin {
    pub from: Entity,
    pub local_key: &'static str,
    pub foreign_key: &'static str,
    pub value: &'static str,
    pub target: &'static str,
}

impl Entity {
    pub const ALL: [Entity; 6] = [
        Entity::DoctorSchedule,
        Entity::Room,
        Entity::Patient,
        Entity::PharmacyStock,
        Entity::Staff,
        Entity::LabTest,
    ];

    /// Table (or file stem) the rows are read from.
    pub fn source_table(&self) -> &'static str {
        match self {
            Self::DoctorSchedule => "doctor_schedule",
            Self::Room => "rooms",
            Self::Patient => "patients",
            Self::PharmacyStock => "pharmacy_stock",
            Self::Staff => "staff",
            Self::LabTest => "lab_tests",
        }
    }

    /// Columns expected from the data source.
    pub fn source_columns(&self) -> &'static [Column] {
        match self {
            Self::DoctorSchedule => DOCTOR_SCHEDULE_COLUMNS,
            Self::Room => ROOM_COLUMNS,
            Self::Patient => PATIENT_COLUMNS,
            Self::PharmacyStock => PHARMACY_STOCK_COLUMNS,
            Self::Staff => STAFF_COLUMNS,
            Self::LabTest => LAB_TEST_COLUMNS,
        }
    }

    /// Columns computed at load time.
    pub fn derived_columns(&self) -> &'static [Column] {
        match self {
            Self::DoctorSchedule => DOCTOR_SCHEDULE_DERIVED,
            Self::Room => ROOM_DERIVED,
            Self::Patient => PATIENT_DERIVED,
            Self::PharmacyStock => PHARMACY_STOCK_DERIVED,
            Self::Staff => STAFF_DERIVED,
            Self::LabTest => &[],
        }
    }

    /// Full declared schema: source columns followed by derived ones.
    pub fn columns(&self) -> Vec<Column> {
        self.source_columns()
            .iter()
            .chain(self.derived_columns())
            .copied()
            .collect()
    }

    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.source_columns()
            .iter()
            .chain(self.derived_columns())
            .find(|c| c.name == name)
            .map(|c| c.kind)
    }

    /// Identity column synthesized as 1..N when the source lacks it.
    pub fn synthesized_identity(&self) -> Option<&'static str> {
        match self {
            Self::DoctorSchedule => Some("doctor_id"),
            _ => None,
        }
    }

    pub fn lookup_join(&self) -> Option<LookupJoin> {
        match self {
            Self::LabTest => Some(LookupJoin {
                from: Entity::Patient,
                local_key: "patient_id",
                foreign_key: "patient_id",
                value: "name",
                target: "patient_name",
            }),
            _ => None,
        }
    }

    /// Empty table carrying the full declared schema.
    pub fn empty_table(&self) -> Table {
        Table::new(self.columns())
    }

    /// Download filename stem, e.g. `doctor_schedules_20240101.csv`.
    pub fn export_stem(&self) -> &'static str {
        match self {
            Self::DoctorSchedule => "doctor_schedules",
            Self::Room => "room_data",
            Self::Patient => "patient_data",
            Self::PharmacyStock => "pharmacy_data",
            Self::Staff => "staff_data",
            Self::LabTest => "lab_tests",
        }
    }
}
