use serde::{Deserialize, Serialize};

use super::enums::StaffStatus;
use crate::pipeline::filter::{FilterSet, Predicate, ALL};

fn all() -> String {
    ALL.to_string()
}

/// Doctor tab filters. Also accepted by the doctor schedule export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorFilter {
    pub specialization: String,
    pub day: String,
    pub search_doctor: String,
}

impl Default for DoctorFilter {
    fn default() -> Self {
        Self {
            specialization: all(),
            day: all(),
            search_doctor: String::new(),
        }
    }
}

impl DoctorFilter {
    pub fn predicates(&self) -> FilterSet {
        FilterSet::new()
            .with(Predicate::equals("specialization", &self.specialization))
            .with(Predicate::equals("schedule_day", &self.day))
            .with(Predicate::contains("name", &self.search_doctor))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabTestFilter {
    pub test_type: String,
    pub result_status: String,
    pub start_date: String,
    pub end_date: String,
}

impl Default for LabTestFilter {
    fn default() -> Self {
        Self {
            test_type: all(),
            result_status: all(),
            start_date: String::new(),
            end_date: String::new(),
        }
    }
}

impl LabTestFilter {
    pub fn predicates(&self) -> FilterSet {
        FilterSet::new()
            .with(Predicate::equals("test_type", &self.test_type))
            .with(Predicate::equals("result_status", &self.result_status))
            .with(Predicate::range("scheduled_date", &self.start_date, &self.end_date))
    }
}

/// Staff tab filters. The export route historically used the shorter
/// parameter names, so both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffFilter {
    #[serde(alias = "role")]
    pub staff_role: String,
    #[serde(alias = "department")]
    pub staff_department: String,
    #[serde(alias = "status")]
    pub staff_status: String,
    #[serde(alias = "search")]
    pub search_staff: String,
}

impl Default for StaffFilter {
    fn default() -> Self {
        Self {
            staff_role: all(),
            staff_department: all(),
            staff_status: all(),
            search_staff: String::new(),
        }
    }
}

impl StaffFilter {
    /// `staff_status` selects on the boolean `active` column: "Active"
    /// keeps active staff, any other non-sentinel value keeps inactive.
    pub fn active_flag(&self) -> Option<bool> {
        match self.staff_status.parse::<StaffStatus>() {
            Ok(status) => status.active_flag(),
            Err(_) if self.staff_status.is_empty() => None,
            Err(_) => Some(false),
        }
    }

    pub fn predicates(&self) -> FilterSet {
        FilterSet::new()
            .with(Predicate::equals("role", &self.staff_role))
            .with(Predicate::equals("department", &self.staff_department))
            .with(self.active_flag().map(|flag| Predicate::flag("active", flag)))
            .with(Predicate::contains("name", &self.search_staff))
    }
}
