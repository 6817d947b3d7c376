use serde::{Deserialize, Serialize};

/// Returned when a string does not name any variant of a `str_enum!` type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$attr:meta])* $name:ident { $($(#[$vattr:meta])* $variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        $(#[$attr])*
        pub enum $name {
            $($(#[$vattr])* $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Entity {
    DoctorSchedule => "doctors",
    Room => "rooms",
    Patient => "patients",
    PharmacyStock => "pharmacy",
    Staff => "staff",
    LabTest => "lab-tests",
});

str_enum!(AgeGroup {
    Child => "Child",
    YoungAdult => "Young Adult",
    Adult => "Adult",
    Senior => "Senior",
});

str_enum!(StockStatus {
    InStock => "In Stock",
    LowStock => "Low Stock",
    OutOfStock => "Out of Stock",
});

str_enum!(StaffStatus {
    All => "All",
    Active => "Active",
    Inactive => "Inactive",
});

str_enum!(#[derive(Default)] ExportFormat {
    #[default]
    Csv => "csv",
    Tsv => "tsv",
});

impl AgeGroup {
    /// Buckets are closed on the lower bound and open on the upper one.
    pub fn for_age(age: i64) -> Self {
        match age {
            a if a < 18 => Self::Child,
            a if a < 40 => Self::YoungAdult,
            a if a < 60 => Self::Adult,
            _ => Self::Senior,
        }
    }
}

impl StockStatus {
    /// Exactly one status holds for any stock level.
    pub fn classify(current_stock: i64) -> Self {
        if current_stock <= 0 {
            Self::OutOfStock
        } else if current_stock <= 5 {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

impl StaffStatus {
    /// The `active` flag this status selects, `None` for "All".
    pub fn active_flag(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Active => Some(true),
            Self::Inactive => Some(false),
        }
    }

    /// Dropdown options in display order.
    pub fn options() -> Vec<&'static str> {
        vec![Self::All.as_str(), Self::Active.as_str(), Self::Inactive.as_str()]
    }
}

impl ExportFormat {
    pub fn delimiter(&self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Tsv => "text/tab-separated-values",
        }
    }
}
