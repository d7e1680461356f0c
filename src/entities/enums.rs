//! Closed enumerations stored as text columns.
//!
//! Each enum persists through `DeriveActiveEnum` and parses user input through
//! `FromStr`, so unknown labels are rejected at the boundary instead of being
//! written to the database.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How the amount of a recurring blueprint is determined each month.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AmountKind {
    /// Same amount every occurrence
    #[sea_orm(string_value = "fixed")]
    Fixed,
    /// Amount differs per occurrence and is filled in after generation
    #[sea_orm(string_value = "variable")]
    Variable,
}

/// Direction of a ledger entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Money coming in
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Ledger category of an entry or blueprint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    /// Cameras, lenses, lighting
    #[sea_orm(string_value = "equipment")]
    Equipment,
    /// Editing and delivery software subscriptions
    #[sea_orm(string_value = "software")]
    Software,
    /// Studio rent and utilities
    #[sea_orm(string_value = "studio")]
    Studio,
    /// Ads, portfolio hosting, printed material
    #[sea_orm(string_value = "marketing")]
    Marketing,
    /// Travel to sessions
    #[sea_orm(string_value = "travel")]
    Travel,
    /// Taxes and fees
    #[sea_orm(string_value = "taxes")]
    Taxes,
    /// Services sold outside regular sessions (workshops, second shooting)
    #[sea_orm(string_value = "services")]
    Services,
    /// Prints, albums and other products sold
    #[sea_orm(string_value = "products")]
    Products,
    /// Anything else
    #[sea_orm(string_value = "other")]
    Other,
}

/// Booking status of an appointment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Requested but not confirmed by the studio
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Confirmed; must have a workflow session
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Cancelled by either side
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

macro_rules! text_enum {
    ($ty:ident, $field:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            /// Stored label of this variant
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($label => Ok(Self::$variant),)+
                    other => Err(Error::invalid_input(
                        $field,
                        format!("unknown value '{other}'"),
                    )),
                }
            }
        }
    };
}

text_enum!(AmountKind, "amount_kind", {
    Fixed => "fixed",
    Variable => "variable",
});

text_enum!(EntryKind, "kind", {
    Income => "income",
    Expense => "expense",
});

/// Feature add-on that brings its own workflow stages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Addon {
    /// Client selects photos from a proofing gallery before editing
    #[sea_orm(string_value = "gallery_proofing")]
    GalleryProofing,
}

text_enum!(EntryCategory, "category", {
    Equipment => "equipment",
    Software => "software",
    Studio => "studio",
    Marketing => "marketing",
    Travel => "travel",
    Taxes => "taxes",
    Services => "services",
    Products => "products",
    Other => "other",
});

text_enum!(AppointmentStatus, "status", {
    Pending => "pending",
    Confirmed => "confirmed",
    Cancelled => "cancelled",
});

text_enum!(Addon, "addon", {
    GalleryProofing => "gallery_proofing",
});

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Fixed".parse::<AmountKind>().unwrap(), AmountKind::Fixed);
        assert_eq!(" income ".parse::<EntryKind>().unwrap(), EntryKind::Income);
        assert_eq!(
            "CONFIRMED".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Confirmed
        );
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = "monthly".parse::<AmountKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "amount_kind"));
        assert!("rent".parse::<EntryCategory>().is_err());
    }

    #[test]
    fn test_display_matches_stored_label() {
        for category in EntryCategory::iter() {
            assert_eq!(
                category.to_string().parse::<EntryCategory>().unwrap(),
                category
            );
        }
        for addon in Addon::iter() {
            assert_eq!(addon.to_string().parse::<Addon>().unwrap(), addon);
        }
    }
}
