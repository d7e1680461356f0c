//! Recurring blueprint entity - Template for a monthly financial obligation.
//!
//! A blueprint is never turned into ledger rows directly. The recurring engine
//! reads active blueprints and materializes one ledger entry per
//! (blueprint, period), linking back through `ledger_entries.blueprint_id`.

use super::enums::{AmountKind, EntryCategory, EntryKind};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recurring blueprint database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_blueprints")]
pub struct Model {
    /// Unique identifier for the blueprint
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Item reference shown on every generated entry (e.g., "Lightroom subscription")
    pub description: String,
    /// Whether generated entries are income or expense
    pub kind: EntryKind,
    /// Ledger category copied onto generated entries
    pub category: EntryCategory,
    /// Amount per occurrence; required for `Fixed`, optional hint for `Variable`
    pub amount: Option<f64>,
    /// Fixed amount every month, or filled in per occurrence
    pub amount_kind: AmountKind,
    /// First occurrence; its day-of-month is the due day
    pub first_date: Date,
    /// Last month (inclusive) in which the blueprint produces entries
    pub end_date: Option<Date>,
    /// Free-text note copied onto generated entries
    pub note: Option<String>,
    /// Inactive blueprints are ignored by generation
    pub is_active: bool,
    /// When the blueprint was created
    pub created_at: DateTimeUtc,
    /// When the future-occurrence parameters were last changed
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `RecurringBlueprint` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One blueprint has many generated ledger entries
    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntries,
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
