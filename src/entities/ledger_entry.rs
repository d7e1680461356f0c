//! Ledger entry entity - A concrete income or expense in the studio's books.
//!
//! Entries are either entered by hand or generated from a recurring blueprint.
//! Generated entries carry `blueprint_id` and `recurrence_period` (`"YYYY-MM"`);
//! the pair is the anti-duplication key of the recurring engine.
use super::enums::{EntryCategory, EntryKind};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Income or expense
    pub kind: EntryKind,
    /// Ledger category
    pub category: EntryCategory,
    /// Human-readable description
    pub description: String,
    /// Amount in currency units, always non-negative; `kind` carries the sign
    pub amount: f64,
    /// Variable-amount placeholder that still needs a real value
    pub amount_pending: bool,
    /// Date the entry is booked on
    pub entry_date: Date,
    /// Optional free-text notes
    pub notes: Option<String>,
    /// Originating blueprint, `None` for manual entries
    pub blueprint_id: Option<i64>,
    /// Period (`"YYYY-MM"`) this entry was generated for
    pub recurrence_period: Option<String>,
    /// When the entry was created
    pub created_at: DateTimeUtc,
    /// When the entry was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `LedgerEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Generated entries belong to one blueprint
    #[sea_orm(
        belongs_to = "super::recurring_blueprint::Entity",
        from = "Column::BlueprintId",
        to = "super::recurring_blueprint::Column::Id"
    )]
    RecurringBlueprint,
}

impl Related<super::recurring_blueprint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringBlueprint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
