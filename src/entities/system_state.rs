//! System state entity - Named markers that gate whole subsystems.
//!
//! The revenue cache stores its format version here; a different stored value
//! invalidates every cached month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One marker, keyed by name
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    /// Marker name (e.g., `"revenue_cache_version"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Marker value
    pub value: String,
    /// Last write
    pub updated_at: DateTimeUtc,
}

/// Markers have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
